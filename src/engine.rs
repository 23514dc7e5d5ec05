//! Remediation engine - runs the detectors over a batch of units

use crate::config::{Config, ConfigError};
use crate::declarations::DeclarationMap;
use crate::detectors::{self, DetectionContext, Detector};
use crate::finding::Finding;
use crate::unit::{AnnotatedUnit, Unit};
use rayon::prelude::*;
use std::collections::HashMap;

/// Statistics about remediation results
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemediationStats {
    /// Count per detector ID
    pub per_detector: HashMap<String, usize>,
    /// Units analyzed
    pub units_analyzed: usize,
    /// Units with at least one finding
    pub units_with_findings: usize,
}

impl RemediationStats {
    /// Record one analyzed unit
    pub fn record(&mut self, unit: &AnnotatedUnit) {
        self.units_analyzed += 1;
        if unit.has_findings() {
            self.units_with_findings += 1;
        }
        for finding in &unit.findings {
            *self.per_detector.entry(finding.detector.to_string()).or_insert(0) += 1;
        }
    }

    /// Collect statistics for a batch
    pub fn from_units(units: &[AnnotatedUnit]) -> Self {
        let mut stats = Self::default();
        for unit in units {
            stats.record(unit);
        }
        stats
    }

    /// Merge another statistics into this one
    pub fn merge(&mut self, other: &RemediationStats) {
        for (detector, count) in &other.per_detector {
            *self.per_detector.entry(detector.clone()).or_insert(0) += count;
        }
        self.units_analyzed += other.units_analyzed;
        self.units_with_findings += other.units_with_findings;
    }

    /// Total number of findings
    pub fn total(&self) -> usize {
        self.per_detector.values().sum()
    }
}

/// Runs every enabled detector over each unit
pub struct Remediator {
    detectors: Vec<Box<dyn Detector>>,
    parallel: bool,
}

impl Remediator {
    /// Create a remediator with the built-in detectors enabled by `config`
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let detectors = detectors::builtin(&config)?;
        Ok(Self::with_detectors(detectors).parallel(config.jobs != 1))
    }

    /// Create a remediator running `detectors` in the given order
    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self {
            detectors,
            parallel: true,
        }
    }

    /// Process units on rayon's thread pool (default on)
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Ids of the active detectors, in run order
    pub fn detector_ids(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    /// Analyze one source text. Findings are grouped by detector in run order,
    /// and in document order within each group.
    pub fn analyze(&self, code: &str) -> Vec<Finding> {
        let declarations = DeclarationMap::extract(code);
        let cx = DetectionContext::new(code, &declarations);

        self.detectors
            .iter()
            .flat_map(|detector| detector.detect(&cx))
            .collect()
    }

    /// Analyze one unit
    pub fn remediate_unit(&self, unit: &Unit) -> AnnotatedUnit {
        let findings = self.analyze(unit.source());
        log::debug!(
            "{}: {} finding(s) in {} chars",
            unit.label(),
            findings.len(),
            unit.source().chars().count()
        );
        AnnotatedUnit {
            unit: unit.clone(),
            findings,
        }
    }

    /// Analyze a batch of units; the output has one entry per input unit, in
    /// input order
    pub fn remediate(&self, units: &[Unit]) -> Vec<AnnotatedUnit> {
        let annotated: Vec<AnnotatedUnit> = if self.parallel {
            units.par_iter().map(|u| self.remediate_unit(u)).collect()
        } else {
            units.iter().map(|u| self.remediate_unit(u)).collect()
        };

        log::info!(
            "Analyzed {} unit(s), {} finding(s)",
            annotated.len(),
            annotated.iter().map(|u| u.findings.len()).sum::<usize>()
        );

        annotated
    }
}
