//! Detectors for deprecated CO-PA constructs
//!
//! Each detector scans one unit's source text and reports [`Finding`]s in
//! document order. Detectors hold no mutable state, so a single instance is
//! shared across all units and threads.

pub mod deprecated_field;
pub mod initial_check;

pub use deprecated_field::DeprecatedFieldDetector;
pub use initial_check::InitialCheckDetector;

use crate::config::Config;
use crate::declarations::DeclarationMap;
use crate::finding::Finding;

/// Per-unit input shared by all detectors
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Source text of the unit
    pub code: &'a str,
    /// Declarations found in the unit
    pub declarations: &'a DeclarationMap,
}

impl<'a> DetectionContext<'a> {
    pub fn new(code: &'a str, declarations: &'a DeclarationMap) -> Self {
        Self { code, declarations }
    }
}

/// A pattern detector
pub trait Detector: Send + Sync {
    /// Unique detector identifier
    fn id(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Scan one unit
    fn detect(&self, cx: &DetectionContext<'_>) -> Vec<Finding>;
}

/// Ids of all built-in detectors, in the order they run
pub const DETECTOR_IDS: [&str; 2] = [InitialCheckDetector::ID, DeprecatedFieldDetector::ID];

/// Check whether `id` names a built-in detector
pub fn is_known(id: &str) -> bool {
    DETECTOR_IDS.contains(&id)
}

/// Build the detectors enabled by `config`, in run order
pub fn builtin(config: &Config) -> Result<Vec<Box<dyn Detector>>, regex::Error> {
    let mut detectors: Vec<Box<dyn Detector>> = Vec::new();

    if config.is_detector_enabled(InitialCheckDetector::ID) {
        detectors.push(Box::new(
            InitialCheckDetector::new(&config.initial_check.retired_type, &config.initial_check.helper_class)
                .type_filter(config.type_filter),
        ));
    }

    if config.is_detector_enabled(DeprecatedFieldDetector::ID) {
        detectors.push(Box::new(DeprecatedFieldDetector::new(
            &config.deprecated_field.field,
            &config.deprecated_field.replacement,
        )?));
    }

    Ok(detectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let detectors = builtin(&Config::default()).unwrap();
        let ids: Vec<&str> = detectors.iter().map(|d| d.id()).collect();
        assert_eq!(ids, DETECTOR_IDS.to_vec());
    }

    #[test]
    fn test_builtin_respects_disabled() {
        let mut config = Config::default();
        config.disabled_detectors = vec![InitialCheckDetector::ID.to_string()];

        let detectors = builtin(&config).unwrap();
        assert_eq!(detectors.len(), 1);
        assert_eq!(detectors[0].id(), DeprecatedFieldDetector::ID);
    }

    #[test]
    fn test_builtin_respects_select() {
        let mut config = Config::default();
        config.enabled_detectors = Some(vec![InitialCheckDetector::ID.to_string()]);

        let detectors = builtin(&config).unwrap();
        assert_eq!(detectors.len(), 1);
        assert_eq!(detectors[0].id(), InitialCheckDetector::ID);
    }

    #[test]
    fn test_is_known() {
        assert!(is_known("paobjnr-initial-check"));
        assert!(is_known("cds-profitability-segment"));
        assert!(!is_known("something-else"));
    }

    #[test]
    fn test_descriptions_present() {
        for detector in builtin(&Config::default()).unwrap() {
            assert!(!detector.description().is_empty());
        }
    }
}
