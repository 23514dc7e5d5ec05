//! References to the retired `ProfitabilitySegment` CDS field

use super::{DetectionContext, Detector};
use crate::finding::{Finding, FindingKind, TargetType};
use crate::pattern::Pattern;

/// Default retired field
pub const RETIRED_FIELD: &str = "ProfitabilitySegment";

/// Default replacement field
pub const REPLACEMENT_FIELD: &str = "ProfitabilitySegment_2";

/// Reports whole-word occurrences of a retired CDS field name
#[derive(Debug, Clone)]
pub struct DeprecatedFieldDetector {
    pattern: Pattern,
    field: String,
    replacement: String,
}

impl DeprecatedFieldDetector {
    pub const ID: &'static str = "cds-profitability-segment";

    pub fn new(field: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Pattern::word(field)?,
            field: field.to_string(),
            replacement: replacement.to_string(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl Detector for DeprecatedFieldDetector {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "CDS field ProfitabilitySegment is deprecated; use ProfitabilitySegment_2"
    }

    fn detect(&self, cx: &DetectionContext<'_>) -> Vec<Finding> {
        self.pattern
            .matches(cx.code)
            .map(|m| {
                Finding::new(
                    Self::ID,
                    FindingKind::DeprecatedField,
                    m.full().span,
                    self.replacement.as_str(),
                )
                .with_target(TargetType::CdsView, None)
                .with_used_fields([self.field.as_str()])
                .with_suggested_fields([self.replacement.as_str()])
            })
            .collect()
    }
}
