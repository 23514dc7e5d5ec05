//! `IS [NOT] INITIAL` checks on profitability segment numbers
//!
//! A `PAOBJNR` value of type `RKEOBJNR` must no longer be tested with
//! `IS INITIAL`; the replacement is a call to
//! `cl_fco_copa_paobjnr=>is_initial( )` compared against `abap_true` or
//! `abap_false`.

use super::{DetectionContext, Detector};
use crate::finding::{Finding, FindingKind};
use crate::pattern::Pattern;
use once_cell::sync::Lazy;

static INITIAL_CHECK: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"(?P<var>\w+) \s+
          IS \s+
          (?P<negation>NOT \s+)?
          INITIAL\b",
    )
    .unwrap()
});

/// Default retired data element
pub const RETIRED_TYPE: &str = "RKEOBJNR";

/// Default replacement helper class
pub const HELPER_CLASS: &str = "cl_fco_copa_paobjnr";

/// Reports initial checks on variables declared with the retired type
#[derive(Debug, Clone)]
pub struct InitialCheckDetector {
    retired_type: String,
    helper_class: String,
    type_filter: bool,
}

impl Default for InitialCheckDetector {
    fn default() -> Self {
        Self::new(RETIRED_TYPE, HELPER_CLASS)
    }
}

impl InitialCheckDetector {
    pub const ID: &'static str = "paobjnr-initial-check";

    pub fn new(retired_type: &str, helper_class: &str) -> Self {
        Self {
            retired_type: retired_type.to_string(),
            helper_class: helper_class.to_string(),
            type_filter: true,
        }
    }

    /// Only report variables declared with the retired type (default on).
    /// When off, every syntactic initial check is reported.
    pub fn type_filter(mut self, enabled: bool) -> Self {
        self.type_filter = enabled;
        self
    }

    /// Replacement call for a check on `var`
    pub fn suggest(&self, var: &str, negated: bool) -> String {
        let expected = if negated { "abap_false" } else { "abap_true" };
        format!("{}=>is_initial( {} ) = {}", self.helper_class, var, expected)
    }
}

impl Detector for InitialCheckDetector {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "IS [NOT] INITIAL on a profitability segment number; use cl_fco_copa_paobjnr=>is_initial( )"
    }

    fn detect(&self, cx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for m in INITIAL_CHECK.matches(cx.code) {
            let Some(var) = m.group("var") else {
                continue;
            };

            if self.type_filter && !cx.declarations.declared_type_is(var.text, &self.retired_type) {
                continue;
            }

            let negated = m.group("negation").is_some();
            findings.push(
                Finding::new(
                    Self::ID,
                    FindingKind::InitialCheck { negated },
                    m.full().span,
                    self.suggest(var.text, negated),
                )
                .with_used_fields([var.text]),
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::DeclarationMap;
    use crate::finding::Span;

    fn detect(code: &str) -> Vec<Finding> {
        let declarations = DeclarationMap::extract(code);
        InitialCheckDetector::default().detect(&DetectionContext::new(code, &declarations))
    }

    #[test]
    fn test_negated_check() {
        let code = "DATA: lv_obj TYPE rkeobjnr. IF lv_obj IS NOT INITIAL.";
        let findings = detect(code);

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.kind, FindingKind::InitialCheck { negated: true });
        assert_eq!(finding.used_fields, vec!["lv_obj".to_string()]);
        assert_eq!(
            finding.suggested_statement,
            "cl_fco_copa_paobjnr=>is_initial( lv_obj ) = abap_false"
        );
        assert_eq!(finding.span.slice(code), Some("lv_obj IS NOT INITIAL"));
        assert!(!finding.ambiguous);
        assert!(finding.suggested_fields.is_none());
        assert!(finding.target.is_none());
    }

    #[test]
    fn test_plain_check() {
        let code = "DATA lv_obj TYPE rkeobjnr.\nIF lv_obj IS INITIAL.\nENDIF.";
        let findings = detect(code);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::InitialCheck { negated: false });
        assert!(findings[0].suggested_statement.ends_with("= abap_true"));
    }

    #[test]
    fn test_undeclared_variable_skipped() {
        assert!(detect("IF lv_x IS INITIAL.").is_empty());
    }

    #[test]
    fn test_other_type_skipped() {
        assert!(detect("DATA lv_x TYPE string. IF lv_x IS INITIAL.").is_empty());
        assert!(detect("DATA lv_x TYPE rkeobjnr_old. IF lv_x IS INITIAL.").is_empty());
    }

    #[test]
    fn test_case_and_whitespace_flexible() {
        let code = "data LV_OBJ type RKEOBJNR.\ncheck lv_obj\n    is\n\tnot   initial.";
        let findings = detect(code);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].used_fields, vec!["lv_obj".to_string()]);
        assert_eq!(
            findings[0].span.slice(code),
            Some("lv_obj\n    is\n\tnot   initial")
        );
    }

    #[test]
    fn test_back_to_back_checks_reported_independently() {
        let code = "DATA a TYPE rkeobjnr. DATA b TYPE rkeobjnr. DATA c TYPE i.\n\
                    IF a IS INITIAL AND b IS NOT INITIAL AND c IS INITIAL.";
        let findings = detect(code);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].used_fields, vec!["a".to_string()]);
        assert_eq!(findings[1].used_fields, vec!["b".to_string()]);
        assert!(findings[0].span.start < findings[1].span.start);
        assert_eq!(findings[1].kind, FindingKind::InitialCheck { negated: true });
    }

    #[test]
    fn test_check_before_declaration_still_found() {
        // Declarations are collected for the whole unit first
        let code = "IF lv IS INITIAL. ENDIF. DATA lv TYPE rkeobjnr.";
        assert_eq!(detect(code).len(), 1);
    }

    #[test]
    fn test_initialize_not_matched() {
        let code = "DATA lv TYPE rkeobjnr. lv IS INITIALIZED.";
        assert!(detect(code).is_empty());
    }

    #[test]
    fn test_structure_component_uses_component_name() {
        let code = "DATA paobjnr TYPE rkeobjnr. IF ls_item-paobjnr IS INITIAL.";
        let findings = detect(code);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].used_fields, vec!["paobjnr".to_string()]);
        assert_eq!(findings[0].span.slice(code), Some("paobjnr IS INITIAL"));
    }

    #[test]
    fn test_without_type_filter_reports_everything() {
        let code = "IF lv_x IS INITIAL. IF lv_y IS NOT INITIAL.";
        let declarations = DeclarationMap::extract(code);
        let detector = InitialCheckDetector::default().type_filter(false);
        let findings = detector.detect(&DetectionContext::new(code, &declarations));

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].span, Span::new(3, 18));
        assert_eq!(
            findings[1].suggested_statement,
            "cl_fco_copa_paobjnr=>is_initial( lv_y ) = abap_false"
        );
    }

    #[test]
    fn test_custom_type_and_helper() {
        let code = "DATA lv TYPE zobjnr. IF lv IS INITIAL.";
        let declarations = DeclarationMap::extract(code);
        let detector = InitialCheckDetector::new("ZOBJNR", "zcl_helper");
        let findings = detector.detect(&DetectionContext::new(code, &declarations));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggested_statement, "zcl_helper=>is_initial( lv ) = abap_true");
    }

    #[test]
    fn test_empty_code() {
        assert!(detect("").is_empty());
    }
}
