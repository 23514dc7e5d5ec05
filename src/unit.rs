//! Code units: analyzable chunks of ABAP source with identifying metadata

use crate::finding::Finding;
use serde::{Deserialize, Serialize};

fn empty_code() -> Option<String> {
    Some(String::new())
}

/// One program, include or method body to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Main program name
    pub pgm_name: String,
    /// Include name
    pub inc_name: String,
    /// Unit type tag (e.g. "PROG", "METH")
    #[serde(rename = "type")]
    pub unit_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class_implementation: Option<String>,
    /// First line of the unit within its include (1-based)
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
    /// Source text; a missing field reads as empty text
    #[serde(default = "empty_code")]
    pub code: Option<String>,
}

impl Unit {
    /// Create a unit of type `PROG` for a standalone source text
    pub fn from_source(pgm_name: impl Into<String>, code: impl Into<String>) -> Self {
        let pgm_name = pgm_name.into();
        Self {
            inc_name: pgm_name.clone(),
            pgm_name,
            unit_type: "PROG".to_string(),
            name: None,
            class_implementation: None,
            start_line: None,
            end_line: None,
            code: Some(code.into()),
        }
    }

    /// Source text, empty when absent
    pub fn source(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    /// Display name: include, plus the unit name when set
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{}/{}", self.inc_name, name),
            _ => self.inc_name.clone(),
        }
    }

    /// 1-based line and column of a character offset, with lines counted
    /// from `start_line` when the unit knows where it starts
    pub fn position(&self, char_offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for c in self.source().chars().take(char_offset) {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        let first_line = self.start_line.map_or(1, |l| l.max(1) as usize);
        (first_line + line, column + 1)
    }

    /// Text of the line containing a character offset, without its terminator
    pub fn line_at(&self, char_offset: usize) -> &str {
        let source = self.source();
        let byte = source
            .char_indices()
            .nth(char_offset)
            .map_or(source.len(), |(i, _)| i);
        let start = source[..byte].rfind('\n').map_or(0, |i| i + 1);
        let end = source[byte..].find('\n').map_or(source.len(), |i| byte + i);
        source[start..end].trim_end_matches('\r')
    }
}

/// A unit together with the findings detected in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedUnit {
    pub unit: Unit,
    pub findings: Vec<Finding>,
}

impl AnnotatedUnit {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_unit() {
        let json = r#"{
            "pgm_name": "SAPLZCOPA",
            "inc_name": "LZCOPAU01",
            "type": "FUNC",
            "name": "Z_COPA_READ",
            "class_implementation": null,
            "start_line": 10,
            "end_line": 42,
            "code": "SELECT ProfitabilitySegment FROM t."
        }"#;
        let unit: Unit = serde_json::from_str(json).unwrap();

        assert_eq!(unit.pgm_name, "SAPLZCOPA");
        assert_eq!(unit.unit_type, "FUNC");
        assert_eq!(unit.name.as_deref(), Some("Z_COPA_READ"));
        assert_eq!(unit.start_line, Some(10));
        assert_eq!(unit.source(), "SELECT ProfitabilitySegment FROM t.");
    }

    #[test]
    fn test_missing_code_defaults_to_empty() {
        let json = r#"{ "pgm_name": "Z", "inc_name": "Z", "type": "PROG" }"#;
        let unit: Unit = serde_json::from_str(json).unwrap();

        assert_eq!(unit.code, Some(String::new()));
        assert_eq!(unit.source(), "");
        assert!(unit.name.is_none());
    }

    #[test]
    fn test_null_code_reads_as_empty() {
        let json = r#"{ "pgm_name": "Z", "inc_name": "Z", "type": "PROG", "code": null }"#;
        let unit: Unit = serde_json::from_str(json).unwrap();

        assert_eq!(unit.code, None);
        assert_eq!(unit.source(), "");
    }

    #[test]
    fn test_missing_identity_rejected() {
        let json = r#"{ "inc_name": "Z", "type": "PROG" }"#;
        assert!(serde_json::from_str::<Unit>(json).is_err());
    }

    #[test]
    fn test_serialize_keeps_type_name_and_nulls() {
        let unit = Unit::from_source("ZREPORT", "WRITE 1.");
        let value = serde_json::to_value(&unit).unwrap();

        assert_eq!(value["type"], "PROG");
        assert_eq!(value["inc_name"], "ZREPORT");
        assert!(value["name"].is_null());
        assert!(value["start_line"].is_null());
        assert_eq!(value["code"], "WRITE 1.");
    }

    #[test]
    fn test_label() {
        let mut unit = Unit::from_source("ZREPORT", "");
        assert_eq!(unit.label(), "ZREPORT");

        unit.name = Some("GET_DATA".to_string());
        assert_eq!(unit.label(), "ZREPORT/GET_DATA");
    }

    #[test]
    fn test_position() {
        let unit = Unit::from_source("Z", "DATA a TYPE i.\nIF a IS INITIAL.\n");
        assert_eq!(unit.position(0), (1, 1));
        assert_eq!(unit.position(5), (1, 6));
        assert_eq!(unit.position(18), (2, 4));
    }

    #[test]
    fn test_position_offset_by_start_line() {
        let mut unit = Unit::from_source("Z", "a\nb");
        unit.start_line = Some(100);
        assert_eq!(unit.position(0), (100, 1));
        assert_eq!(unit.position(2), (101, 1));
    }

    #[test]
    fn test_line_at() {
        let unit = Unit::from_source("Z", "first\r\nsecond line\nthird");
        assert_eq!(unit.line_at(0), "first");
        assert_eq!(unit.line_at(9), "second line");
        assert_eq!(unit.line_at(21), "third");
        assert_eq!(unit.line_at(500), "third");
    }

    #[test]
    fn test_annotated_unit_has_findings() {
        let annotated = AnnotatedUnit {
            unit: Unit::from_source("Z", ""),
            findings: Vec::new(),
        };
        assert!(!annotated.has_findings());
    }
}
