//! Local variable declaration scanning
//!
//! Recognizes single-variable declaration headers such as
//!
//! ```text
//! DATA lv_obj TYPE rkeobjnr.
//! DATA: lv_obj TYPE rkeobjnr,
//! STATICS sv_obj TYPE /ns/objnr.
//! ```
//!
//! and records the declared type of each variable. Names and types are
//! case-insensitive and stored upper case. Chained declarations only record
//! their first variable; there is no scope tracking, so a later declaration of
//! the same name replaces an earlier one.

use crate::pattern::Pattern;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DECLARATION: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"\b(?:DATA|STATICS)\b \s* :? \s*
          (?P<name>\w+) \s+
          TYPE \s+
          (?P<type>[\w/]+) \s* [.,]",
    )
    .unwrap()
});

/// Variable name to declared type, both upper case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationMap {
    types: HashMap<String, String>,
}

impl DeclarationMap {
    /// Scan `code` for declarations
    pub fn extract(code: &str) -> Self {
        let mut map = Self::default();

        for m in DECLARATION.matches(code) {
            let (Some(name), Some(type_name)) = (m.group("name"), m.group("type")) else {
                continue;
            };
            map.insert(name.text, type_name.text);
        }

        map
    }

    /// Record a declaration, replacing any earlier one for the same name
    pub fn insert(&mut self, name: &str, type_name: &str) {
        let name = name.to_uppercase();
        let type_name = type_name.to_uppercase();

        if let Some(previous) = self.types.get(&name) {
            if *previous != type_name {
                log::debug!("{name} redeclared: {previous} -> {type_name}");
            }
        }

        self.types.insert(name, type_name);
    }

    /// Declared type of `name` (upper case)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.types.get(&name.to_uppercase()).map(String::as_str)
    }

    /// Check whether `name` is declared with exactly `type_name`
    pub fn declared_type_is(&self, name: &str, type_name: &str) -> bool {
        self.get(name)
            .is_some_and(|declared| declared.eq_ignore_ascii_case(type_name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over (name, type) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_declaration() {
        let map = DeclarationMap::extract("DATA lv_obj TYPE rkeobjnr.");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("lv_obj"), Some("RKEOBJNR"));
    }

    #[test]
    fn test_colon_and_comma_terminator() {
        let map = DeclarationMap::extract("DATA: lv_obj TYPE rkeobjnr, lv_other TYPE i.");
        assert_eq!(map.get("LV_OBJ"), Some("RKEOBJNR"));
        // Only the first variable of a chain is recognized
        assert_eq!(map.get("lv_other"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let map = DeclarationMap::extract("data Lv_Obj type RkeObjNr .");
        assert_eq!(map.get("LV_OBJ"), Some("RKEOBJNR"));
        assert_eq!(map.get("lv_obj"), Some("RKEOBJNR"));
        assert!(map.declared_type_is("lV_oBj", "rkeobjnr"));
    }

    #[test]
    fn test_multiline_declaration() {
        let code = "DATA:\n    lv_obj\n      TYPE\n        rkeobjnr\n.";
        let map = DeclarationMap::extract(code);
        assert_eq!(map.get("lv_obj"), Some("RKEOBJNR"));
    }

    #[test]
    fn test_keyword_prefixed_identifier_not_a_declaration() {
        let map = DeclarationMap::extract("TYPES: BEGIN OF ty, data_obj TYPE rkeobjnr, END OF ty.");
        assert!(map.is_empty());

        let map = DeclarationMap::extract("statics_count TYPE rkeobjnr.");
        assert!(map.is_empty());
    }

    #[test]
    fn test_namespaced_type() {
        let map = DeclarationMap::extract("STATICS sv_obj TYPE /abc/objnr.");
        assert_eq!(map.get("sv_obj"), Some("/ABC/OBJNR"));
    }

    #[test]
    fn test_multiple_statements() {
        let code = r#"
REPORT zcopa.
DATA lv_a TYPE rkeobjnr.
DATA lv_b TYPE string.
DATA: lv_c TYPE i.
"#;
        let map = DeclarationMap::extract(code);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("lv_a"), Some("RKEOBJNR"));
        assert_eq!(map.get("lv_b"), Some("STRING"));
        assert_eq!(map.get("lv_c"), Some("I"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let code = "DATA lv TYPE rkeobjnr. DATA lv TYPE string.";
        let map = DeclarationMap::extract(code);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("lv"), Some("STRING"));

        let code = "DATA lv TYPE string. DATA LV TYPE rkeobjnr.";
        let map = DeclarationMap::extract(code);
        assert_eq!(map.get("lv"), Some("RKEOBJNR"));
    }

    #[test]
    fn test_unterminated_or_complex_declarations_ignored() {
        let code = "DATA lo_ref TYPE REF TO cl_x. DATA lv TYPE rkeobjnr VALUE '1'";
        let map = DeclarationMap::extract(code);
        assert!(map.is_empty());
    }

    #[test]
    fn test_empty_code() {
        let map = DeclarationMap::extract("");
        assert!(map.is_empty());
        assert_eq!(map.get("anything"), None);
        assert!(!map.declared_type_is("anything", "rkeobjnr"));
    }

    #[test]
    fn test_data_inside_identifier_not_matched() {
        let map = DeclarationMap::extract("lv_metadata lv TYPE rkeobjnr.");
        assert!(map.is_empty());
    }

    #[test]
    fn test_iter() {
        let map = DeclarationMap::extract("DATA a TYPE x. DATA b TYPE y.");
        let mut pairs: Vec<(&str, &str)> = map.iter().collect();
        pairs.sort();
        assert_eq!(pairs, vec![("A", "X"), ("B", "Y")]);
    }
}
