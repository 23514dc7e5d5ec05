//! Finding types produced by the detectors

use std::fmt;

/// Half-open character range into a unit's source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// First character (0-based)
    pub start: usize,
    /// One past the last character
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extract the covered text from `code`
    pub fn slice<'a>(&self, code: &'a str) -> Option<&'a str> {
        let mut indices = code.char_indices().map(|(i, _)| i).chain(std::iter::once(code.len()));
        let start = indices.nth(self.start)?;
        let end = if self.is_empty() {
            start
        } else {
            indices.nth(self.len() - 1)?
        };
        Some(&code[start..end])
    }
}

/// What kind of deprecated construct a finding reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    /// `<var> IS [NOT] INITIAL` on a variable of the retired object number type
    InitialCheck {
        /// The check was `IS NOT INITIAL`
        negated: bool,
    },
    /// Reference to a retired CDS field
    DeprecatedField,
}

impl FindingKind {
    /// Wire identifier of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::InitialCheck { .. } => "PAOBJNR_CHECK",
            FindingKind::DeprecatedField => "CDS_FIELD_REPLACEMENT",
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::InitialCheck { negated: false } => "PAOBJNR IS INITIAL check",
            FindingKind::InitialCheck { negated: true } => "PAOBJNR IS NOT INITIAL check",
            FindingKind::DeprecatedField => "deprecated CDS field",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of the schema element a finding implicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    CdsView,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::CdsView => "CDS_VIEW",
        }
    }
}

/// The schema element a finding implicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub target_type: TargetType,
    /// Name of the entity, when it could be resolved
    pub name: Option<String>,
}

/// One detected occurrence of a deprecated construct plus its remediation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Id of the detector that produced this finding
    pub detector: &'static str,
    pub kind: FindingKind,
    pub target: Option<Target>,
    /// Location of the full matched text
    pub span: Span,
    /// Identifiers referenced by the match
    pub used_fields: Vec<String>,
    /// The detector could not settle on a single fix
    pub ambiguous: bool,
    /// Replacement text to substitute for the matched text
    pub suggested_statement: String,
    /// Replacement identifiers, where the fix is a rename
    pub suggested_fields: Option<Vec<String>>,
}

impl Finding {
    pub fn new(
        detector: &'static str,
        kind: FindingKind,
        span: Span,
        suggested_statement: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            kind,
            target: None,
            span,
            used_fields: Vec::new(),
            ambiguous: false,
            suggested_statement: suggested_statement.into(),
            suggested_fields: None,
        }
    }

    pub fn with_target(mut self, target_type: TargetType, name: Option<String>) -> Self {
        self.target = Some(Target { target_type, name });
        self
    }

    pub fn with_used_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suggested_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}
