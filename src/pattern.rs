//! Lexical pattern matching over unit source text
//!
//! A [`Pattern`] is a compiled, case-insensitive regular expression. Scanning a
//! text yields a lazy sequence of non-overlapping [`PatternMatch`]es in document
//! order; calling [`Pattern::matches`] again restarts the scan. Every capture
//! carries both its byte range (for slicing) and its character span (for
//! reporting offsets to consumers that count Unicode characters).

use crate::finding::Span;
use regex::{CaptureMatches, Captures, Regex, RegexBuilder};

/// A compiled case-insensitive pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern in verbose mode: whitespace in `source` is ignored and
    /// `#` starts a comment, so use `\s` for whitespace in the text.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .ignore_whitespace(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Compile a pattern matching `literal` as a whole word
    pub fn word(literal: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(literal)))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Scan `text` from the start
    pub fn matches<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't> {
        Matches {
            text,
            inner: self.regex.captures_iter(text),
            cursor: CharCursor::default(),
        }
    }
}

/// Iterator over the matches of a [`Pattern`] in one text
pub struct Matches<'p, 't> {
    text: &'t str,
    inner: CaptureMatches<'p, 't>,
    cursor: CharCursor,
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = PatternMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.inner.next()?;
        let whole = captures.get(0)?;
        let (start, end) = (whole.start(), whole.end());
        let char_start = self.cursor.advance(self.text, start);
        Some(PatternMatch {
            text: self.text,
            captures,
            start,
            end,
            char_start,
        })
    }
}

/// Converts monotonically increasing byte offsets to character offsets
/// without rescanning the text from the start each time.
#[derive(Debug, Default)]
struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    fn advance(&mut self, text: &str, byte: usize) -> usize {
        if byte < self.byte {
            *self = Self::default();
        }
        self.chars += text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// One match of a pattern
#[derive(Debug)]
pub struct PatternMatch<'t> {
    text: &'t str,
    captures: Captures<'t>,
    start: usize,
    end: usize,
    char_start: usize,
}

impl<'t> PatternMatch<'t> {
    /// The whole match
    pub fn full(&self) -> Capture<'t> {
        self.locate(self.start, self.end)
    }

    /// A named capture group, if it participated in the match
    pub fn group(&self, name: &str) -> Option<Capture<'t>> {
        let m = self.captures.name(name)?;
        Some(self.locate(m.start(), m.end()))
    }

    fn locate(&self, start: usize, end: usize) -> Capture<'t> {
        // Groups never start before the match they belong to
        let char_start = self.char_start + self.text[self.start..start].chars().count();
        let char_end = char_start + self.text[start..end].chars().count();
        Capture {
            text: &self.text[start..end],
            byte_start: start,
            byte_end: end,
            span: Span::new(char_start, char_end),
        }
    }
}

/// A located piece of matched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'t> {
    /// The matched text
    pub text: &'t str,
    /// Byte offset of the first matched byte
    pub byte_start: usize,
    /// Byte offset one past the last matched byte
    pub byte_end: usize,
    /// Character span of the match
    pub span: Span,
}
