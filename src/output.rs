//! Output formatters for remediation results
//!
//! The JSON format is the wire contract consumed by downstream tooling: the
//! input units echoed back, each with a `copa_usage` list. Fields that the
//! internal model leaves empty are written as the literal strings `"None"` and
//! `"Unknown"` that downstream consumers expect.

use crate::finding::Finding;
use crate::unit::{AnnotatedUnit, Unit};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

const NONE: &str = "None";
const UNKNOWN_TARGET: &str = "Unknown";

/// One finding in wire form
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WireFinding<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub table: &'static str,
    pub target_type: &'static str,
    pub target_name: &'a str,
    pub start_char_in_unit: usize,
    pub end_char_in_unit: usize,
    pub used_fields: &'a [String],
    pub ambiguous: bool,
    pub suggested_statement: &'a str,
    pub suggested_fields: Option<&'a [String]>,
}

impl<'a> From<&'a Finding> for WireFinding<'a> {
    fn from(finding: &'a Finding) -> Self {
        let (target_type, target_name) = match &finding.target {
            Some(target) => (
                target.target_type.as_str(),
                target.name.as_deref().unwrap_or(UNKNOWN_TARGET),
            ),
            None => (NONE, NONE),
        };

        Self {
            kind: finding.kind.as_str(),
            table: NONE,
            target_type,
            target_name,
            start_char_in_unit: finding.span.start,
            end_char_in_unit: finding.span.end,
            used_fields: &finding.used_fields,
            ambiguous: finding.ambiguous,
            suggested_statement: &finding.suggested_statement,
            suggested_fields: finding.suggested_fields.as_deref(),
        }
    }
}

/// One annotated unit in wire form
#[derive(Debug, Serialize)]
pub struct WireUnit<'a> {
    #[serde(flatten)]
    pub unit: &'a Unit,
    pub copa_usage: Vec<WireFinding<'a>>,
}

/// Convert annotated units to their wire form, preserving order
pub fn to_wire(units: &[AnnotatedUnit]) -> Vec<WireUnit<'_>> {
    units
        .iter()
        .map(|u| WireUnit {
            unit: &u.unit,
            copa_usage: u.findings.iter().map(WireFinding::from).collect(),
        })
        .collect()
}

/// Serialize annotated units as a JSON array
pub fn format_json(units: &[AnnotatedUnit], pretty: bool) -> serde_json::Result<String> {
    let wire = to_wire(units);
    if pretty {
        serde_json::to_string_pretty(&wire)
    } else {
        serde_json::to_string(&wire)
    }
}

/// Print annotated units as a JSON array
pub fn print_json(units: &[AnnotatedUnit], pretty: bool) -> io::Result<()> {
    let json = format_json(units, pretty)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json)
}

/// Write findings in human-readable text format
pub fn write_text<W: Write>(out: &mut W, units: &[AnnotatedUnit]) -> io::Result<()> {
    for annotated in units {
        let unit = &annotated.unit;

        for finding in &annotated.findings {
            let (line, column) = unit.position(finding.span.start);

            // Header: kind[detector-id]: label
            writeln!(
                out,
                "{}[{}]: {}",
                finding.kind.as_str().yellow().bold(),
                finding.detector,
                finding.kind.label()
            )?;

            // Location: --> PROGRAM/INCLUDE:line:column
            writeln!(
                out,
                "  {} {}:{}:{}",
                "-->".blue().bold(),
                unit.label(),
                line,
                column
            )?;

            let source_line = unit.line_at(finding.span.start);
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            writeln!(out, "   {} |", padding)?;
            writeln!(out, " {} | {}", line_num.blue().bold(), source_line)?;

            // Underline up to the end of the line; multi-line matches stop there
            let remaining = source_line.chars().count().saturating_sub(column - 1);
            let underline = "^".repeat(finding.span.len().min(remaining).max(1));
            writeln!(
                out,
                "   {} | {}{}",
                padding,
                " ".repeat(column - 1),
                underline.yellow().bold()
            )?;

            writeln!(
                out,
                "   {} {}: {}",
                "=".blue().bold(),
                "replace with".green().bold(),
                finding.suggested_statement
            )?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Print findings in human-readable text format
pub fn print_text(units: &[AnnotatedUnit]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_text(&mut handle, units)
}
