//! Loading code units from files and stdin
//!
//! A `.json` input (and stdin) holds an array of units. Any other file is
//! read as a single ABAP source whose program and include are named after
//! the file stem.

use crate::config::Config;
use crate::unit::Unit;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Path that selects stdin
pub const STDIN: &str = "-";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid unit list in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to expand glob: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Parse a JSON array of units
pub fn parse_units(content: &str, origin: &Path) -> Result<Vec<Unit>, InputError> {
    serde_json::from_str(content).map_err(|source| InputError::Json {
        path: origin.to_path_buf(),
        source,
    })
}

/// Read a JSON array of units from a reader
pub fn read_units<R: Read>(mut reader: R, origin: &Path) -> Result<Vec<Unit>, InputError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| InputError::Read {
            path: origin.to_path_buf(),
            source,
        })?;
    parse_units(&content, origin)
}

/// Load the units held by `path` (`-` reads stdin)
pub fn load_units(path: &Path) -> Result<Vec<Unit>, InputError> {
    if path == Path::new(STDIN) {
        return read_units(io::stdin().lock(), path);
    }

    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        parse_units(&content, path)
    } else {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        Ok(vec![Unit::from_source(name, content)])
    }
}

/// Expand input arguments into paths, applying glob patterns and the
/// configured exclusions. `-` is passed through untouched.
pub fn expand(patterns: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, InputError> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let pattern_str = pattern.to_string_lossy();

        if pattern_str == STDIN {
            paths.push(pattern.clone());
            continue;
        }

        if pattern_str.contains('*') {
            for entry in glob::glob(&pattern_str)? {
                let path = entry?;
                if !config.is_file_excluded(&path) {
                    paths.push(path);
                }
            }
        } else if !config.is_file_excluded(pattern) {
            paths.push(pattern.clone());
        } else {
            log::debug!("Excluded: {}", pattern.display());
        }
    }

    Ok(paths)
}
