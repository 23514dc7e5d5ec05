//! Configuration handling for copa-remediate

use crate::detectors::{self, deprecated_field, initial_check};
use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w/]+$").unwrap());

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("Failed to parse YAML config: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] globset::Error),
    #[error("Unknown detector: {0}")]
    UnknownDetector(String),
    #[error("Invalid ABAP identifier for {setting}: {value:?}")]
    InvalidIdentifier { setting: &'static str, value: String },
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Settings of the initial-check detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialCheckSettings {
    /// Data element whose initial checks are reported
    pub retired_type: String,
    /// Class providing the replacement `is_initial( )` method
    pub helper_class: String,
}

impl Default for InitialCheckSettings {
    fn default() -> Self {
        Self {
            retired_type: initial_check::RETIRED_TYPE.to_string(),
            helper_class: initial_check::HELPER_CLASS.to_string(),
        }
    }
}

/// Settings of the deprecated-field detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedFieldSettings {
    /// Retired field name
    pub field: String,
    /// Field name to use instead
    pub replacement: String,
}

impl Default for DeprecatedFieldSettings {
    fn default() -> Self {
        Self {
            field: deprecated_field::RETIRED_FIELD.to_string(),
            replacement: deprecated_field::REPLACEMENT_FIELD.to_string(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Only run these detectors (if Some)
    pub enabled_detectors: Option<Vec<String>>,
    /// Skip these detectors
    pub disabled_detectors: Vec<String>,
    /// Only report initial checks on variables declared with the retired type
    pub type_filter: bool,
    /// Input file patterns to skip
    pub exclude_patterns: GlobSet,
    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: usize,
    /// Verbose output
    pub verbose: bool,
    /// Show statistics at the end
    pub statistics: bool,
    pub initial_check: InitialCheckSettings,
    pub deprecated_field: DeprecatedFieldSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_detectors: None,
            disabled_detectors: Vec::new(),
            type_filter: true,
            exclude_patterns: GlobSet::empty(),
            jobs: 0,
            verbose: false,
            statistics: false,
            initial_check: InitialCheckSettings::default(),
            deprecated_field: DeprecatedFieldSettings::default(),
        }
    }
}

/// CLI options to merge into config
#[derive(Debug, Default)]
pub struct CliOptions {
    /// Detectors to enable (replaces config if set)
    pub enabled_detectors: Option<Vec<String>>,
    /// Detectors to disable (adds to config)
    pub disabled_detectors: Vec<String>,
    /// Override type filtering
    pub type_filter: Option<bool>,
    pub verbose: bool,
    pub statistics: bool,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Configuration file format (.coparc.json or .coparc.yaml)
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Detectors to enable (if specified, only these run)
    #[serde(default)]
    pub select: Vec<String>,

    /// Detectors to disable
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Initial-check type filtering (default: true)
    #[serde(default)]
    pub type_filter: Option<bool>,

    /// Input file patterns to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto)
    #[serde(default)]
    pub jobs: usize,

    #[serde(default)]
    pub initial_check: InitialCheckSection,

    #[serde(default)]
    pub deprecated_field: DeprecatedFieldSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InitialCheckSection {
    #[serde(default)]
    pub retired_type: Option<String>,
    #[serde(default)]
    pub helper_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeprecatedFieldSection {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub replacement: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config_file: ConfigFile = if path.extension().is_some_and(|e| e == "yaml" || e == "yml")
        {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Self::from_config_file(config_file)
    }

    /// Try to find and load config from standard locations
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let config_names = [
            ".coparc.json",
            ".coparc.yaml",
            ".coparc.yml",
            ".coparc",
            "copa-remediate.json",
            "copa-remediate.yaml",
        ];

        let mut current = start_dir.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    let config = Self::from_file(&config_path)?;
                    return Ok(Some((config_path, config)));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Build config from a ConfigFile
    fn from_config_file(file: ConfigFile) -> Result<Self, ConfigError> {
        for id in file.select.iter().chain(&file.ignore) {
            if !detectors::is_known(id) {
                return Err(ConfigError::UnknownDetector(id.clone()));
            }
        }

        let mut exclude_builder = GlobSetBuilder::new();
        for pattern in &file.exclude {
            exclude_builder.add(Glob::new(pattern)?);
        }
        let exclude_patterns = exclude_builder.build()?;

        let defaults = Config::default();
        let initial_check = InitialCheckSettings {
            retired_type: identifier(
                "initialCheck.retiredType",
                file.initial_check.retired_type,
                defaults.initial_check.retired_type,
            )?,
            helper_class: identifier(
                "initialCheck.helperClass",
                file.initial_check.helper_class,
                defaults.initial_check.helper_class,
            )?,
        };
        let deprecated_field = DeprecatedFieldSettings {
            field: identifier(
                "deprecatedField.field",
                file.deprecated_field.field,
                defaults.deprecated_field.field,
            )?,
            replacement: identifier(
                "deprecatedField.replacement",
                file.deprecated_field.replacement,
                defaults.deprecated_field.replacement,
            )?,
        };

        Ok(Self {
            enabled_detectors: if file.select.is_empty() {
                None
            } else {
                Some(file.select)
            },
            disabled_detectors: file.ignore,
            type_filter: file.type_filter.unwrap_or(true),
            exclude_patterns,
            jobs: file.jobs,
            verbose: false,
            statistics: false,
            initial_check,
            deprecated_field,
        })
    }

    /// Merge CLI options into this config (CLI takes precedence)
    pub fn merge_cli(&mut self, opts: CliOptions) -> Result<(), ConfigError> {
        let cli_ids = opts.enabled_detectors.iter().flatten();
        for id in cli_ids.chain(&opts.disabled_detectors) {
            if !detectors::is_known(id) {
                return Err(ConfigError::UnknownDetector(id.clone()));
            }
        }

        if opts.enabled_detectors.is_some() {
            self.enabled_detectors = opts.enabled_detectors;
        }

        self.disabled_detectors.extend(opts.disabled_detectors);

        if let Some(filter) = opts.type_filter {
            self.type_filter = filter;
        }

        self.verbose = opts.verbose;
        self.statistics = opts.statistics;

        if let Some(j) = opts.jobs {
            self.jobs = j;
        }

        Ok(())
    }

    /// Check if a detector is enabled
    pub fn is_detector_enabled(&self, id: &str) -> bool {
        if self.disabled_detectors.iter().any(|d| d == id) {
            return false;
        }

        if let Some(ref enabled) = self.enabled_detectors {
            return enabled.iter().any(|d| d == id);
        }

        true
    }

    /// Check if an input file should be skipped
    pub fn is_file_excluded(&self, file_path: &Path) -> bool {
        self.exclude_patterns.is_match(file_path)
    }
}

fn identifier(
    setting: &'static str,
    value: Option<String>,
    default: String,
) -> Result<String, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) if IDENTIFIER.is_match(&value) => Ok(value),
        Some(value) => Err(ConfigError::InvalidIdentifier { setting, value }),
    }
}
