//! copa-remediate: remediation advisor for deprecated CO-PA constructs in ABAP
//!
//! Scans ABAP source units for the two constructs retired by SAP Note 3320010
//! and attaches a located replacement suggestion to every occurrence:
//!
//! - `IS [NOT] INITIAL` checks on variables typed `RKEOBJNR` (the `PAOBJNR`
//!   profitability segment number), to be replaced by
//!   `cl_fco_copa_paobjnr=>is_initial( ... )`
//! - references to the CDS field `ProfitabilitySegment`, renamed to
//!   `ProfitabilitySegment_2`
//!
//! # Architecture
//!
//! ```text
//! CLI -> input -> Remediator -> DeclarationMap -> [Detector...] -> output
//! ```
//!
//! # Example
//!
//! ```
//! use copa_remediate::{Config, FindingKind, Remediator};
//!
//! let remediator = Remediator::new(Config::default()).unwrap();
//! let findings = remediator.analyze("DATA: lv_obj TYPE rkeobjnr. IF lv_obj IS NOT INITIAL.");
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].kind, FindingKind::InitialCheck { negated: true });
//! assert_eq!(
//!     findings[0].suggested_statement,
//!     "cl_fco_copa_paobjnr=>is_initial( lv_obj ) = abap_false"
//! );
//! ```

pub mod config;
pub mod declarations;
pub mod detectors;
pub mod engine;
pub mod finding;
pub mod input;
pub mod output;
pub mod pattern;
pub mod unit;

pub use config::{CliOptions, Config, ConfigError};
pub use declarations::DeclarationMap;
pub use detectors::{DetectionContext, Detector};
pub use engine::{RemediationStats, Remediator};
pub use finding::{Finding, FindingKind, Span, Target, TargetType};
pub use input::InputError;
pub use pattern::{Capture, Pattern, PatternMatch};
pub use unit::{AnnotatedUnit, Unit};
