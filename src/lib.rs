// Export modules for library usage
pub mod age;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod inflammation;
pub mod io;
pub mod quota;

// Re-export commonly used types
pub use crate::core::errors::{Result, ScoreError};
pub use crate::core::{Gender, MeasurementKind, TestCategory};

pub use crate::inflammation::{classify_nlr, NlrAssessment, NlrPolicy, RiskLevel};

pub use crate::age::tables::{RangeTables, ReferenceBand, ReferenceTable};
pub use crate::age::{
    estimate_age, estimate_category, AgeEstimate, AgeStatus, BiometricPanel, PartialAge,
};

pub use crate::quota::{check_quota, record_submission, SubmitterAccount, SubmitterRole};

pub use crate::io::output::{create_writer, OutputFormat, ReportWriter, ScoreReport};
