//! CLI command implementations for bioscore operations.
//!
//! Each submodule handles one command with its configuration struct and
//! execution logic:
//!
//! - **nlr**: classify a neutrophil-to-lymphocyte ratio
//! - **estimate**: estimate biological age from a biometric panel
//! - **batch**: score a JSON Lines file of submissions
//! - **tables**: validate a reference dataset and report coverage
//! - **init**: write a default `.bioscore.toml`

pub mod batch;
pub mod estimate;
pub mod init;
pub mod nlr;
pub mod tables;

pub use batch::{handle_batch, BatchConfig};
pub use estimate::{handle_estimate, EstimateConfig};
pub use init::init_config;
pub use nlr::{handle_nlr, NlrConfig};
pub use tables::{handle_tables, TablesConfig};

use crate::age::tables::RangeTables;
use crate::cli;
use crate::config;
use crate::io::output::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;

/// Resolve the output format: CLI flag, then config, then terminal
pub(crate) fn resolve_format(flag: Option<cli::OutputFormat>) -> OutputFormat {
    flag.map(OutputFormat::from).unwrap_or_else(|| {
        OutputFormat::from_name(&config::default_format_name()).unwrap_or(OutputFormat::Terminal)
    })
}

/// Resolve the reference dataset: CLI path, then config path, then builtin.
/// Returns the dataset with a label for reporting.
pub(crate) fn resolve_tables(flag: Option<&Path>) -> Result<(RangeTables, String)> {
    let configured = config::configured_tables_path();
    let path = flag.map(Path::to_path_buf).or(configured);
    match path {
        Some(path) => {
            let tables = RangeTables::load(&path)
                .with_context(|| format!("Failed to load reference tables {}", path.display()))?;
            Ok((tables, path.display().to_string()))
        }
        None => Ok((RangeTables::builtin().clone(), "builtin".to_string())),
    }
}
