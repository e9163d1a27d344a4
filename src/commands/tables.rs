use crate::age::tables::RangeTables;
use crate::cli;
use crate::core::MeasurementKind;
use crate::formatting::FormattingConfig;
use crate::io::output::{emit_report, KindCoverage, ReportBody, ScoreReport, TableCoverage};
use anyhow::Result;
use im::Vector;
use std::path::PathBuf;

pub struct TablesConfig {
    pub tables: Option<PathBuf>,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Structural validation happens while loading; reaching the coverage
/// report means the dataset is sound.
pub fn handle_tables(config: TablesConfig) -> Result<()> {
    let (tables, source) = super::resolve_tables(config.tables.as_deref())?;

    let coverage = build_coverage(&tables, source);
    log::info!(
        "validated {} tables covering {} of {} kinds",
        coverage.tables,
        coverage.kinds.len(),
        MeasurementKind::all().len()
    );

    let report = ScoreReport::new(ReportBody::Tables(coverage));
    emit_report(
        &report,
        super::resolve_format(config.format),
        config.output.as_deref(),
        config.formatting,
    )
}

fn build_coverage(tables: &RangeTables, source: String) -> TableCoverage {
    let mut kinds = Vector::new();
    let mut missing = Vector::new();

    for kind in MeasurementKind::all() {
        let scoped: Vec<_> = tables.iter().filter(|table| table.kind == *kind).collect();
        if scoped.is_empty() {
            missing.push_back(*kind);
            continue;
        }
        kinds.push_back(KindCoverage {
            kind: *kind,
            category: kind.category().to_string(),
            scopes: scoped
                .iter()
                .map(|table| table.scope_label().to_string())
                .collect(),
            bands: scoped.iter().map(|table| table.bands.len()).sum(),
        });
    }

    TableCoverage {
        source,
        tables: tables.len(),
        kinds,
        missing,
    }
}
