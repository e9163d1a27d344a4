use crate::age::{estimate_age, estimate_category, BiometricPanel};
use crate::cli;
use crate::core::{Gender, MeasurementKind, TestCategory};
use crate::formatting::FormattingConfig;
use crate::io;
use crate::io::output::{emit_report, ReportBody, ScoreReport};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub struct EstimateConfig {
    pub age: f64,
    pub gender: Gender,
    pub panel_file: Option<PathBuf>,
    pub measures: Vec<(MeasurementKind, f64)>,
    pub category: Option<TestCategory>,
    pub tables: Option<PathBuf>,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

pub fn handle_estimate(config: EstimateConfig) -> Result<()> {
    let (tables, source) = super::resolve_tables(config.tables.as_deref())?;
    log::debug!("using reference dataset: {source}");

    let panel = build_panel(
        config.gender,
        config.panel_file.as_deref(),
        &config.measures,
    )?;

    let estimate = match config.category {
        Some(category) => estimate_category(config.age, &panel, category, &tables)?,
        None => estimate_age(config.age, &panel, &tables)?,
    };
    log::info!(
        "estimated biological age {:.1} against chronological {:.1} ({})",
        estimate.biological_age,
        estimate.chronological_age,
        estimate.status
    );

    let report = ScoreReport::new(ReportBody::Age(estimate));
    emit_report(
        &report,
        super::resolve_format(config.format),
        config.output.as_deref(),
        config.formatting,
    )
}

/// Panel from file plus inline overrides; inline entries win
fn build_panel(
    gender: Gender,
    panel_file: Option<&std::path::Path>,
    measures: &[(MeasurementKind, f64)],
) -> Result<BiometricPanel> {
    let mut panel = BiometricPanel::new(gender);

    if let Some(path) = panel_file {
        let raw = io::read_file(path)
            .with_context(|| format!("Failed to read panel file {}", path.display()))?;
        let entries: BTreeMap<MeasurementKind, f64> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse panel file {}", path.display()))?;
        panel.measurements = entries;
    }

    for (kind, value) in measures {
        panel.insert(*kind, *value);
    }

    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inline_measures_override_panel_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"body-mass-index": 21.0, "homocysteine": 6.0}}"#
        )
        .unwrap();

        let panel = build_panel(
            Gender::Male,
            Some(file.path()),
            &[(MeasurementKind::BodyMassIndex, 27.0)],
        )
        .unwrap();

        assert_eq!(
            panel.measurements.get(&MeasurementKind::BodyMassIndex),
            Some(&27.0)
        );
        assert_eq!(
            panel.measurements.get(&MeasurementKind::Homocysteine),
            Some(&6.0)
        );
    }

    #[test]
    fn test_unknown_panel_key_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"blood-type": 1.0}}"#).unwrap();

        let result = build_panel(Gender::Male, Some(file.path()), &[]);
        assert!(result.is_err());
    }
}
