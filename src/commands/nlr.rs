use crate::cli;
use crate::config;
use crate::formatting::FormattingConfig;
use crate::inflammation::{classify_nlr, NlrPolicy};
use crate::io::output::{emit_report, ReportBody, ScoreReport};
use anyhow::Result;
use std::path::PathBuf;

pub struct NlrConfig {
    pub neutrophils: f64,
    pub lymphocytes: f64,
    pub policy: Option<NlrPolicy>,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

pub fn handle_nlr(config: NlrConfig) -> Result<()> {
    let policy = config.policy.unwrap_or_else(config::default_policy);
    let assessment = classify_nlr(config.neutrophils, config.lymphocytes, policy)?;
    log::info!(
        "classified ratio {:.2} as {} under {}",
        assessment.ratio,
        assessment.risk_level,
        assessment.policy
    );

    let report = ScoreReport::new(ReportBody::Nlr(assessment));
    emit_report(
        &report,
        super::resolve_format(config.format),
        config.output.as_deref(),
        config.formatting,
    )
}
