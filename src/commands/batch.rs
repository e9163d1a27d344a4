use crate::age::tables::RangeTables;
use crate::age::{estimate_age, BiometricPanel};
use crate::cli;
use crate::config;
use crate::core::{Gender, MeasurementKind};
use crate::formatting::FormattingConfig;
use crate::inflammation::{classify_nlr, NlrPolicy};
use crate::io;
use crate::io::output::{emit_report, BatchSummary, RecordOutcome, ReportBody, ScoreReport};
use crate::quota::{check_quota, record_submission, SubmitterAccount};
use anyhow::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

pub struct BatchConfig {
    pub input: PathBuf,
    pub tables: Option<PathBuf>,
    pub jobs: usize,
    pub parallel: bool,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// One line of the JSON Lines input
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRecord {
    #[serde(default)]
    pub submitter: Option<String>,
    /// Quota state for this submitter, checked before any scoring
    #[serde(default)]
    pub account: Option<SubmitterAccount>,
    #[serde(default)]
    pub nlr: Option<NlrCounts>,
    #[serde(default)]
    pub panel: Option<PanelSubmission>,
    /// Per-record policy override
    #[serde(default)]
    pub policy: Option<NlrPolicy>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NlrCounts {
    pub neutrophils: f64,
    pub lymphocytes: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelSubmission {
    pub chronological_age: f64,
    pub gender: Gender,
    pub measurements: BTreeMap<MeasurementKind, f64>,
}

struct Admission {
    admitted: Vec<(usize, BatchRecord)>,
    rejected: Vec<RecordOutcome>,
    quota_rejected: usize,
}

pub fn handle_batch(config: BatchConfig) -> Result<()> {
    let (tables, source) = super::resolve_tables(config.tables.as_deref())?;
    log::debug!("using reference dataset: {source}");
    let default_policy = config::default_policy();

    let raw = io::read_file(&config.input)
        .with_context(|| format!("Failed to read batch input {}", config.input.display()))?;

    // Admission is sequential: quota state per submitter evolves in line
    // order, the way the host's transaction sequence would apply it.
    // Scoring itself is pure and can then fan out freely.
    let admission = admit_records(&raw, config::default_submission_limit());
    let records = admission.admitted.len() + admission.rejected.len();

    if config.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build_global()
            .ok(); // Ignore if already configured
    }

    let scored: Vec<RecordOutcome> = if config.parallel {
        let bar = progress_bar(admission.admitted.len() as u64);
        admission
            .admitted
            .par_iter()
            .progress_with(bar)
            .map(|(line, record)| score_record(*line, record, &tables, default_policy))
            .collect()
    } else {
        admission
            .admitted
            .iter()
            .map(|(line, record)| score_record(*line, record, &tables, default_policy))
            .collect()
    };

    let mut outcomes = admission.rejected;
    outcomes.extend(scored);
    outcomes.sort_by_key(|outcome| outcome.record);

    let summary = summarize(records, admission.quota_rejected, outcomes);
    log::info!(
        "batch scored {} of {} records ({} failed, {} quota-rejected)",
        summary.scored,
        summary.records,
        summary.failed,
        summary.quota_rejected
    );

    let report = ScoreReport::new(ReportBody::Batch(summary));
    emit_report(
        &report,
        super::resolve_format(config.format),
        config.output.as_deref(),
        config.formatting,
    )
}

fn admit_records(raw: &str, default_limit: u32) -> Admission {
    let mut admitted = Vec::new();
    let mut rejected = Vec::new();
    let mut quota_rejected = 0;
    let mut accounts: HashMap<String, SubmitterAccount> = HashMap::new();

    for (index, line) in raw.lines().enumerate() {
        let record_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: BatchRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                rejected.push(failure(record_no, None, format!("invalid record: {e}")));
                continue;
            }
        };

        // The first account seen for a submitter seeds the state; later
        // records for the same submitter run against the evolved state.
        // A named submitter without a host account gets a default member
        // account, so batch files cannot sidestep the quota.
        let admission = match (record.submitter.as_deref(), record.account) {
            (None, None) => Ok(()),
            (None, Some(account)) => check_quota(&account),
            (Some(name), account) => {
                let entry = accounts
                    .entry(name.to_string())
                    .or_insert_with(|| {
                        account.unwrap_or_else(|| SubmitterAccount::member(default_limit))
                    });
                check_quota(entry).map(|()| *entry = record_submission(*entry))
            }
        };

        match admission {
            Ok(()) => admitted.push((record_no, record)),
            Err(e) => {
                quota_rejected += 1;
                rejected.push(failure(record_no, record.submitter.clone(), e.to_string()));
            }
        }
    }

    Admission {
        admitted,
        rejected,
        quota_rejected,
    }
}

fn score_record(
    record_no: usize,
    record: &BatchRecord,
    tables: &RangeTables,
    default_policy: NlrPolicy,
) -> RecordOutcome {
    if record.nlr.is_none() && record.panel.is_none() {
        return failure(
            record_no,
            record.submitter.clone(),
            "empty submission: no nlr counts or panel".to_string(),
        );
    }

    let mut outcome = RecordOutcome {
        record: record_no,
        submitter: record.submitter.clone(),
        nlr: None,
        age: None,
        error: None,
    };

    if let Some(counts) = record.nlr {
        let policy = record.policy.unwrap_or(default_policy);
        match classify_nlr(counts.neutrophils, counts.lymphocytes, policy) {
            Ok(assessment) => outcome.nlr = Some(assessment),
            Err(e) => return failure(record_no, record.submitter.clone(), e.to_string()),
        }
    }

    if let Some(panel) = &record.panel {
        let mut biometric = BiometricPanel::new(panel.gender);
        biometric.measurements = panel.measurements.clone();
        match estimate_age(panel.chronological_age, &biometric, tables) {
            Ok(estimate) => outcome.age = Some(estimate),
            Err(e) => return failure(record_no, record.submitter.clone(), e.to_string()),
        }
    }

    outcome
}

fn failure(record: usize, submitter: Option<String>, error: String) -> RecordOutcome {
    RecordOutcome {
        record,
        submitter,
        nlr: None,
        age: None,
        error: Some(error),
    }
}

fn summarize(records: usize, quota_rejected: usize, outcomes: Vec<RecordOutcome>) -> BatchSummary {
    let scored = outcomes.iter().filter(|o| o.is_scored()).count();
    BatchSummary {
        records,
        scored,
        failed: records - scored - quota_rejected,
        quota_rejected,
        outcomes: outcomes.into_iter().collect(),
    }
}

/// Hidden in quiet mode and when stderr is not a TTY
fn progress_bar(len: u64) -> ProgressBar {
    use std::io::IsTerminal;

    if std::env::var("BIOSCORE_QUIET").is_ok() || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("🧪 {msg} {pos}/{len} records ({percent}%) - {eta}")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░  "),
    );
    bar.set_message("Scoring");
    bar
}
