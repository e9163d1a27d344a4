use crate::age::AgeEstimate;
use crate::core::MeasurementKind;
use crate::formatting::{
    paint_risk, paint_status, risk_glyph, status_glyph, ColoredFormatter, FormattingConfig,
    OutputFormatter,
};
use crate::inflammation::NlrAssessment;
use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};
use serde_json;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" => Some(Self::Markdown),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

/// Report envelope around one scoring outcome.
///
/// The engine itself never touches the clock; the timestamp is stamped
/// here, at the reporting boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub body: ReportBody,
}

impl ScoreReport {
    pub fn new(body: ReportBody) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportBody {
    Nlr(NlrAssessment),
    Age(AgeEstimate),
    Batch(BatchSummary),
    Tables(TableCoverage),
}

impl ReportBody {
    fn title(&self) -> &'static str {
        match self {
            ReportBody::Nlr(_) => "NLR Assessment",
            ReportBody::Age(_) => "Biological Age Estimate",
            ReportBody::Batch(_) => "Batch Scoring Report",
            ReportBody::Tables(_) => "Reference Dataset Coverage",
        }
    }
}

/// One record's fate in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// 1-based position in the input file
    pub record: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nlr: Option<NlrAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<AgeEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordOutcome {
    pub fn is_scored(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub records: usize,
    pub scored: usize,
    pub failed: usize,
    pub quota_rejected: usize,
    pub outcomes: Vector<RecordOutcome>,
}

/// Coverage of a reference dataset, for the `tables` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCoverage {
    /// "builtin" or the dataset path
    pub source: String,
    pub tables: usize,
    pub kinds: Vector<KindCoverage>,
    pub missing: Vector<MeasurementKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindCoverage {
    pub kind: MeasurementKind,
    pub category: String,
    pub scopes: Vector<String>,
    pub bands: usize,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &ScoreReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        match &report.body {
            ReportBody::Nlr(assessment) => self.write_nlr(assessment),
            ReportBody::Age(estimate) => self.write_age(estimate),
            ReportBody::Batch(summary) => self.write_batch(summary),
            ReportBody::Tables(coverage) => self.write_tables(coverage),
        }
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# {}", report.body.title())?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", report.version)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_nlr(&mut self, assessment: &NlrAssessment) -> anyhow::Result<()> {
        writeln!(self.writer, "| Measure | Value |")?;
        writeln!(self.writer, "|---------|-------|")?;
        writeln!(
            self.writer,
            "| Neutrophils | {:.2} x10^9/L |",
            assessment.neutrophils
        )?;
        writeln!(
            self.writer,
            "| Lymphocytes | {:.2} x10^9/L |",
            assessment.lymphocytes
        )?;
        writeln!(self.writer, "| Ratio | {:.2} |", assessment.ratio)?;
        writeln!(self.writer, "| Policy | {} |", assessment.policy)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**Risk level**: {}",
            assessment.risk_level.description()
        )?;
        Ok(())
    }

    fn write_age(&mut self, estimate: &AgeEstimate) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Chronological age | {:.1} |",
            estimate.chronological_age
        )?;
        writeln!(
            self.writer,
            "| Biological age | {:.1} |",
            estimate.biological_age
        )?;
        writeln!(
            self.writer,
            "| Differential | {:+.1} |",
            estimate.differential_age
        )?;
        writeln!(
            self.writer,
            "| Status | {} |",
            estimate.status.display_label()
        )?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Measurement Breakdown")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Measurement | Category | Value | Partial age |"
        )?;
        writeln!(
            self.writer,
            "|-------------|----------|-------|-------------|"
        )?;
        for partial in &estimate.partial_ages {
            writeln!(
                self.writer,
                "| {} | {} | {} {} | {:.1} |",
                partial.kind,
                partial.kind.category(),
                partial.value,
                partial.kind.unit(),
                partial.years
            )?;
        }
        Ok(())
    }

    fn write_batch(&mut self, summary: &BatchSummary) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Records | {} |", summary.records)?;
        writeln!(self.writer, "| Scored | {} |", summary.scored)?;
        writeln!(self.writer, "| Failed | {} |", summary.failed)?;
        writeln!(
            self.writer,
            "| Quota rejected | {} |",
            summary.quota_rejected
        )?;
        writeln!(self.writer)?;

        let failures: Vec<_> = summary
            .outcomes
            .iter()
            .filter(|outcome| !outcome.is_scored())
            .collect();
        if !failures.is_empty() {
            writeln!(self.writer, "## Failures ({} records)", failures.len())?;
            writeln!(self.writer)?;
            for outcome in failures.iter().take(10) {
                let submitter = outcome.submitter.as_deref().unwrap_or("-");
                writeln!(
                    self.writer,
                    "- record {} ({}): {}",
                    outcome.record,
                    submitter,
                    outcome.error.as_deref().unwrap_or("unknown failure")
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_tables(&mut self, coverage: &TableCoverage) -> anyhow::Result<()> {
        writeln!(self.writer, "Source: {}", coverage.source)?;
        writeln!(self.writer, "Tables: {}", coverage.tables)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Kind | Category | Scopes | Bands |")?;
        writeln!(self.writer, "|------|----------|--------|-------|")?;
        for kind in &coverage.kinds {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                kind.kind,
                kind.category,
                kind.scopes.iter().cloned().collect::<Vec<_>>().join(", "),
                kind.bands
            )?;
        }
        if !coverage.missing.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "## Missing kinds")?;
            writeln!(self.writer)?;
            for kind in &coverage.missing {
                writeln!(self.writer, "- {kind}")?;
            }
        }
        Ok(())
    }
}

pub struct TerminalWriter {
    formatting: FormattingConfig,
}

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new(FormattingConfig::default())
    }
}

impl TerminalWriter {
    pub fn new(formatting: FormattingConfig) -> Self {
        Self { formatting }
    }
}

impl ReportWriter for TerminalWriter {
    fn write_report(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        let formatter = ColoredFormatter::new(self.formatting);
        print_title(&formatter, &report.body);
        match &report.body {
            ReportBody::Nlr(assessment) => print_nlr(&formatter, assessment),
            ReportBody::Age(estimate) => print_age(&formatter, estimate),
            ReportBody::Batch(summary) => print_batch(&formatter, summary),
            ReportBody::Tables(coverage) => print_tables(&formatter, coverage),
        }
        Ok(())
    }
}

fn print_title(formatter: &ColoredFormatter, body: &ReportBody) {
    let title = body.title();
    println!("{}", formatter.header(title));
    println!("{}", formatter.header(&"=".repeat(title.len())));
    println!();
}

fn print_nlr(formatter: &ColoredFormatter, assessment: &NlrAssessment) {
    println!("  Neutrophils: {:.2} x10^9/L", assessment.neutrophils);
    println!("  Lymphocytes: {:.2} x10^9/L", assessment.lymphocytes);
    println!(
        "  Ratio: {} (policy: {})",
        formatter.bold(&format!("{:.2}", assessment.ratio)),
        assessment.policy
    );
    println!();

    let (glyph, fallback) = risk_glyph(assessment.risk_level);
    println!(
        "{} Risk level: {}",
        formatter.emoji(glyph, fallback),
        paint_risk(
            formatter,
            assessment.risk_level,
            assessment.risk_level.description()
        )
    );
}

fn print_age(formatter: &ColoredFormatter, estimate: &AgeEstimate) {
    println!("  Chronological age: {:.1}", estimate.chronological_age);
    println!(
        "  Biological age: {}",
        formatter.bold(&format!("{:.1}", estimate.biological_age))
    );
    println!("  Differential: {:+.1}", estimate.differential_age);
    println!();

    let (glyph, fallback) = status_glyph(estimate.status);
    println!(
        "{} Status: {}",
        formatter.emoji(glyph, fallback),
        paint_status(formatter, estimate.status, estimate.status.display_label())
    );
    println!();

    println!("{}", formatter.bold("Breakdown:"));
    for partial in &estimate.partial_ages {
        println!(
            "  {} = {} {} {}",
            partial.kind,
            partial.value,
            partial.kind.unit(),
            formatter.dim(&format!("(partial age {:.1})", partial.years))
        );
    }
}

fn print_batch(formatter: &ColoredFormatter, summary: &BatchSummary) {
    println!("  Records: {}", summary.records);
    println!(
        "  Scored: {}",
        formatter.success(&summary.scored.to_string())
    );
    let failed = summary.failed.to_string();
    println!(
        "  Failed: {}",
        if summary.failed > 0 {
            formatter.error(&failed)
        } else {
            failed
        }
    );
    let rejected = summary.quota_rejected.to_string();
    println!(
        "  Quota rejected: {}",
        if summary.quota_rejected > 0 {
            formatter.warning(&rejected)
        } else {
            rejected
        }
    );

    let failures: Vec<_> = summary
        .outcomes
        .iter()
        .filter(|outcome| !outcome.is_scored())
        .collect();
    if !failures.is_empty() {
        println!();
        println!("{}", formatter.bold("Failures (first 5):"));
        for outcome in failures.iter().take(5) {
            let submitter = outcome.submitter.as_deref().unwrap_or("-");
            println!(
                "  - record {} ({}): {}",
                outcome.record,
                submitter,
                formatter.error(outcome.error.as_deref().unwrap_or("unknown failure"))
            );
        }
    }
}

fn print_tables(formatter: &ColoredFormatter, coverage: &TableCoverage) {
    println!("  Source: {}", coverage.source);
    println!("  Tables: {}", coverage.tables);
    println!();
    for kind in &coverage.kinds {
        println!(
            "  {} {} ({}) scopes: {} bands: {}",
            formatter.emoji("✓", "[OK]"),
            formatter.bold(&kind.kind.to_string()),
            kind.category,
            kind.scopes.iter().cloned().collect::<Vec<_>>().join(", "),
            kind.bands
        );
    }
    if !coverage.missing.is_empty() {
        println!();
        for kind in &coverage.missing {
            println!(
                "  {} {} has no reference table",
                formatter.emoji("✗", "[MISSING]"),
                formatter.warning(&kind.to_string())
            );
        }
    }
}

pub fn create_writer(format: OutputFormat, formatting: FormattingConfig) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(formatting)),
    }
}

/// Writer targeting a file; terminal format degrades to markdown since
/// ANSI paint has no business in a file.
pub fn create_file_writer(
    format: OutputFormat,
    file: std::fs::File,
) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(file)),
        OutputFormat::Markdown | OutputFormat::Terminal => Box::new(MarkdownWriter::new(file)),
    }
}

/// Route a report to stdout or a file in the requested format
pub fn emit_report(
    report: &ScoreReport,
    format: OutputFormat,
    output: Option<&Path>,
    formatting: FormattingConfig,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            create_file_writer(format, file).write_report(report)
        }
        None => create_writer(format, formatting).write_report(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflammation::{classify_nlr, NlrPolicy};

    fn sample_report() -> ScoreReport {
        let assessment = classify_nlr(4.2, 3.0, NlrPolicy::ClinicalV1).unwrap();
        ScoreReport::new(ReportBody::Nlr(assessment))
    }

    #[test]
    fn test_markdown_writer_emits_sections() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# NLR Assessment"));
        assert!(text.contains("| Ratio | 1.40 |"));
        assert!(text.contains("**Risk level**: Optimal"));
    }

    #[test]
    fn test_json_writer_tags_the_body() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["body"]["kind"], "nlr");
        assert_eq!(value["body"]["risk_level"], "optimal");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_format_names_parse() {
        assert_eq!(OutputFormat::from_name("json"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_name("MARKDOWN"),
            Some(OutputFormat::Markdown)
        );
        assert_eq!(OutputFormat::from_name("csv"), None);
    }
}
