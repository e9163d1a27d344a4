use crate::core::{Gender, MeasurementKind, TestCategory};
use crate::inflammation::NlrPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bioscore")]
#[command(about = "Clinical biomarker scoring and biological age estimation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a neutrophil-to-lymphocyte ratio
    Nlr {
        /// Neutrophil count (x10^9 cells/L)
        #[arg(long)]
        neutrophils: f64,

        /// Lymphocyte count (x10^9 cells/L)
        #[arg(long)]
        lymphocytes: f64,

        /// Threshold policy (defaults from .bioscore.toml)
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate biological age from a biometric panel
    Estimate {
        /// Chronological age in years
        #[arg(long)]
        age: f64,

        /// Submitter gender, used for gender-scoped reference tables
        #[arg(short, long, value_enum)]
        gender: GenderArg,

        /// JSON panel file ({"kind": value, ...})
        #[arg(long)]
        panel: Option<PathBuf>,

        /// Inline measurement, repeatable (e.g. --measure body-mass-index=22.5)
        #[arg(short, long = "measure", value_name = "KIND=VALUE", value_parser = parse_measure)]
        measure: Vec<(MeasurementKind, f64)>,

        /// Restrict the estimate to one test category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,

        /// Custom reference dataset (TOML)
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a JSON Lines file of submissions
    Batch {
        /// Input file, one submission per line
        input: PathBuf,

        /// Custom reference dataset (TOML)
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Score sequentially instead of in parallel
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a reference dataset and report coverage
    Tables {
        /// Dataset to validate (builtin when omitted)
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Strict thresholds: optimal below 1.5, extreme at 10 and above
    ClinicalV1,
    /// Permissive thresholds: optimal below 0.7, extreme above 23
    ClinicalV2,
}

impl From<PolicyArg> for NlrPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::ClinicalV1 => NlrPolicy::ClinicalV1,
            PolicyArg::ClinicalV2 => NlrPolicy::ClinicalV2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(g: GenderArg) -> Self {
        match g {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Biophysical,
    Biochemical,
    Genetic,
    Orthomolecular,
}

impl From<CategoryArg> for TestCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Biophysical => TestCategory::Biophysical,
            CategoryArg::Biochemical => TestCategory::Biochemical,
            CategoryArg::Genetic => TestCategory::Genetic,
            CategoryArg::Orthomolecular => TestCategory::Orthomolecular,
        }
    }
}

/// Parse one `kind=value` measurement argument
fn parse_measure(raw: &str) -> Result<(MeasurementKind, f64), String> {
    let (kind_raw, value_raw) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=VALUE, got '{raw}'"))?;
    let kind = MeasurementKind::parse(kind_raw.trim())
        .ok_or_else(|| format!("unknown measurement kind '{}'", kind_raw.trim()))?;
    let value: f64 = value_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid numeric value '{}'", value_raw.trim()))?;
    Ok((kind, value))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_conversion() {
        assert_eq!(NlrPolicy::from(PolicyArg::ClinicalV1), NlrPolicy::ClinicalV1);
        assert_eq!(NlrPolicy::from(PolicyArg::ClinicalV2), NlrPolicy::ClinicalV2);
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Json),
            crate::io::output::OutputFormat::Json
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Markdown),
            crate::io::output::OutputFormat::Markdown
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Terminal),
            crate::io::output::OutputFormat::Terminal
        );
    }

    #[test]
    fn test_cli_parsing_nlr_command() {
        use clap::Parser;

        let args = vec![
            "bioscore",
            "nlr",
            "--neutrophils",
            "4.2",
            "--lymphocytes",
            "3.0",
            "--policy",
            "clinical-v2",
            "--format",
            "json",
        ];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Nlr {
                neutrophils,
                lymphocytes,
                policy,
                format,
                ..
            } => {
                assert_eq!(neutrophils, 4.2);
                assert_eq!(lymphocytes, 3.0);
                assert_eq!(policy, Some(PolicyArg::ClinicalV2));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("Expected Nlr command"),
        }
    }

    #[test]
    fn test_cli_parsing_estimate_command() {
        use clap::Parser;

        let args = vec![
            "bioscore",
            "estimate",
            "--age",
            "50",
            "--gender",
            "female",
            "--measure",
            "body-mass-index=22.5",
            "--measure",
            "telomere-length=6.1",
            "--category",
            "biophysical",
        ];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Estimate {
                age,
                gender,
                measure,
                category,
                ..
            } => {
                assert_eq!(age, 50.0);
                assert_eq!(gender, GenderArg::Female);
                assert_eq!(
                    measure,
                    vec![
                        (MeasurementKind::BodyMassIndex, 22.5),
                        (MeasurementKind::TelomereLength, 6.1),
                    ]
                );
                assert_eq!(category, Some(CategoryArg::Biophysical));
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_cli_parsing_batch_command() {
        use clap::Parser;

        let args = vec!["bioscore", "batch", "panel.jsonl", "--jobs", "4"];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Batch {
                input,
                jobs,
                no_parallel,
                ..
            } => {
                assert_eq!(input, PathBuf::from("panel.jsonl"));
                assert_eq!(jobs, 4);
                assert!(!no_parallel);
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_cli_parsing_init_command() {
        use clap::Parser;

        let args = vec!["bioscore", "init", "--force"];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Init { force } => {
                assert!(force);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_parse_measure_accepts_kind_value_pairs() {
        assert_eq!(
            parse_measure("vital-capacity=4100"),
            Ok((MeasurementKind::VitalCapacity, 4100.0))
        );
        assert_eq!(
            parse_measure(" homocysteine = 9.5 "),
            Ok((MeasurementKind::Homocysteine, 9.5))
        );
    }

    #[test]
    fn test_parse_measure_rejects_malformed_input() {
        assert!(parse_measure("body-mass-index").is_err());
        assert!(parse_measure("bogus-kind=1.0").is_err());
        assert!(parse_measure("body-mass-index=abc").is_err());
    }
}
