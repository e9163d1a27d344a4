use anyhow::Result;
use bioscore::cli::{self, Commands};
use bioscore::commands::{
    handle_batch, handle_estimate, handle_nlr, handle_tables, init_config, BatchConfig,
    EstimateConfig, NlrConfig, TablesConfig,
};
use bioscore::formatting::FormattingConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::parse_args();
    let formatting = FormattingConfig::from_env();

    match cli.command {
        Commands::Nlr {
            neutrophils,
            lymphocytes,
            policy,
            format,
            output,
        } => handle_nlr(NlrConfig {
            neutrophils,
            lymphocytes,
            policy: policy.map(Into::into),
            format,
            output,
            formatting,
        }),

        Commands::Estimate {
            age,
            gender,
            panel,
            measure,
            category,
            tables,
            format,
            output,
        } => handle_estimate(EstimateConfig {
            age,
            gender: gender.into(),
            panel_file: panel,
            measures: measure,
            category: category.map(Into::into),
            tables,
            format,
            output,
            formatting,
        }),

        Commands::Batch {
            input,
            tables,
            jobs,
            no_parallel,
            format,
            output,
        } => handle_batch(BatchConfig {
            input,
            tables,
            jobs,
            parallel: !no_parallel,
            format,
            output,
            formatting,
        }),

        Commands::Tables {
            tables,
            format,
            output,
        } => handle_tables(TablesConfig {
            tables,
            format,
            output,
            formatting,
        }),

        Commands::Init { force } => init_config(force),
    }
}
