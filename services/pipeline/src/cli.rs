use career_engine::config::PipelineConfig;
use career_engine::error::AppError;
use career_engine::occupations::pipeline::{self, PipelineOptions};
use career_engine::telemetry;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(
    name = "career-pipeline",
    about = "Merge occupation datasets and classify AI resilience into published JSON",
    version
)]
pub(crate) struct Cli {
    /// Directory holding the source datasets
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Directory the careers JSON artifacts are written to
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Recompute every assessment instead of reusing cached timestamps
    #[arg(long)]
    pub(crate) refresh: bool,
    /// Assess occupations on a single thread
    #[arg(long)]
    pub(crate) sequential: bool,
    /// Override the configured log level or filter
    #[arg(long)]
    pub(crate) log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.data_dir {
            config.data.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.data.output_dir = dir.clone();
        }
        if self.sequential {
            config.data.parallel = false;
        }
        if let Some(level) = &self.log_level {
            config.telemetry.log_level = level.clone();
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = PipelineConfig::load()?;
    cli.apply(&mut config);
    telemetry::init(&config.telemetry)?;

    info!(
        environment = ?config.environment,
        data_dir = %config.data.data_dir.display(),
        output_dir = %config.data.output_dir.display(),
        refresh = cli.refresh,
        "starting career data pipeline"
    );

    let options = PipelineOptions {
        refresh: cli.refresh,
        now: Utc::now(),
    };
    let outcome = pipeline::run(&config.data, &options)?;

    for path in &outcome.artifacts {
        println!("{}", path.display());
    }
    Ok(())
}
