use std::env;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

pub const DEFAULT_DESCRIPTION_BUDGET: usize = 150;

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl PipelineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("CAREER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("CAREER_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let output_dir =
            env::var("CAREER_OUTPUT_DIR").unwrap_or_else(|_| "public/data".to_string());

        let description_budget = match env::var("CAREER_DESCRIPTION_BUDGET") {
            Ok(raw) => parse_budget(&raw)?,
            Err(_) => DEFAULT_DESCRIPTION_BUDGET,
        };

        let parallel = match env::var("CAREER_PARALLEL") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidParallelFlag(raw))?,
            Err(_) => true,
        };

        let log_level = env::var("CAREER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                data_dir: PathBuf::from(data_dir),
                output_dir: PathBuf::from(output_dir),
                description_budget,
                parallel,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where datasets are read from and artifacts written to.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Character budget for index descriptions.
    pub description_budget: usize,
    pub parallel: bool,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            description_budget: DEFAULT_DESCRIPTION_BUDGET,
            parallel: true,
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(".cache").join("ai_resilience.json")
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CAREER_DESCRIPTION_BUDGET must be a positive integer, got '{0}'")]
    InvalidDescriptionBudget(String),
    #[error("CAREER_PARALLEL must be true/false, got '{0}'")]
    InvalidParallelFlag(String),
}

fn parse_budget(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidDescriptionBudget(raw.to_string())),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
