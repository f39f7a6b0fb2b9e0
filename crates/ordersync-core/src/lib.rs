pub mod app_config;
pub mod config;
pub mod correlate;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use correlate::{canonical_key, correlate, merged_columns};
pub use records::{Cell, DetailRecord, MergedDataset, MergedRecord, SummaryRecord, Tabular};

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
