//! Shared domain types and configuration for the review sentiment service.

mod app_config;
mod config;
mod locations;
mod review;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, load_offline_config};
pub use locations::{LocationSet, DEFAULT_LOCATIONS};
pub use review::{format_timestamp, parse_timestamp, Review, TIMESTAMP_FORMAT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
#[error("invalid timestamp \"{value}\" (expected YYYY-MM-DD HH:MM:SS): {source}")]
pub struct TimestampError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}
