pub mod app_config;
pub mod config;
pub mod products;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{ProductFilter, ProductRecord, ScrapeRequest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid product record: {field} {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    #[error("invalid scrape request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
