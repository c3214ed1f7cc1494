//! Shared types and configuration for follower-count collection.

pub mod app_config;
pub mod config;
pub mod record;

use thiserror::Error;

pub use app_config::ScraperConfig;
pub use config::{load_scraper_config, load_scraper_config_with};
pub use record::{FollowerCount, InvalidFollowerCount, ResultRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("min delay {min_delay_ms}ms exceeds max delay {max_delay_ms}ms")]
    InvalidDelayRange { min_delay_ms: u64, max_delay_ms: u64 },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}
