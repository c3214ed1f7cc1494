use crate::ConfigError;

pub const DEFAULT_MIN_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 1_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://www.instagram.com";
pub const DEFAULT_USER_AGENT: &str = "ftally/0.1 (follower-count)";

/// Tunables for a collection run.
///
/// Delays and the per-identifier timeout are in milliseconds. A value built
/// through [`crate::load_scraper_config`] has already passed [`Self::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_ms: u64,
    pub profile_base_url: String,
    pub user_agent: String,
    pub log_level: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            profile_base_url: DEFAULT_PROFILE_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

/// Checks a delay range and per-identifier timeout, all in milliseconds.
///
/// # Errors
///
/// - [`ConfigError::InvalidDelayRange`] when `min_delay_ms > max_delay_ms`.
/// - [`ConfigError::ZeroTimeout`] when `timeout_ms == 0`.
pub fn validate_timing(
    min_delay_ms: u64,
    max_delay_ms: u64,
    timeout_ms: u64,
) -> Result<(), ConfigError> {
    if min_delay_ms > max_delay_ms {
        return Err(ConfigError::InvalidDelayRange {
            min_delay_ms,
            max_delay_ms,
        });
    }
    if timeout_ms == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
}

impl ScraperConfig {
    /// Checks the delay range and timeout.
    ///
    /// # Errors
    ///
    /// Same as [`validate_timing`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timing(self.min_delay_ms, self.max_delay_ms, self.timeout_ms)
    }
}
