use crate::app_config::{
    ScraperConfig, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS, DEFAULT_PROFILE_BASE_URL,
    DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use crate::ConfigError;

/// Load scraper configuration from the process environment.
///
/// Every variable is optional; unset variables fall back to the defaults in
/// [`crate::app_config`].
///
/// # Errors
///
/// Returns `ConfigError` if a value does not parse or the result fails
/// [`ScraperConfig::validate`].
pub fn load_scraper_config() -> Result<ScraperConfig, ConfigError> {
    load_scraper_config_with(|key| std::env::var(key))
}

/// Build scraper configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup
/// instead of `set_var`/`remove_var`.
///
/// # Errors
///
/// Returns `ConfigError` if a value does not parse or the result fails
/// [`ScraperConfig::validate`].
pub fn load_scraper_config_with<F>(lookup: F) -> Result<ScraperConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let min_delay_ms = parse_u64("FTALLY_MIN_DELAY_MS", DEFAULT_MIN_DELAY_MS)?;
    let max_delay_ms = parse_u64("FTALLY_MAX_DELAY_MS", DEFAULT_MAX_DELAY_MS)?;
    let timeout_ms = parse_u64("FTALLY_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
    let profile_base_url = or_default("FTALLY_PROFILE_BASE_URL", DEFAULT_PROFILE_BASE_URL);
    let user_agent = or_default("FTALLY_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("FTALLY_LOG_LEVEL", "info");

    let config = ScraperConfig {
        min_delay_ms,
        max_delay_ms,
        timeout_ms,
        profile_base_url,
        user_agent,
        log_level,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
