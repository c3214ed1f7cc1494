//! Sequential batch collection with a per-identifier deadline and jittered
//! pauses between requests.
//!
//! Identifiers are attempted strictly in input order with at most one request
//! in flight. Every attempt produces exactly one [`ResultRecord`]; failures of
//! any kind become [`FollowerCount::UNKNOWN`] and never stop the batch.

use std::future::Future;
use std::time::Duration;

use ftally_core::app_config::{
    validate_timing, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
use ftally_core::{ConfigError, FollowerCount, ResultRecord, ScraperConfig};
use rand::Rng;

use crate::error::ScraperError;

/// Something that can look up a follower count for one identifier.
///
/// [`crate::ProfileClient`] is the production implementation.
pub trait FollowerSource {
    fn fetch_count(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<u64, ScraperError>> + Send;
}

/// Timing policy for [`fetch_all`].
///
/// Construction validates the bounds, so a `BatchPolicy` in hand is always
/// usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    min_delay_ms: u64,
    max_delay_ms: u64,
    timeout_ms: u64,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BatchPolicy {
    /// # Errors
    ///
    /// Same as [`validate_timing`].
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, timeout_ms: u64) -> Result<Self, ConfigError> {
        validate_timing(min_delay_ms, max_delay_ms, timeout_ms)?;
        Ok(Self {
            min_delay_ms,
            max_delay_ms,
            timeout_ms,
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Self::new(config.min_delay_ms, config.max_delay_ms, config.timeout_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    /// Draws a pause uniformly from `[min_delay_ms, max_delay_ms]`, whole
    /// milliseconds, both ends inclusive.
    #[must_use]
    pub fn draw_delay(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Looks up every identifier in order and returns one record per identifier.
///
/// Each lookup races a `policy.timeout()` deadline; when the deadline wins the
/// lookup future is dropped, which abandons the in-flight request. Between
/// consecutive identifiers the task sleeps for [`BatchPolicy::draw_delay`];
/// there is no pause after the last one.
///
/// The output always has the same length and order as `identifiers`,
/// duplicates included.
pub async fn fetch_all<S, I>(
    source: &S,
    identifiers: &[I],
    policy: &BatchPolicy,
) -> Vec<ResultRecord>
where
    S: FollowerSource + Sync,
    I: AsRef<str> + Sync,
{
    let total = identifiers.len();
    let mut records = Vec::with_capacity(total);
    let mut failures = 0usize;

    for (index, identifier) in identifiers.iter().enumerate() {
        let identifier = identifier.as_ref();

        let count = match attempt(source, identifier, policy).await {
            Ok(count) => {
                tracing::info!(identifier, count, "follower count extracted");
                FollowerCount::known(count)
            }
            Err(err) => {
                failures += 1;
                tracing::warn!(
                    identifier,
                    kind = %err.kind(),
                    error = %err,
                    "follower count lookup failed"
                );
                FollowerCount::UNKNOWN
            }
        };
        records.push(ResultRecord::capture(identifier, count));

        if index + 1 < total {
            let delay = policy.draw_delay();
            #[allow(clippy::cast_possible_truncation)]
            let delay_ms = delay.as_millis() as u64;
            tracing::debug!(identifier, delay_ms, "pausing before next identifier");
            tokio::time::sleep(delay).await;
        }
    }

    tracing::info!(total, failures, "follower batch complete");
    records
}

async fn attempt<S: FollowerSource>(
    source: &S,
    identifier: &str,
    policy: &BatchPolicy,
) -> Result<u64, ScraperError> {
    match tokio::time::timeout(policy.timeout(), source.fetch_count(identifier)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ScraperError::Timeout {
            identifier: identifier.to_owned(),
            timeout_ms: policy.timeout_ms,
        }),
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
