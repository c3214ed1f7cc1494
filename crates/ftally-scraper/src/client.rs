//! HTTP client for public profile pages.

use std::time::Duration;

use ftally_core::{FollowerCount, ScraperConfig};
use reqwest::{Client, Url};

use crate::batch::FollowerSource;
use crate::error::ScraperError;
use crate::parse::extract_follower_count;

/// Fetches profile pages and extracts follower counts from them.
///
/// One GET per lookup, no retries. The client itself applies only a connect
/// timeout; the per-identifier deadline belongs to [`crate::fetch_all`].
pub struct ProfileClient {
    client: Client,
    base_url: Url,
}

impl ProfileClient {
    /// Creates a client from the configured base URL and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be built.
    /// - [`ScraperError::InvalidBaseUrl`] if the base URL cannot host profile paths.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(&config.profile_base_url, &config.user_agent)
    }

    /// Creates a client pointed at `base_url` (a mock server in tests).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be built.
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse or cannot
    ///   carry path segments (e.g. `mailto:`).
    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Builds `<base>/<identifier>/`, percent-encoding the identifier as a
    /// single path segment.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidIdentifier`] for `""`, `"."` and `".."`, which
    ///   would otherwise collapse onto the base URL instead of a profile.
    /// - [`ScraperError::InvalidBaseUrl`] if the base URL cannot carry path
    ///   segments.
    pub fn profile_url(&self, identifier: &str) -> Result<Url, ScraperError> {
        if matches!(identifier, "" | "." | "..") {
            return Err(ScraperError::InvalidIdentifier {
                identifier: identifier.to_owned(),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ScraperError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push(identifier)
            .push("");
        Ok(url)
    }

    /// Fetches the raw profile page for `identifier`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or an unreadable body.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    pub async fn fetch_profile_html(&self, identifier: &str) -> Result<String, ScraperError> {
        let url = self.profile_url(identifier)?;
        tracing::debug!(identifier, url = %url, "fetching profile page");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches and parses the follower count, keeping the failure reason.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from [`Self::fetch_profile_html`] and
    /// parse errors from [`extract_follower_count`].
    pub async fn try_fetch_follower_count(&self, identifier: &str) -> Result<u64, ScraperError> {
        let html = self.fetch_profile_html(identifier).await?;
        extract_follower_count(&html)
    }

    /// Fetches the follower count, returning [`FollowerCount::UNKNOWN`] on any
    /// failure. Failures are logged, never propagated.
    pub async fn fetch_follower_count(&self, identifier: &str) -> FollowerCount {
        match self.try_fetch_follower_count(identifier).await {
            Ok(count) => FollowerCount::known(count),
            Err(err) => {
                tracing::warn!(
                    identifier,
                    kind = %err.kind(),
                    error = %err,
                    "follower count lookup failed"
                );
                FollowerCount::UNKNOWN
            }
        }
    }
}

impl FollowerSource for ProfileClient {
    async fn fetch_count(&self, identifier: &str) -> Result<u64, ScraperError> {
        self.try_fetch_follower_count(identifier).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
