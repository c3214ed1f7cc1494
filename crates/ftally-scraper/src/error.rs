use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid profile base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("identifier \"{identifier}\" does not name a profile path")]
    InvalidIdentifier { identifier: String },

    #[error("page has no description meta tag")]
    MissingMetaTag,

    #[error("no count before \"Followers\" in description \"{description}\"")]
    MissingFollowerToken { description: String },

    #[error("follower count \"{token}\" is not a valid number")]
    InvalidCount { token: String },

    #[error("timed out after {timeout_ms}ms fetching {identifier}")]
    Timeout { identifier: String, timeout_ms: u64 },
}

/// Coarse failure category, carried into logs alongside the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be built, could not complete, or returned a
    /// non-2xx status.
    Transport,
    /// The page lacked the description meta tag or the `Followers` token.
    Parse,
    /// The token was found but does not follow the count grammar.
    Format,
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Parse => write!(f, "parse"),
            FailureKind::Format => write!(f, "format"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

impl ScraperError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ScraperError::Http(_)
            | ScraperError::UnexpectedStatus { .. }
            | ScraperError::InvalidBaseUrl { .. }
            | ScraperError::InvalidIdentifier { .. } => FailureKind::Transport,
            ScraperError::MissingMetaTag | ScraperError::MissingFollowerToken { .. } => {
                FailureKind::Parse
            }
            ScraperError::InvalidCount { .. } => FailureKind::Format,
            ScraperError::Timeout { .. } => FailureKind::Timeout,
        }
    }
}
