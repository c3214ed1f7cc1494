use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A follower count, or the sentinel `-1` when it could not be determined.
///
/// The sentinel is a real value of this type, not an absence: it serializes
/// as the number `-1` and callers must treat it as "lookup failed" rather than
/// filtering it out. Deserialization rejects anything below `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FollowerCount(i64);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("follower count {0} is neither non-negative nor the -1 sentinel")]
pub struct InvalidFollowerCount(pub i64);

impl FollowerCount {
    pub const UNKNOWN: Self = Self(-1);

    /// Wraps a successfully extracted count. Values beyond `i64::MAX` saturate.
    #[must_use]
    pub fn known(count: u64) -> Self {
        Self(i64::try_from(count).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self.0 >= 0
    }

    /// Returns the count, or `None` for the sentinel.
    #[must_use]
    pub fn get(self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }

    /// Returns the raw value, `-1` included.
    #[must_use]
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl From<u64> for FollowerCount {
    fn from(count: u64) -> Self {
        Self::known(count)
    }
}

impl TryFrom<i64> for FollowerCount {
    type Error = InvalidFollowerCount;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw < -1 {
            return Err(InvalidFollowerCount(raw));
        }
        Ok(Self(raw))
    }
}

impl From<FollowerCount> for i64 {
    fn from(count: FollowerCount) -> Self {
        count.0
    }
}

impl fmt::Display for FollowerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One capture for one identifier, created once per attempt and never updated.
///
/// Serialized keys are `username`, `numberOfFollowers` and `timestampScraped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "username")]
    pub identifier: String,
    #[serde(rename = "numberOfFollowers")]
    pub follower_count: FollowerCount,
    #[serde(rename = "timestampScraped")]
    pub captured_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Builds a record stamped with the current UTC time.
    #[must_use]
    pub fn capture(identifier: impl Into<String>, follower_count: FollowerCount) -> Self {
        Self {
            identifier: identifier.into(),
            follower_count,
            captured_at: Utc::now(),
        }
    }
}
