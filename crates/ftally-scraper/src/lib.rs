//! Profile page fetching and follower-count extraction.

pub mod batch;
pub mod client;
pub mod error;
pub mod parse;

pub use batch::{fetch_all, BatchPolicy, FollowerSource};
pub use client::ProfileClient;
pub use error::{FailureKind, ScraperError};
pub use parse::{extract_follower_count, parse_follower_count};
