//! Follower-count extraction from profile page markup.
//!
//! Profile pages summarize the account in a description meta tag, e.g.
//! `content="1,234 Followers, 56 Following, 78 Posts - ..."`. The count is the
//! numeric token immediately before the word `Followers`. Two token shapes are
//! seen in the wild: unit-suffixed (`1.2K`, `3M`) and comma-grouped
//! (`1,234`). [`parse_follower_count`] accepts both.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attr regex")
});
static FOLLOWERS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9][0-9.,]*[A-Za-z]?)\s+Followers\b").expect("valid followers regex")
});

/// Meta tags consulted for the profile summary, in priority order.
const DESCRIPTION_KEYS: [(&str, &str); 2] =
    [("property", "og:description"), ("name", "description")];

/// Extracts the follower count from a profile page.
///
/// # Errors
///
/// - [`ScraperError::MissingMetaTag`] when no description meta tag exists.
/// - [`ScraperError::MissingFollowerToken`] when the description has no
///   numeric token before `Followers`.
/// - [`ScraperError::InvalidCount`] when the token breaks the count grammar.
pub fn extract_follower_count(html: &str) -> Result<u64, ScraperError> {
    let description = extract_description(html).ok_or(ScraperError::MissingMetaTag)?;
    let token = follower_token(&description).ok_or_else(|| {
        ScraperError::MissingFollowerToken {
            description: description.clone(),
        }
    })?;
    parse_follower_count(token)
}

/// Returns the content of the first description meta tag that carries a
/// follower token, or of the first description tag found at all.
#[must_use]
pub fn extract_description(html: &str) -> Option<String> {
    let found: Vec<String> = DESCRIPTION_KEYS
        .iter()
        .filter_map(|(key_attr, key_value)| find_meta_content(html, key_attr, key_value))
        .collect();
    let with_token = found
        .iter()
        .position(|content| follower_token(content).is_some());
    let index = with_token.unwrap_or(0);
    found.into_iter().nth(index)
}

/// Parses a follower-count token.
///
/// Grammar: digits with optional comma grouping, an optional `.` fraction,
/// and an optional case-insensitive `k` (x1,000) or `m` (x1,000,000) suffix.
/// The scaled value is rounded to the nearest integer.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidCount`] when the token does not match the
/// grammar or the value does not fit in a `u64`.
pub fn parse_follower_count(token: &str) -> Result<u64, ScraperError> {
    let invalid = || ScraperError::InvalidCount {
        token: token.to_owned(),
    };

    let cleaned: String = token.trim().chars().filter(|c| *c != ',').collect();
    let (number, multiplier) = match cleaned.chars().last() {
        Some('k' | 'K') => (&cleaned[..cleaned.len() - 1], 1_000u64),
        Some('m' | 'M') => (&cleaned[..cleaned.len() - 1], 1_000_000u64),
        _ => (cleaned.as_str(), 1u64),
    };

    if !is_decimal_literal(number) {
        return Err(invalid());
    }

    // Integers stay in u64 so large plain counts keep full precision.
    if !number.contains('.') {
        return number
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .ok_or_else(invalid);
    }

    let value: f64 = number.parse().map_err(|_| invalid())?;
    #[allow(clippy::cast_precision_loss)]
    let (scaled, ceiling) = ((value * multiplier as f64).round(), u64::MAX as f64);
    if !scaled.is_finite() || scaled >= ceiling {
        return Err(invalid());
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = scaled as u64;
    Ok(count)
}

fn follower_token(description: &str) -> Option<&str> {
    FOLLOWERS_TOKEN_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `digits` or `digits.digits`, nothing else.
fn is_decimal_literal(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (s, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.is_none_or(all_digits)
}

fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, "content")
        } else {
            None
        }
    })
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let name = caps.get(1)?;
        if !name.as_str().eq_ignore_ascii_case(attr) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .map(|v| v.as_str().trim().to_string())
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
