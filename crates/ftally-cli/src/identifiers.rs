//! Identifier list for the demo run.

pub(crate) const IDENTIFIERS_VAR: &str = "FTALLY_IDENTIFIERS";

/// Used when `FTALLY_IDENTIFIERS` is unset. The last entry does not exist and
/// shows what a failed lookup looks like in the output.
pub(crate) const SAMPLE_IDENTIFIERS: [&str; 4] = [
    "tidescommunity",
    "cacoalition4rf",
    "google",
    "causeErrorsdkjkdsj",
];

pub(crate) fn from_env() -> Vec<String> {
    from_lookup(std::env::var(IDENTIFIERS_VAR).ok().as_deref())
}

/// Splits a comma-separated list, trimming whitespace and skipping empty
/// entries. Duplicates are kept; each one is looked up again.
fn from_lookup(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        None => SAMPLE_IDENTIFIERS.iter().map(|s| (*s).to_owned()).collect(),
    }
}
