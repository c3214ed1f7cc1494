use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::*;

#[derive(Clone, Copy)]
enum Script {
    Count(u64),
    Fail,
    /// Resolves with the count only after the given delay.
    Slow(Duration, u64),
}

/// Test double that replays a fixed script per identifier and records when
/// each lookup started and whether it was abandoned mid-flight.
struct ScriptedSource {
    scripts: HashMap<&'static str, Script>,
    starts: Mutex<Vec<(String, Instant)>>,
    abandoned: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(scripts: &[(&'static str, Script)]) -> Self {
        Self {
            scripts: scripts.iter().copied().collect(),
            starts: Mutex::new(Vec::new()),
            abandoned: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn starts(&self) -> Vec<(String, Instant)> {
        self.starts.lock().unwrap().clone()
    }
}

/// Counts a lookup as abandoned if it is dropped before finishing.
struct InFlight {
    abandoned: Arc<AtomicUsize>,
    finished: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.finished {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl FollowerSource for ScriptedSource {
    async fn fetch_count(&self, identifier: &str) -> Result<u64, ScraperError> {
        self.starts
            .lock()
            .unwrap()
            .push((identifier.to_owned(), Instant::now()));
        let script = self.scripts.get(identifier).copied().unwrap_or(Script::Fail);
        let mut guard = InFlight {
            abandoned: Arc::clone(&self.abandoned),
            finished: false,
        };
        let result = match script {
            Script::Count(n) => Ok(n),
            Script::Fail => Err(ScraperError::UnexpectedStatus {
                status: 404,
                url: format!("http://fake/{identifier}/"),
            }),
            Script::Slow(delay, n) => {
                tokio::time::sleep(delay).await;
                Ok(n)
            }
        };
        guard.finished = true;
        result
    }
}

fn policy(min_delay_ms: u64, max_delay_ms: u64, timeout_ms: u64) -> BatchPolicy {
    BatchPolicy::new(min_delay_ms, max_delay_ms, timeout_ms).unwrap()
}

// -----------------------------------------------------------------------
// BatchPolicy
// -----------------------------------------------------------------------

#[test]
fn default_policy_uses_documented_values() {
    let p = BatchPolicy::default();
    assert_eq!(
        p.delay_bounds(),
        (Duration::from_millis(200), Duration::from_millis(1_000))
    );
    assert_eq!(p.timeout(), Duration::from_millis(10_000));
}

#[test]
fn policy_rejects_inverted_delay_range() {
    assert_eq!(
        BatchPolicy::new(1_000, 200, 10_000),
        Err(ConfigError::InvalidDelayRange {
            min_delay_ms: 1_000,
            max_delay_ms: 200
        })
    );
}

#[test]
fn policy_rejects_zero_timeout() {
    assert_eq!(BatchPolicy::new(0, 0, 0), Err(ConfigError::ZeroTimeout));
}

#[test]
fn policy_from_config_matches_fields() {
    let config = ScraperConfig {
        min_delay_ms: 10,
        max_delay_ms: 20,
        timeout_ms: 30,
        ..ScraperConfig::default()
    };
    assert_eq!(BatchPolicy::from_config(&config), Ok(policy(10, 20, 30)));
}

#[test]
fn drawn_delays_stay_within_inclusive_bounds() {
    let p = policy(200, 210, 1_000);
    for _ in 0..1_000 {
        let d = p.draw_delay();
        assert!(
            d >= Duration::from_millis(200) && d <= Duration::from_millis(210),
            "delay {d:?} out of range"
        );
    }
}

#[test]
fn equal_bounds_give_a_fixed_delay() {
    let p = policy(350, 350, 1_000);
    assert_eq!(p.draw_delay(), Duration::from_millis(350));
}

// -----------------------------------------------------------------------
// fetch_all
// -----------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn output_mirrors_input_length_and_order() {
    let source = ScriptedSource::new(&[
        ("alpha", Script::Count(10)),
        ("beta", Script::Fail),
        ("gamma", Script::Count(30)),
    ]);
    let ids = ["alpha", "beta", "gamma", "alpha"];
    let records = fetch_all(&source, &ids, &policy(0, 5, 1_000)).await;

    let got: Vec<(&str, i64)> = records
        .iter()
        .map(|r| (r.identifier.as_str(), r.follower_count.raw()))
        .collect();
    assert_eq!(
        got,
        vec![("alpha", 10), ("beta", -1), ("gamma", 30), ("alpha", 10)]
    );
}

#[tokio::test(start_paused = true)]
async fn empty_input_yields_empty_output() {
    let source = ScriptedSource::new(&[]);
    let ids: [&str; 0] = [];
    let records = fetch_all(&source, &ids, &BatchPolicy::default()).await;
    assert!(records.is_empty());
    assert!(source.starts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failure_does_not_disturb_neighbours() {
    let source = ScriptedSource::new(&[
        ("one", Script::Count(1)),
        ("two", Script::Fail),
        ("three", Script::Count(3)),
    ]);
    let ids = vec!["one".to_owned(), "two".to_owned(), "three".to_owned()];
    let records = fetch_all(&source, &ids, &policy(0, 0, 1_000)).await;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].follower_count, FollowerCount::known(1));
    assert_eq!(records[1].follower_count, FollowerCount::UNKNOWN);
    assert_eq!(records[2].follower_count, FollowerCount::known(3));
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_times_out_and_is_abandoned() {
    let source = ScriptedSource::new(&[
        ("slow", Script::Slow(Duration::from_secs(60), 99)),
        ("fast", Script::Count(7)),
    ]);
    let started = Instant::now();
    let records = fetch_all(&source, &["slow", "fast"], &policy(0, 0, 10_000)).await;

    assert_eq!(records[0].follower_count, FollowerCount::UNKNOWN);
    assert_eq!(records[1].follower_count, FollowerCount::known(7));
    assert_eq!(source.abandoned.load(Ordering::SeqCst), 1);

    let starts = source.starts();
    let fast_start = starts[1].1;
    assert!(fast_start - started >= Duration::from_secs(10));
    assert!(fast_start - started < Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn lookup_finishing_before_deadline_is_kept() {
    let source = ScriptedSource::new(&[("steady", Script::Slow(Duration::from_secs(2), 500))]);
    let records = fetch_all(&source, &["steady"], &policy(0, 0, 10_000)).await;
    assert_eq!(records[0].follower_count, FollowerCount::known(500));
    assert_eq!(source.abandoned.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn abandoned_lookup_never_adds_a_record() {
    let source = ScriptedSource::new(&[("slow", Script::Slow(Duration::from_secs(5), 1))]);
    let records = fetch_all(&source, &["slow"], &policy(0, 0, 1_000)).await;
    // Let the original deadline of the abandoned lookup pass.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].follower_count, FollowerCount::UNKNOWN);
}

#[tokio::test(start_paused = true)]
async fn consecutive_starts_respect_delay_bounds() {
    let source = ScriptedSource::new(&[
        ("a", Script::Count(1)),
        ("b", Script::Count(2)),
        ("c", Script::Fail),
        ("d", Script::Count(4)),
    ]);
    fetch_all(&source, &["a", "b", "c", "d"], &policy(200, 1_000, 10_000)).await;

    let starts = source.starts();
    assert_eq!(starts.len(), 4);
    for pair in starts.windows(2) {
        let gap = pair[1].1 - pair[0].1;
        assert!(gap >= Duration::from_millis(200), "gap {gap:?} below minimum");
        assert!(
            gap <= Duration::from_millis(1_001),
            "gap {gap:?} above maximum"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn no_pause_after_last_identifier() {
    let source = ScriptedSource::new(&[("only", Script::Count(5))]);
    let started = Instant::now();
    fetch_all(&source, &["only"], &policy(500, 500, 10_000)).await;
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn records_are_stamped_in_order() {
    let source = ScriptedSource::new(&[("x", Script::Count(1)), ("y", Script::Count(2))]);
    let records = fetch_all(&source, &["x", "y"], &policy(0, 0, 1_000)).await;
    assert!(records[0].captured_at <= records[1].captured_at);
}
