//! Test fixtures: common targets and tracing setup.

use tracing_subscriber::EnvFilter;

/// Two-argument integer pack used by most engine tests.
pub type Pair = (i64, i64);

/// `a + b`, saturating.
#[must_use]
pub fn sum(pair: Pair) -> i64 {
    pair.0.saturating_add(pair.1)
}

/// Concatenate two strings.
#[must_use]
pub fn concat(pair: (String, String)) -> String {
    let (mut a, b) = pair;
    a.push_str(&b);
    a
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`, defaults to `hookline=trace`, and writes through the
/// test harness so output is captured per test.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hookline=trace"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
