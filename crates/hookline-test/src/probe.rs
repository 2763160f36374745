//! Call probes for asserting on calls, arguments and ordering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared counter that orders calls across several probes.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    counter: Arc<AtomicU64>,
}

impl Sequencer {
    /// Create a sequencer starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence number.
    pub fn tick(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall<T> {
    /// Position of the call on the probe's sequencer.
    pub seq: u64,
    /// Arguments the call was made with.
    pub args: T,
}

/// Records calls made through it, like a test spy.
///
/// Clones share the same record, so a clone can be moved into a closure
/// while the original is kept for assertions.
#[derive(Debug, Clone)]
pub struct CallProbe<T> {
    name: String,
    calls: Arc<Mutex<Vec<RecordedCall<T>>>>,
    sequencer: Sequencer,
}

impl<T: Clone> CallProbe<T> {
    /// Create a probe with its own sequencer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sequencer(name, &Sequencer::new())
    }

    /// Create a probe that shares `sequencer` with other probes.
    #[must_use]
    pub fn with_sequencer(name: impl Into<String>, sequencer: &Sequencer) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            sequencer: sequencer.clone(),
        }
    }

    /// Probe name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a call.
    pub fn record(&self, args: T) {
        let seq = self.sequencer.tick();
        tracing::trace!(probe = %self.name, seq, "Probe called");
        self.lock().push(RecordedCall { seq, args });
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Whether the probe was called at all.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Whether the probe was called exactly once.
    #[must_use]
    pub fn called_once(&self) -> bool {
        self.call_count() == 1
    }

    /// Arguments of every call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<T> {
        self.lock().iter().map(|call| call.args.clone()).collect()
    }

    /// Arguments of the most recent call.
    #[must_use]
    pub fn last_args(&self) -> Option<T> {
        self.lock().last().map(|call| call.args.clone())
    }

    /// Whether any call was made with exactly `args`.
    #[must_use]
    pub fn called_with(&self, args: &T) -> bool
    where
        T: PartialEq,
    {
        self.lock().iter().any(|call| &call.args == args)
    }

    /// Whether this probe's first call happened before `other`'s first call.
    ///
    /// Only meaningful when both probes share a [`Sequencer`]. Returns
    /// `false` if this probe was never called, and `true` if only `other`
    /// was never called.
    #[must_use]
    pub fn called_before<U: Clone>(&self, other: &CallProbe<U>) -> bool {
        match (self.first_seq(), other.first_seq()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Forget all recorded calls.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn first_seq(&self) -> Option<u64> {
        self.lock().first().map(|call| call.seq)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall<T>>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_records_calls() {
        let probe = CallProbe::new("target");
        assert!(!probe.was_called());

        probe.record((1, 2));
        assert!(probe.called_once());
        assert!(probe.called_with(&(1, 2)));
        assert!(!probe.called_with(&(2, 1)));

        probe.record((3, 4));
        assert_eq!(probe.calls(), vec![(1, 2), (3, 4)]);
        assert_eq!(probe.last_args(), Some((3, 4)));

        probe.reset();
        assert_eq!(probe.call_count(), 0);
    }

    #[test]
    fn test_clones_share_record() {
        let probe = CallProbe::new("shared");
        let clone = probe.clone();
        clone.record("x");
        assert_eq!(probe.calls(), vec!["x"]);
        assert_eq!(probe.name(), "shared");
    }

    #[test]
    fn test_ordering_across_probes() {
        let seq = Sequencer::new();
        let a = CallProbe::with_sequencer("a", &seq);
        let b = CallProbe::with_sequencer("b", &seq);

        assert!(!a.called_before(&b));
        b.record(());
        a.record(());
        assert!(b.called_before(&a));
        assert!(!a.called_before(&b));
    }
}
