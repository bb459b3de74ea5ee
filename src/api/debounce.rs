use std::time::{Duration, Instant};

use tracing::trace;

/// Trailing-edge debounce over a stream of values.
///
/// Each `push` replaces the pending value and restarts the quiet period;
/// `poll` yields the last value once the period has elapsed with no new push.
#[derive(Debug, Clone)]
pub struct TrailingDebounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> TrailingDebounce<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn push(&mut self, value: T, now: Instant) {
        let deadline = now + self.delay;
        if self.pending.is_some() {
            trace!(delay_ms = self.delay.as_millis(), "debounce restarted");
        }
        self.pending = Some(Pending { value, deadline });
    }

    /// Takes the pending value if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.pending.as_ref()?.deadline;
        if now < deadline {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }
}
