//! Debounced autosave.
//!
//! Rich-content edits arrive on every keystroke. Each edit restarts a timer,
//! and only the value pending when the timer fires is committed. The timer is
//! an explicit handle driven by the caller's clock, so it can be cancelled or
//! flushed and never outlives its owner.

use std::time::{Duration, Instant};

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// A cancellable trailing-edge debounce holding the latest value.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the timer from `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will fire.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Take the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        debounce.schedule("a", start);

        assert_eq!(debounce.poll(start + ms(499)), None);
        assert_eq!(debounce.poll(start + ms(500)), Some("a"));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(start + ms(2000)), None);
    }

    #[test]
    fn test_every_edit_restarts_timer() {
        let start = Instant::now();
        let mut debounce = Debounce::new(ms(500));
        debounce.schedule("a", start);
        debounce.schedule("ab", start + ms(300));
        debounce.schedule("abc", start + ms(600));

        // The first deadline has passed, but it was restarted
        assert_eq!(debounce.poll(start + ms(800)), None);
        assert_eq!(debounce.poll(start + ms(1100)), Some("abc"));
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        debounce.schedule(1, start);
        assert!(debounce.cancel());
        assert!(!debounce.cancel());
        assert_eq!(debounce.poll(start + ms(1000)), None);

        debounce.schedule(2, start);
        assert_eq!(debounce.flush(), Some(2));
        assert_eq!(debounce.flush(), None);
    }
}
