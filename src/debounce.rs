//! Restartable single-shot timer for coalescing rapid input
//!
//! The event loop owns the clock: it feeds values in with [`Debouncer::schedule`]
//! and asks [`Debouncer::poll`] on every tick. Nothing runs on another thread.

use std::time::{Duration, Instant};

/// Quiet period before a search is applied
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the quiet period at `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Returns the pending value once the quiet period has fully elapsed.
    ///
    /// Fires at most once per scheduled value.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(self.pending, Some((_, deadline)) if now >= deadline);
        if due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending value fires, if any
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Drops the pending value without firing
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Drives the debouncer in 10ms ticks and collects every fired value
    fn run_until(debouncer: &mut Debouncer<String>, start: Instant, end_ms: u64) -> Vec<String> {
        let mut fired = Vec::new();
        let mut t = 0;
        while t <= end_ms {
            if let Some(value) = debouncer.poll(start + ms(t)) {
                fired.push(value);
            }
            t += 10;
        }
        fired
    }

    #[test]
    fn test_rapid_updates_coalesce_into_one() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));

        debouncer.schedule("a".to_string(), start);
        assert_eq!(debouncer.poll(start + ms(100)), None);
        debouncer.schedule("ab".to_string(), start + ms(100));
        assert_eq!(debouncer.poll(start + ms(250)), None);
        debouncer.schedule("abc".to_string(), start + ms(250));

        let fired = run_until(&mut debouncer, start + ms(250), 2000);

        assert_eq!(fired, vec!["abc".to_string()]);
    }

    #[test]
    fn test_spaced_updates_fire_separately() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        let mut fired = Vec::new();

        debouncer.schedule("a".to_string(), start);
        fired.extend(run_until(&mut debouncer, start, 600));
        debouncer.schedule("ab".to_string(), start + ms(700));
        fired.extend(run_until(&mut debouncer, start + ms(700), 600));

        assert_eq!(fired, vec!["a".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_does_not_fire_before_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.schedule(1, start);

        assert_eq!(debouncer.poll(start + ms(499)), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(500)), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_fires_exactly_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.schedule(7, start);

        assert_eq!(debouncer.poll(start + ms(600)), Some(7));
        assert_eq!(debouncer.poll(start + ms(700)), None);
    }

    #[test]
    fn test_each_keystroke_restarts_the_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.schedule(1, start);
        debouncer.schedule(2, start + ms(400));

        assert_eq!(debouncer.poll(start + ms(600)), None);
        assert_eq!(debouncer.remaining(start + ms(600)), Some(ms(300)));
        assert_eq!(debouncer.poll(start + ms(900)), Some(2));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.schedule("x", start);

        assert_eq!(debouncer.cancel(), Some("x"));
        assert_eq!(debouncer.poll(start + ms(1000)), None);
        assert_eq!(debouncer.remaining(start), None);
    }

    #[test]
    fn test_default_delay() {
        let debouncer: Debouncer<String> = Debouncer::default();
        assert_eq!(debouncer.delay(), ms(500));
    }
}
