use std::time::Duration;
use tokio::time::Instant;

/// Holds the latest scheduled value until a quiet period has passed.
///
/// Scheduling replaces (cancels) whatever was pending and restarts the
/// quiet period, so only the last value of a burst is ever delivered. Uses
/// the tokio clock: tests drive it with `tokio::time::pause`/`advance`, and
/// the event loop waits on [`Debouncer::deadline`] with `sleep_until`.
#[derive(Debug)]
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

    pub fn schedule(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Drop the pending value, returning it if there was one.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn test_value_held_until_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule("a");

        time::advance(Duration::from_millis(299)).await;
        assert_eq!(debouncer.take_due(Instant::now()), None);
        assert!(debouncer.is_pending());

        time::advance(Duration::from_millis(1)).await;
        assert_eq!(debouncer.take_due(Instant::now()), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_keeps_only_last_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule("c");
        time::advance(Duration::from_millis(200)).await;
        debouncer.schedule("co");
        time::advance(Duration::from_millis(200)).await;
        debouncer.schedule("coa");

        // 400ms since the first keystroke, but only 0ms since the last
        assert_eq!(debouncer.take_due(Instant::now()), None);

        time::advance(Duration::from_millis(300)).await;
        assert_eq!(debouncer.take_due(Instant::now()), Some("coa"));
        assert_eq!(debouncer.take_due(Instant::now()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(1);
        assert_eq!(debouncer.cancel(), Some(1));

        time::advance(Duration::from_secs(1)).await;
        assert_eq!(debouncer.take_due(Instant::now()), None);
        assert!(debouncer.deadline().is_none());
    }
}
