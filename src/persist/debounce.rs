/// Single pending persistence deadline with cancel-and-restart semantics.
///
/// Time is supplied by the caller in milliseconds so the debouncer stays
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct PersistDebouncer {
    delay_ms: u64,
    queued_at: Option<u64>,
}

impl PersistDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            queued_at: None,
        }
    }

    /// Restart the countdown, replacing any pending deadline.
    pub const fn queue(&mut self, now_ms: u64) {
        self.queued_at = Some(now_ms);
    }

    /// Fire if the delay has elapsed since the last `queue`.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.queued_at else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.queued_at = None;
            true
        } else {
            false
        }
    }

    /// Fire immediately if anything is pending.
    pub const fn take_now(&mut self) -> bool {
        self.queued_at.take().is_some()
    }

    pub const fn is_pending(&self) -> bool {
        self.queued_at.is_some()
    }

    /// Milliseconds until the pending deadline, if any.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.queued_at
            .map(|queued_at| (queued_at + self.delay_ms).saturating_sub(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut debouncer = PersistDebouncer::new(500);
        debouncer.queue(1_000);
        assert!(!debouncer.take_ready(1_499));
        assert!(debouncer.take_ready(1_500));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_ready(2_000));
    }

    #[test]
    fn test_requeue_restarts_countdown() {
        let mut debouncer = PersistDebouncer::new(500);
        debouncer.queue(0);
        debouncer.queue(400);
        assert!(!debouncer.take_ready(600));
        assert!(debouncer.take_ready(900));
    }

    #[test]
    fn test_take_now_only_when_pending() {
        let mut debouncer = PersistDebouncer::new(500);
        assert!(!debouncer.take_now());
        debouncer.queue(0);
        assert!(debouncer.take_now());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_remaining_ms() {
        let mut debouncer = PersistDebouncer::new(500);
        assert_eq!(debouncer.remaining_ms(0), None);
        debouncer.queue(100);
        assert_eq!(debouncer.remaining_ms(350), Some(250));
        assert_eq!(debouncer.remaining_ms(900), Some(0));
    }
}
