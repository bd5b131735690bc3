use std::time::{Duration, Instant};

/// Holds back a burst of updates until no new value has arrived for
/// `delay`, then releases only the latest one.
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

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// The pending value, once `delay` has passed since the last push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value is released.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_value_after_quiet_period() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut debouncer = Debouncer::new(ms(250));

        debouncer.push(1, start);
        debouncer.push(2, start + ms(100));
        assert_eq!(debouncer.poll(start + ms(300)), None);
        assert_eq!(debouncer.remaining(start + ms(300)), Some(ms(50)));

        assert_eq!(debouncer.poll(start + ms(350)), Some(2));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(1000)), None);
    }
}
