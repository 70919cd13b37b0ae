use std::time::Duration;
use tgpoll_core::config::RetryConfig;

/// Exponential delay between failed polling iterations.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: u32,
    current: Duration,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        let max = Duration::from_millis(config.max_backoff_ms);
        let initial = Duration::from_millis(config.initial_backoff_ms).min(max);
        Self {
            initial,
            max,
            multiplier: config.multiplier.max(1),
            current: initial,
        }
    }

    /// Delay to wait now; grows the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self
            .current
            .checked_mul(self.multiplier)
            .unwrap_or(self.max)
            .min(self.max);
        delay
    }

    /// Back to the initial delay after a successful poll.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retry(initial: u64, max: u64, multiplier: u32) -> RetryConfig {
        RetryConfig {
            initial_backoff_ms: initial,
            max_backoff_ms: max,
            multiplier,
        }
    }

    #[test]
    fn test_doubles_up_to_cap() {
        let mut b = Backoff::new(&retry(1_000, 60_000, 2));
        let secs: Vec<u64> = (0..8).map(|_| b.next_delay().as_secs()).collect();
        assert_eq!(secs, vec![1, 2, 4, 8, 16, 32, 60, 60]);
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut b = Backoff::new(&retry(500, 10_000, 3));
        b.next_delay();
        b.next_delay();
        b.reset();
        assert_eq!(b.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_initial_never_sleeps() {
        let mut b = Backoff::new(&retry(0, 60_000, 2));
        for _ in 0..5 {
            assert!(b.next_delay().is_zero());
        }
    }

    #[test]
    fn test_initial_clamped_to_max() {
        let mut b = Backoff::new(&retry(5_000, 1_000, 2));
        assert_eq!(b.next_delay(), Duration::from_secs(1));
    }
}
