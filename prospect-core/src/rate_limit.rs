//! Client-side pacing between outbound network calls.
//!
//! Search backends throttle rapid-fire queries, so successive calls are
//! spaced by a fixed delay rather than relying on 429 backpressure. The
//! pipeline is strictly sequential; a fixed sleep is the whole policy.

use std::time::Duration;

/// Spaces successive network calls by a fixed configured delay.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Suspend the calling task for the configured delay. A zero delay
    /// returns immediately without yielding to the timer.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let pacer = Pacer::from_secs(0);
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_configured_delay() {
        let pacer = Pacer::from_secs(2);
        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_delay_accessor() {
        let pacer = Pacer::new(Duration::from_millis(1500));
        assert_eq!(pacer.delay(), Duration::from_millis(1500));
    }
}
