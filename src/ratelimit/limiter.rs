use async_trait::async_trait;
use tokio::time::{sleep, Duration};

/// Paces remote reads against the RPC endpoint
/// 
/// `pause` is called once after every remote read that succeeded. The caller
/// races it against cancellation, so implementations only need to wait.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn pause(&self);
}

/// Waits the same delay after every read
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl RateLimiter for FixedInterval {
    async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }
        sleep(self.interval).await;
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_fixed_interval_waits_at_least_interval() {
        let limiter = FixedInterval::from_millis(20);
        let start = Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_wait() {
        let limiter = FixedInterval::from_millis(0);
        let start = Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_unlimited_returns_immediately() {
        let start = Instant::now();
        for _ in 0..100 {
            Unlimited.pause().await;
        }
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
