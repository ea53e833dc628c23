use async_trait::async_trait;
use std::time::Duration;

/// Pause capability injected into the collector. The sequential loop plus
/// these pauses is the rate-limit mechanism for the upstream provider.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Production pacer: a plain sleep.
pub struct FixedDelay;

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Pacer that returns immediately, for tests.
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn pause(&self, _duration: Duration) {}
}
