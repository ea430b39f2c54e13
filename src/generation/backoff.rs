use async_trait::async_trait;
use std::time::Duration;

/// Pause between attempts.
#[async_trait]
pub trait Backoff: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioBackoff;

#[async_trait]
impl Backoff for TokioBackoff {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
