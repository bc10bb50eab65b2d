use async_trait::async_trait;

/// Delivery seam for administrator traffic (alerts, summaries, reports).
///
/// Implementations deliver to exactly one destination. Errors are reported,
/// never retried by callers.
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    async fn notify(&self, text: &str) -> anyhow::Result<()>;
}
