// Collector trait for remote parameter submission and history reads
use crate::domain::reading::Reading;
use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the remote collector.
///
/// Submissions are fire-and-forget, so these errors are never fatal; they are
/// logged and forwarded to the simulation failure channel so callers and
/// tests can observe them.
#[derive(Debug, Clone, Error)]
pub enum CollectorError {
    #[error("failed to reach collector: {0}")]
    Transport(String),
    #[error("collector responded with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to decode collector response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ParameterCollector: Send + Sync {
    /// Submit one reading to the remote collector.
    async fn submit_reading(&self, reading: &Reading) -> Result<(), CollectorError>;

    /// Fetch the generated readings recorded over the last `hours` hours.
    async fn fetch_history(&self, hours: u32) -> Result<Vec<Reading>, CollectorError>;
}
