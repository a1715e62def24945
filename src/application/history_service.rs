// History service - Use case for the collector-backed history view
use crate::application::collector::{CollectorError, ParameterCollector};
use crate::domain::reading::Reading;
use std::sync::Arc;

#[derive(Clone)]
pub struct HistoryService {
    collector: Arc<dyn ParameterCollector>,
}

impl HistoryService {
    pub fn new(collector: Arc<dyn ParameterCollector>) -> Self {
        Self { collector }
    }

    /// Readings the collector recorded over the last `hours` hours.
    pub async fn recent_readings(&self, hours: u32) -> Result<Vec<Reading>, CollectorError> {
        self.collector.fetch_history(hours).await
    }
}
