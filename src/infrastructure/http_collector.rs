// HTTP client for the remote parameter collector
use crate::application::collector::{CollectorError, ParameterCollector};
use crate::domain::reading::Reading;
use async_trait::async_trait;

/// Talks to the remote collector's JSON API: readings are created with
/// `POST /api/parameters/` and queried with
/// `GET /api/parameters/history/?hours=N`.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCollector {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn submit_url(&self) -> String {
        format!("{}/api/parameters/", self.base_url)
    }

    fn history_url(&self, hours: u32) -> String {
        format!("{}/api/parameters/history/?hours={}", self.base_url, hours)
    }
}

#[async_trait]
impl ParameterCollector for HttpCollector {
    async fn submit_reading(&self, reading: &Reading) -> Result<(), CollectorError> {
        let response = self
            .client
            .post(self.submit_url())
            .json(reading)
            .send()
            .await
            .map_err(|e| CollectorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::Rejected { status, body });
        }

        Ok(())
    }

    async fn fetch_history(&self, hours: u32) -> Result<Vec<Reading>, CollectorError> {
        let response = self
            .client
            .get(self.history_url(hours))
            .send()
            .await
            .map_err(|e| CollectorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::Rejected { status, body });
        }

        response
            .json::<Vec<Reading>>()
            .await
            .map_err(|e| CollectorError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_collector_contract() {
        let collector = HttpCollector::new("http://localhost:8000".to_string());
        assert_eq!(
            collector.submit_url(),
            "http://localhost:8000/api/parameters/"
        );
        assert_eq!(
            collector.history_url(24),
            "http://localhost:8000/api/parameters/history/?hours=24"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let collector = HttpCollector::new("http://localhost:8000/".to_string());
        assert_eq!(
            collector.submit_url(),
            "http://localhost:8000/api/parameters/"
        );
    }
}
