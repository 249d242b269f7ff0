//! Delivery of finished games to the stats service over HTTP.

use std::time::Duration;

use mafia_protocol::GameResult;
use mafia_room::{RecordError, ResultRecorder};

/// Posts each [`GameResult`] as JSON to a stats endpoint.
///
/// One attempt per result. Any status of 400 or above is a failure.
#[derive(Debug, Clone)]
pub struct HttpRecorder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecorder {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// # Errors
    /// Returns [`RecordError::Unreachable`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RecordError> {
        Self::with_timeout(endpoint, Self::DEFAULT_TIMEOUT)
    }

    /// # Errors
    /// Returns [`RecordError::Unreachable`] if the HTTP client cannot be built.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RecordError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecordError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ResultRecorder for HttpRecorder {
    async fn record(&self, result: GameResult) -> Result<(), RecordError> {
        let room_id = result.id;
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&result)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    RecordError::Encode(e.to_string())
                } else {
                    RecordError::Unreachable(e.to_string())
                }
            })?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            return Err(RecordError::Rejected(status.as_u16()));
        }

        tracing::info!(%room_id, status = status.as_u16(), endpoint = %self.endpoint, "game result posted");
        Ok(())
    }
}
