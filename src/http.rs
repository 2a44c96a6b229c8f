use crate::{backend::AvailabilityBackend, error::SyncError, types::AvailabilityPayload};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/bookings";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl AvailabilityBackend for HttpBackend {
    async fn fetch(&self) -> Result<AvailabilityPayload, SyncError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "Received availability payload");

        Ok(serde_json::from_str(&body)?)
    }
}
