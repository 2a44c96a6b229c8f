use crate::{backend::AvailabilityBackend, error::SyncError, types::AvailabilityPayload};
use std::path::PathBuf;
use tracing::debug;

/// Serves the payload stored in a JSON file. The file is read again on every
/// fetch, so editing it while the client runs behaves like a changing backend.
#[derive(Debug, Clone)]
pub struct LocalAvailability {
    path: PathBuf,
}

impl LocalAvailability {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AvailabilityBackend for LocalAvailability {
    async fn fetch(&self) -> Result<AvailabilityPayload, SyncError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), "Loaded availability fixture");
        Ok(serde_json::from_str(&contents)?)
    }
}
