use crate::{error::SyncError, types::AvailabilityPayload};
use std::future::Future;

pub trait AvailabilityBackend: Clone + Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<AvailabilityPayload, SyncError>> + Send;
}
