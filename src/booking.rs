use crate::{
    error::SyncError,
    types::{AvailabilityMap, TIME_OF_DAY},
};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use validator::Validate;

pub const DEFAULT_BOOKING_URL: &str = "http://127.0.0.1:8000/data";

lazy_static! {
    static ref PHONE_NUMBER: Regex = Regex::new(r"^[0-9 +()\-]+$").unwrap();
}

/// Body of the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 1), regex(path = *PHONE_NUMBER))]
    pub phone: String,
    pub day: NaiveDate,
    #[validate(regex(path = *TIME_OF_DAY))]
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    #[serde(default)]
    ok: bool,
}

#[derive(Debug, Clone)]
pub struct BookingClient {
    client: reqwest::Client,
    url: String,
}

impl BookingClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Sends `request` if it is well formed and its slot is still offered in `available`.
    pub async fn submit(
        &self,
        request: &BookingRequest,
        available: &AvailabilityMap,
    ) -> Result<(), SyncError> {
        request.validate()?;
        if !available.contains_slot(request.day, &request.time) {
            return Err(SyncError::Rejected(format!(
                "{} at {} is not available",
                request.day, request.time
            )));
        }

        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::Rejected(format!("{status}: {body}")));
        }

        let answer: BookingResponse = serde_json::from_str(&body)?;
        if !answer.ok {
            return Err(SyncError::Rejected(body));
        }

        info!(day = %request.day, time = %request.time, "Booking submitted");
        Ok(())
    }
}
