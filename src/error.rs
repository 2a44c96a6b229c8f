use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request to availability endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time {time:?} for {date}, expected HH:MM")]
    InvalidTime { date: String, time: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid booking request: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Booking rejected: {0}")]
    Rejected(String),
}
