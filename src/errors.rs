//! Error types for form submission

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced to the user in the result panel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingField,

    #[error("PNR must be exactly 6 characters")]
    InvalidPnrLength,

    #[error("{0}")]
    SubmissionFailed(String),
}

/// Failures reported by a boarding pass backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unsupported airline")]
    UnsupportedAirline(String),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Boarding pass service unavailable: {0}")]
    Unavailable(String),
}

impl From<ServiceError> for FormError {
    fn from(err: ServiceError) -> Self {
        FormError::SubmissionFailed(err.to_string())
    }
}
