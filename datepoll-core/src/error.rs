//! Error types for datepoll.

use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur in datepoll operations.
#[derive(Error, Debug)]
pub enum DatepollError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Attendee '{0}' does not exist.")]
    AttendeeNotFound(String),

    #[error("Attendee '{0}' already exists")]
    AttendeeExists(String),

    #[error("One or more dates already exist.")]
    DateExists,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD or an ISO 8601 timestamp")]
    InvalidDate(String),

    #[error("Invalid request body: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for datepoll operations.
pub type DatepollResult<T> = Result<T, DatepollError>;
