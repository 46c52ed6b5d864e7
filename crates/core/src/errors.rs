use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Slot conflict: {0}")]
    Conflict(String),

    #[error("Already booked: {0}")]
    AlreadyBooked(String),

    #[error("Conflicting appointment: {0}")]
    SelfConflict(String),

    #[error("Slot expired: {0}")]
    Expired(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type SlotResult<T> = Result<T, SlotError>;
