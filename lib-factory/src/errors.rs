//! Clone Factory Errors

use thiserror::Error;

/// Error during clone creation or lookup
#[derive(Error, Debug, Clone)]
pub enum CloneError {
    #[error("clone creation failed: {0}")]
    CloneCreationFailed(String),

    #[error("clone initialization failed: {0}")]
    InitializationFailed(String),

    #[error("no clone created yet")]
    NoCloneCreatedYet,
}

/// Result type for factory operations
pub type CloneResult<T> = Result<T, CloneError>;
