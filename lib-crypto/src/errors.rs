//! Cryptography Errors

use thiserror::Error;

/// Error during signing or verification operations
#[derive(Error, Debug, Clone)]
pub enum CryptoError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("malformed key material: {0}")]
    MalformedKey(String),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
