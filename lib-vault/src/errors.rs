//! Vault Errors
//!
//! Ownership, gating, and approval violations share the token error
//! vocabulary and pass through transparently, whether they arose on the
//! wrapped token or surfaced from the underlying citizenship token.

use lib_types::TokenId;
use thiserror::Error;

/// Error during vault operations
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    #[error("already initialized")]
    AlreadyInitialized,

    #[error("not initialized")]
    NotInitialized,

    #[error("no wrapped token exists for id {0}")]
    WrappedTokenNotFound(TokenId),

    #[error(transparent)]
    Token(#[from] lib_tokens::TokenError),
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
