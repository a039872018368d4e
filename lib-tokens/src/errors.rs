//! Token Errors

use lib_types::{Address, TokenId};
use thiserror::Error;

use crate::roles::Role;

/// Error during membership-token operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("already initialized")]
    AlreadyInitialized,

    #[error("not initialized")]
    NotInitialized,

    #[error("caller {account} does not have the {role} role")]
    CallerDoesNotHavePermission { role: Role, account: Address },

    #[error("account {account} is not a role administrator")]
    AccessControlUnauthorizedAccount { account: Address },

    #[error("token {token_id} is non-transferable to this destination")]
    TokenNonTransferable { token_id: TokenId },

    #[error("argument length mismatch: {identities} identities, {flags} flags")]
    ArgumentLengthMismatch { identities: usize, flags: usize },

    #[error("burning tokens is disabled")]
    BurningTokensIsDisabled,

    #[error("token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("recipient must be a non-zero identity")]
    InvalidRecipient,

    #[error("incorrect owner for token {token_id}: claimed {claimed}, actual {actual}")]
    IncorrectOwner {
        token_id: TokenId,
        claimed: Address,
        actual: Address,
    },

    #[error("caller {caller} is neither owner nor approved for token {token_id}")]
    CallerNotOwnerNorApproved { token_id: TokenId, caller: Address },

    #[error("caller {caller} does not own token {token_id}")]
    CallerNotTokenOwner { token_id: TokenId, caller: Address },
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;
