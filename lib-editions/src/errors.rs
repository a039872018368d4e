//! Edition Errors

use lib_types::{Address, Amount, TokenId};
use thiserror::Error;

/// Error during fee-gated metadata updates
#[derive(Error, Debug, Clone)]
pub enum EditionError {
    #[error("already initialized")]
    AlreadyInitialized,

    #[error("not initialized")]
    NotInitialized,

    #[error("caller {account} is not authorized")]
    Unauthorized { account: Address },

    #[error("caller {caller} does not own token {token_id}")]
    CallerNotTokenOwner { token_id: TokenId, caller: Address },

    #[error("signature does not authorize this update")]
    InvalidSignature,

    #[error("insufficient fee: required {required}, attached {attached}")]
    InsufficientFee { required: Amount, attached: Amount },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("amount overflow")]
    AmountOverflow,

    #[error(transparent)]
    Token(#[from] lib_tokens::TokenError),
}

/// Result type for edition operations
pub type EditionResult<T> = Result<T, EditionError>;
