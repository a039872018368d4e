//! Claim Gate Errors

use lib_types::Address;
use thiserror::Error;

use crate::eligibility::EligibilityError;

/// Error during claim-gate operations
#[derive(Error, Debug, Clone)]
pub enum ClaimError {
    #[error("already initialized")]
    AlreadyInitialized,

    #[error("not initialized")]
    NotInitialized,

    #[error("contract is paused")]
    ContractPaused,

    #[error("{account} has already claimed citizenship")]
    AlreadyClaimedCitizenship { account: Address },

    #[error("{account} is not eligible for citizenship")]
    NotEligibleForCitizenship { account: Address },

    #[error("caller {account} is not an admin")]
    CallerNotAdmin { account: Address },

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    Token(#[from] lib_tokens::TokenError),
}

/// Result type for claim-gate operations
pub type ClaimResult<T> = Result<T, ClaimError>;
