//! Nation Registry Errors
//!
//! Sub-system failures pass through transparently so a caller always sees
//! the precondition that was actually violated, wherever in the bundle it
//! happened.

use lib_types::{Address, CountryCode, CountryCodeError};
use thiserror::Error;

/// Error during nation-registry operations
#[derive(Error, Debug, Clone)]
pub enum NationError {
    #[error("caller {account} is not the registry admin")]
    CallerNotAdmin { account: Address },

    #[error("nation creation is not permissionless")]
    ContractNotPermissionless,

    #[error("a nation already exists for code {0}")]
    NationAlreadyExists(CountryCode),

    #[error("no nation recorded for code {0}")]
    UnknownNation(CountryCode),

    #[error("country code {0} is not in the directory")]
    UnknownCountryCode(CountryCode),

    #[error("caller {account} is not authorized to update the directory")]
    CallerNotAuthorized { account: Address },

    #[error(transparent)]
    InvalidCountryCode(#[from] CountryCodeError),

    #[error(transparent)]
    Clone(#[from] lib_factory::CloneError),

    #[error(transparent)]
    Token(#[from] lib_tokens::TokenError),

    #[error(transparent)]
    Claim(#[from] lib_claims::ClaimError),

    #[error(transparent)]
    Vault(#[from] lib_vault::VaultError),

    #[error(transparent)]
    Edition(#[from] lib_editions::EditionError),
}

/// Result type for nation-registry operations
pub type NationResult<T> = Result<T, NationError>;
