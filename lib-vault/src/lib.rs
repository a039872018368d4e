//! Voter Registration Vault
//!
//! A [`VoterRegistration`] escrows citizenship tokens 1:1 against a wrapped
//! voting token: a wrapped id exists iff the vault holds the underlying id.
//! The wrapped token carries its own transfer gate, fully independent of the
//! underlying token's, and deposits/withdrawals are batched with
//! whole-batch atomicity.

pub mod errors;
pub mod vault;

pub use errors::{VaultError, VaultResult};
pub use vault::VoterRegistration;
