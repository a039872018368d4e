//! Membership Token Registry
//!
//! This crate defines the citizenship token primitives:
//!
//! - [`TransferGate`]: default-deny transfer capability with a destination
//!   allowlist
//! - [`Role`] / [`AuthoritySet`]: explicit role-based permission mapping
//! - [`Citizenship`]: unique-ownership membership token with role-gated
//!   mint/burn/URI management and gate-checked transfers
//! - [`CitizenshipWithRegistry`]: variant that additionally tracks every
//!   holder's full set of owned token ids
//!
//! Transfers are globally disabled by default and re-enabled either globally
//! or per destination identity.

pub mod citizen;
pub mod errors;
pub mod events;
pub mod gate;
pub mod registry;
pub mod roles;

pub use citizen::Citizenship;
pub use errors::{TokenError, TokenResult};
pub use events::TokenEvent;
pub use gate::TransferGate;
pub use registry::CitizenshipWithRegistry;
pub use roles::{AuthoritySet, Role};
