//! Canonical Primitive Types
//!
//! Shared building blocks for every crate in the workspace:
//!
//! - [`Address`]: 32-byte identity (zero address = "no identity")
//! - [`TokenId`]: sequential token identifier, assigned from 0
//! - [`Amount`]: attached-payment / fee amounts
//! - [`CountryCode`]: two-letter jurisdiction code
//!
//! These types are fixed-size, deterministically serializable, and cheap to
//! copy and compare.

pub mod country;
pub mod primitives;

pub use country::{CountryCode, CountryCodeError};
pub use primitives::{Address, Amount, TokenId};
