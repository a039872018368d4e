//! Commemorative Editions
//!
//! A [`CommemorativeEdition`] lets a citizenship-token holder replace their
//! token's metadata URI after paying a configurable fee, authorized by a
//! signature from a designated signer over the exact (token id, new URI)
//! pair. Collected fees accumulate until the admin withdraws them.

pub mod edition;
pub mod errors;

pub use edition::{CommemorativeEdition, EditionEvent};
pub use errors::{EditionError, EditionResult};
