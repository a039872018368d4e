//! Template Cloning
//!
//! A [`CloneFactory`] binds to exactly one [`Template`] at construction and
//! stamps out instances of it: independent state records sharing the
//! template's behavior. Creation and initialization are a single atomic
//! step: an instance either initializes completely or never existed, and
//! no caller can observe an uninitialized clone.

pub mod errors;
pub mod factory;

pub use errors::{CloneError, CloneResult};
pub use factory::{derive_clone_address, CloneFactory, Template};
