//! Clone creation and address derivation.

use std::fmt;

use lib_types::Address;

use crate::errors::{CloneError, CloneResult};

/// Domain separator for clone address derivation.
const CLONE_ADDRESS_DOMAIN: &[u8] = b"NATION_CLONE_V1";

/// A deployable behavior definition.
///
/// A template produces fresh, uninitialized instances whose storage is
/// independent of every other instance. Templates are immutable once bound
/// to a factory.
pub trait Template {
    /// The per-clone state record this template produces.
    type Instance;

    /// Stable label naming the behavior this template provides.
    ///
    /// Feeds clone address derivation, so two templates of different kinds
    /// can never mint colliding addresses.
    fn kind(&self) -> &'static str;

    /// Produce a fresh, uninitialized instance.
    fn clone_instance(&self) -> Result<Self::Instance, String>;
}

/// Derive the deterministic address of a clone.
///
/// Preimage is domain-separated and length-prefixed:
/// `domain || len(kind) || kind || salt || index`, so addresses are unique
/// across (kind, salt, index) and stable across runs.
pub fn derive_clone_address(kind: &str, salt: u64, index: u64) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CLONE_ADDRESS_DOMAIN);
    hasher.update(&(kind.len() as u16).to_le_bytes());
    hasher.update(kind.as_bytes());
    hasher.update(&salt.to_le_bytes());
    hasher.update(&index.to_le_bytes());
    Address::new(*hasher.finalize().as_bytes())
}

/// Stamps out clones of one template and initializes each atomically.
///
/// The factory hands an instance out only after its init call succeeded, so
/// an uninitialized clone is unobservable. A failed creation or
/// initialization leaves the factory untouched: no counter moves, `latest`
/// keeps its prior value, and the half-built instance is dropped.
#[derive(Debug, Clone)]
pub struct CloneFactory<T: Template> {
    template: T,
    salt: u64,
    clones_created: u64,
    latest: Option<Address>,
}

impl<T: Template> CloneFactory<T> {
    /// Bind a factory to `template`.
    ///
    /// `salt` distinguishes factory generations sharing a template kind;
    /// factories with different salts never derive the same address.
    pub fn new(template: T, salt: u64) -> Self {
        Self {
            template,
            salt,
            clones_created: 0,
            latest: None,
        }
    }

    /// The bound template.
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Number of clones created so far.
    pub fn clones_created(&self) -> u64 {
        self.clones_created
    }

    /// Create a new clone and initialize it in one atomic step.
    ///
    /// `init` receives the clone's address and its fresh state; any error it
    /// returns aborts the creation with [`CloneError::InitializationFailed`]
    /// and no state is retained.
    pub fn create_clone<E: fmt::Display>(
        &mut self,
        init: impl FnOnce(Address, &mut T::Instance) -> Result<(), E>,
    ) -> CloneResult<(Address, T::Instance)> {
        let mut instance = self
            .template
            .clone_instance()
            .map_err(CloneError::CloneCreationFailed)?;

        let address = derive_clone_address(self.template.kind(), self.salt, self.clones_created);

        init(address, &mut instance)
            .map_err(|e| CloneError::InitializationFailed(e.to_string()))?;

        self.clones_created += 1;
        self.latest = Some(address);

        tracing::debug!(
            "clone created: kind={} address={} index={}",
            self.template.kind(),
            address,
            self.clones_created - 1
        );

        Ok((address, instance))
    }

    /// Address of the most recently created clone.
    pub fn latest_clone(&self) -> CloneResult<Address> {
        self.latest.ok_or(CloneError::NoCloneCreatedYet)
    }
}
