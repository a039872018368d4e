//! Transfer Gating
//!
//! Transfers are denied by default. A transfer between two non-zero
//! identities passes iff the global flag is enabled OR the destination is
//! allowlisted; mints and burns (zero source or destination) always pass.
//!
//! The gate carries no authorization of its own; callers decide which role
//! guards each mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_types::Address;

use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;

/// Global transferability flag plus a destination allowlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferGate {
    transfers_enabled: bool,
    allowlist: BTreeMap<Address, bool>,
}

impl TransferGate {
    /// Fresh gate: transfers globally disabled, empty allowlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global transferability flag.
    ///
    /// Idempotent: re-asserting the current value still produces the event.
    pub fn set_transfers_enabled(&mut self, enabled: bool) -> TokenEvent {
        self.transfers_enabled = enabled;
        TokenEvent::TransferabilityToggled { enabled }
    }

    /// Set the allowlist flag for each identity, in order (last wins for
    /// duplicates). `identities` and `flags` must be equal length.
    pub fn update_allowlist(
        &mut self,
        identities: &[Address],
        flags: &[bool],
    ) -> TokenResult<Vec<TokenEvent>> {
        if identities.len() != flags.len() {
            return Err(TokenError::ArgumentLengthMismatch {
                identities: identities.len(),
                flags: flags.len(),
            });
        }

        let mut events = Vec::with_capacity(identities.len());
        for (identity, &allowed) in identities.iter().zip(flags) {
            self.allowlist.insert(*identity, allowed);
            events.push(TokenEvent::AllowlistUpdated {
                identity: *identity,
                allowed,
            });
        }
        Ok(events)
    }

    /// Whether a transfer from `from` to `to` passes the gate.
    pub fn is_transfer_allowed(&self, from: &Address, to: &Address) -> bool {
        // Mint and burn bypass the gate entirely.
        if from.is_zero() || to.is_zero() {
            return true;
        }
        self.transfers_enabled || self.is_allowlisted(to)
    }

    /// The global flag's current value.
    pub fn transfers_enabled(&self) -> bool {
        self.transfers_enabled
    }

    /// Whether `identity` is exempt from the global restriction.
    pub fn is_allowlisted(&self, identity: &Address) -> bool {
        self.allowlist.get(identity).copied().unwrap_or(false)
    }
}
