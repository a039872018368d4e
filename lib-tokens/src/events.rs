//! Token Events
//!
//! Typed notifications returned by mutating token operations. A mint is a
//! `Transfer` from the zero address, a burn is a `Transfer` to it.

use lib_types::{Address, TokenId};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Consumer-observable token state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Ownership change, including mints (from = zero) and burns (to = zero)
    Transfer {
        from: Address,
        to: Address,
        token_id: TokenId,
    },

    /// Global transferability flag changed (or re-asserted)
    TransferabilityToggled { enabled: bool },

    /// Allowlist entry set for one identity
    AllowlistUpdated { identity: Address, allowed: bool },

    /// Burnability flag changed
    BurnabilityToggled { enabled: bool },

    /// A token's URI was overridden
    TokenUriUpdated {
        token_id: TokenId,
        uri: String,
        actor: Address,
    },

    /// Role granted to an account
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },

    /// Role revoked from an account
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
}

impl std::fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenEvent::Transfer { from, to, token_id } => {
                write!(f, "Transfer({:?} -> {:?}, id={})", from, to, token_id)
            }
            TokenEvent::TransferabilityToggled { enabled } => {
                write!(f, "TransferabilityToggled({})", enabled)
            }
            TokenEvent::AllowlistUpdated { identity, allowed } => {
                write!(f, "AllowlistUpdated({:?}, {})", identity, allowed)
            }
            TokenEvent::BurnabilityToggled { enabled } => {
                write!(f, "BurnabilityToggled({})", enabled)
            }
            TokenEvent::TokenUriUpdated { token_id, .. } => {
                write!(f, "TokenUriUpdated(id={})", token_id)
            }
            TokenEvent::RoleGranted { role, account, .. } => {
                write!(f, "RoleGranted({}, {:?})", role, account)
            }
            TokenEvent::RoleRevoked { role, account, .. } => {
                write!(f, "RoleRevoked({}, {:?})", role, account)
            }
        }
    }
}
