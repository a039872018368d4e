//! Role-Based Authority
//!
//! Permissions are an explicit mapping from roles to sets of addresses.
//! Granting and revoking is reserved to Admin-role holders; everything else
//! checks membership through [`AuthoritySet::has_role`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use lib_types::Address;

use crate::errors::{TokenError, TokenResult};

/// Role enumeration for authority checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrative authority (role management, allowlist updates)
    Admin,
    /// Mint authority (token creation)
    Minter,
    /// Token-URI override authority
    UriUpdater,
    /// Global transferability toggle authority
    TransferEnabler,
    /// Country-directory update authority
    Updater,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "Admin",
            Role::Minter => "Minter",
            Role::UriUpdater => "UriUpdater",
            Role::TransferEnabler => "TransferEnabler",
            Role::Updater => "Updater",
        };
        f.write_str(name)
    }
}

/// Authority set: maps roles to sets of authorized addresses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoritySet {
    authorities: HashMap<Role, HashSet<Address>>,
}

impl AuthoritySet {
    /// Create empty authority set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address to a role
    pub fn add(&mut self, role: Role, address: Address) {
        self.authorities.entry(role).or_default().insert(address);
    }

    /// Remove an address from a role
    pub fn remove(&mut self, role: Role, address: &Address) {
        if let Some(set) = self.authorities.get_mut(&role) {
            set.remove(address);
        }
    }

    /// Check if an address has a role
    pub fn has_role(&self, role: Role, address: &Address) -> bool {
        self.authorities
            .get(&role)
            .map(|set| set.contains(address))
            .unwrap_or(false)
    }

    /// Fail with [`TokenError::CallerDoesNotHavePermission`] unless `address`
    /// holds `role`.
    pub fn require(&self, role: Role, address: &Address) -> TokenResult<()> {
        if self.has_role(role, address) {
            return Ok(());
        }
        Err(TokenError::CallerDoesNotHavePermission {
            role,
            account: *address,
        })
    }

    /// Fail with [`TokenError::AccessControlUnauthorizedAccount`] unless
    /// `address` holds Admin. Used on the grant/revoke surface, where the
    /// violated precondition is role administration itself.
    pub fn require_admin(&self, address: &Address) -> TokenResult<()> {
        if self.has_role(Role::Admin, address) {
            return Ok(());
        }
        Err(TokenError::AccessControlUnauthorizedAccount { account: *address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_has_role() {
        let mut authorities = AuthoritySet::new();
        let alice = Address::new([1u8; 32]);

        assert!(!authorities.has_role(Role::Minter, &alice));
        authorities.add(Role::Minter, alice);
        assert!(authorities.has_role(Role::Minter, &alice));
        assert!(!authorities.has_role(Role::Admin, &alice));

        authorities.remove(Role::Minter, &alice);
        assert!(!authorities.has_role(Role::Minter, &alice));
    }

    #[test]
    fn test_require_names_role_and_account() {
        let authorities = AuthoritySet::new();
        let alice = Address::new([1u8; 32]);

        let err = authorities.require(Role::UriUpdater, &alice).unwrap_err();
        assert_eq!(
            err,
            TokenError::CallerDoesNotHavePermission {
                role: Role::UriUpdater,
                account: alice,
            }
        );
    }

    #[test]
    fn test_require_admin_distinct_error() {
        let authorities = AuthoritySet::new();
        let alice = Address::new([1u8; 32]);

        let err = authorities.require_admin(&alice).unwrap_err();
        assert_eq!(
            err,
            TokenError::AccessControlUnauthorizedAccount { account: alice }
        );
    }
}
