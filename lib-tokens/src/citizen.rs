//! Citizenship Membership Token
//!
//! Unique-ownership token registry: every token id has exactly one owner,
//! ids are assigned sequentially from 0, and transfers pass through the
//! [`TransferGate`]. Mint, burn toggling, URI overrides, and role management
//! are each guarded by their own role.
//!
//! Instances are produced uninitialized by a template and become usable only
//! after a successful one-shot [`Citizenship::initialize`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_types::{Address, TokenId};

use crate::errors::{TokenError, TokenResult};
use crate::events::TokenEvent;
use crate::gate::TransferGate;
use crate::roles::{AuthoritySet, Role};

/// Membership token state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citizenship {
    initialized: bool,
    address: Address,
    name: String,
    symbol: String,
    next_id: TokenId,
    owners: BTreeMap<TokenId, Address>,
    mint_uris: BTreeMap<TokenId, String>,
    uri_overrides: BTreeMap<TokenId, String>,
    approvals: BTreeMap<TokenId, Address>,
    burning_enabled: bool,
    gate: TransferGate,
    authorities: AuthoritySet,
}

impl Citizenship {
    /// Fresh, uninitialized instance. Every entrypoint fails with
    /// [`TokenError::NotInitialized`] until [`Self::initialize`] succeeds.
    pub fn new_uninitialized() -> Self {
        Self::default()
    }

    /// One-shot initialization.
    ///
    /// Grants Admin, Minter, UriUpdater, and TransferEnabler to `admin`;
    /// burning starts enabled, transfers start globally disabled.
    pub fn initialize(
        &mut self,
        address: Address,
        admin: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> TokenResult<()> {
        if self.initialized {
            return Err(TokenError::AlreadyInitialized);
        }
        if admin.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        self.initialized = true;
        self.address = address;
        self.name = name.into();
        self.symbol = symbol.into();
        self.burning_enabled = true;
        self.authorities.add(Role::Admin, admin);
        self.authorities.add(Role::Minter, admin);
        self.authorities.add(Role::UriUpdater, admin);
        self.authorities.add(Role::TransferEnabler, admin);
        Ok(())
    }

    fn require_initialized(&self) -> TokenResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(TokenError::NotInitialized)
        }
    }

    // ========================================================================
    // MINT / BURN
    // ========================================================================

    /// Mint the next sequential token id to `to`, recording `uri` as its
    /// mint-time URI. Requires the Minter role.
    pub fn safe_mint(
        &mut self,
        caller: Address,
        to: Address,
        uri: impl Into<String>,
    ) -> TokenResult<(TokenId, TokenEvent)> {
        self.require_initialized()?;
        self.authorities.require(Role::Minter, &caller)?;
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        let token_id = self.next_id;
        self.next_id += 1;
        self.owners.insert(token_id, to);
        self.mint_uris.insert(token_id, uri.into());

        tracing::info!("minted token {} of {} to {}", token_id, self.symbol, to);

        Ok((
            token_id,
            TokenEvent::Transfer {
                from: Address::zero(),
                to,
                token_id,
            },
        ))
    }

    /// Burn `token_id`, removing its ownership record, URIs, and approval.
    ///
    /// The caller must own the token or be approved for it, and burning must
    /// be enabled.
    pub fn burn_token(&mut self, caller: Address, token_id: TokenId) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        if !self.burning_enabled {
            return Err(TokenError::BurningTokensIsDisabled);
        }
        let owner = self.owner_of(token_id)?;
        if caller != owner && self.approvals.get(&token_id) != Some(&caller) {
            return Err(TokenError::CallerNotOwnerNorApproved { token_id, caller });
        }

        self.owners.remove(&token_id);
        self.mint_uris.remove(&token_id);
        self.uri_overrides.remove(&token_id);
        self.approvals.remove(&token_id);

        Ok(TokenEvent::Transfer {
            from: owner,
            to: Address::zero(),
            token_id,
        })
    }

    /// Enable or disable burning. Admin only.
    pub fn toggle_burnability(&mut self, caller: Address, enabled: bool) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require(Role::Admin, &caller)?;
        self.burning_enabled = enabled;
        Ok(TokenEvent::BurnabilityToggled { enabled })
    }

    // ========================================================================
    // URI MANAGEMENT
    // ========================================================================

    /// Override the URI of one token. Requires the UriUpdater role.
    ///
    /// The event's `actor` is the caller performing the update, not the
    /// token's owner.
    pub fn set_token_uri(
        &mut self,
        caller: Address,
        token_id: TokenId,
        uri: impl Into<String>,
    ) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require(Role::UriUpdater, &caller)?;
        if !self.owners.contains_key(&token_id) {
            return Err(TokenError::TokenNotFound(token_id));
        }

        let uri = uri.into();
        self.uri_overrides.insert(token_id, uri.clone());
        Ok(TokenEvent::TokenUriUpdated {
            token_id,
            uri,
            actor: caller,
        })
    }

    /// The token's URI: the override if one was set, else the mint-time URI.
    pub fn token_uri(&self, token_id: TokenId) -> TokenResult<&str> {
        if let Some(uri) = self.uri_overrides.get(&token_id) {
            return Ok(uri);
        }
        self.mint_uris
            .get(&token_id)
            .map(String::as_str)
            .ok_or(TokenError::TokenNotFound(token_id))
    }

    // ========================================================================
    // APPROVALS & TRANSFER
    // ========================================================================

    /// Approve `approved` to move `token_id`. Owner only; the approval is
    /// cleared by transfer and burn.
    pub fn approve(
        &mut self,
        caller: Address,
        approved: Address,
        token_id: TokenId,
    ) -> TokenResult<()> {
        self.require_initialized()?;
        let owner = self.owner_of(token_id)?;
        if caller != owner {
            return Err(TokenError::CallerNotTokenOwner { token_id, caller });
        }
        self.approvals.insert(token_id, approved);
        Ok(())
    }

    /// The approved identity for `token_id`, if any.
    pub fn approved(&self, token_id: TokenId) -> Option<Address> {
        self.approvals.get(&token_id).copied()
    }

    /// Side-effect-free preflight applying exactly the preconditions of
    /// [`Self::transfer_from`]. Batch callers use this to validate every
    /// element before mutating any.
    pub fn check_transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> TokenResult<()> {
        self.require_initialized()?;
        let owner = self.owner_of(token_id)?;
        if from != owner {
            return Err(TokenError::IncorrectOwner {
                token_id,
                claimed: from,
                actual: owner,
            });
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        if caller != owner && self.approvals.get(&token_id) != Some(&caller) {
            return Err(TokenError::CallerNotOwnerNorApproved { token_id, caller });
        }
        if !self.gate.is_transfer_allowed(&from, &to) {
            return Err(TokenError::TokenNonTransferable { token_id });
        }
        Ok(())
    }

    /// Move `token_id` from `from` to `to`, subject to the gate.
    ///
    /// The caller must be the owner or approved; any approval is consumed.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> TokenResult<TokenEvent> {
        self.check_transfer(caller, from, to, token_id)?;

        self.approvals.remove(&token_id);
        self.owners.insert(token_id, to);

        Ok(TokenEvent::Transfer { from, to, token_id })
    }

    // ========================================================================
    // GATE & ROLES
    // ========================================================================

    /// Set the global transferability flag. Requires the TransferEnabler
    /// role.
    pub fn set_transfers_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require(Role::TransferEnabler, &caller)?;
        tracing::info!("{}: transfers_enabled={}", self.symbol, enabled);
        Ok(self.gate.set_transfers_enabled(enabled))
    }

    /// Update allowlist entries. Admin only.
    pub fn update_allowlist(
        &mut self,
        caller: Address,
        identities: &[Address],
        flags: &[bool],
    ) -> TokenResult<Vec<TokenEvent>> {
        self.require_initialized()?;
        self.authorities.require(Role::Admin, &caller)?;
        self.gate.update_allowlist(identities, flags)
    }

    /// Grant `role` to `account`. Admin only.
    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require_admin(&caller)?;
        self.authorities.add(role, account);
        Ok(TokenEvent::RoleGranted {
            role,
            account,
            sender: caller,
        })
    }

    /// Revoke `role` from `account`. Admin only.
    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> TokenResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require_admin(&caller)?;
        self.authorities.remove(role, &account);
        Ok(TokenEvent::RoleRevoked {
            role,
            account,
            sender: caller,
        })
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    /// Owner of `token_id`; [`TokenError::TokenNotFound`] if it does not
    /// exist.
    pub fn owner_of(&self, token_id: TokenId) -> TokenResult<Address> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(TokenError::TokenNotFound(token_id))
    }

    /// Whether `token_id` currently exists.
    pub fn exists(&self, token_id: TokenId) -> bool {
        self.owners.contains_key(&token_id)
    }

    /// Number of tokens owned by `identity`.
    pub fn balance_of(&self, identity: &Address) -> usize {
        self.owners.values().filter(|owner| *owner == identity).count()
    }

    /// Number of tokens currently in existence.
    pub fn total_supply(&self) -> usize {
        self.owners.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// This instance's own address, set at initialization.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn burning_enabled(&self) -> bool {
        self.burning_enabled
    }

    pub fn transfers_enabled(&self) -> bool {
        self.gate.transfers_enabled()
    }

    pub fn is_allowlisted(&self, identity: &Address) -> bool {
        self.gate.is_allowlisted(identity)
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.authorities.has_role(role, account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    fn initialized(admin: Address) -> Citizenship {
        let mut token = Citizenship::new_uninitialized();
        token
            .initialize(addr(0xF0), admin, "Testland Citizenship", "TL")
            .unwrap();
        token
    }

    #[test]
    fn test_initialize_is_one_shot() {
        let admin = addr(1);
        let mut token = initialized(admin);
        let result = token.initialize(addr(0xF0), admin, "Again", "AG");
        assert!(matches!(result, Err(TokenError::AlreadyInitialized)));
    }

    #[test]
    fn test_uninitialized_rejects_operations() {
        let mut token = Citizenship::new_uninitialized();
        let result = token.safe_mint(addr(1), addr(2), "uri");
        assert!(matches!(result, Err(TokenError::NotInitialized)));
    }

    #[test]
    fn test_mint_assigns_sequential_ids_from_zero() {
        let admin = addr(1);
        let mut token = initialized(admin);

        let (first, event) = token.safe_mint(admin, addr(2), "a").unwrap();
        let (second, _) = token.safe_mint(admin, addr(3), "b").unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(
            event,
            TokenEvent::Transfer {
                from: Address::zero(),
                to: addr(2),
                token_id: 0
            }
        );
        assert_eq!(token.owner_of(0).unwrap(), addr(2));
        assert_eq!(token.total_supply(), 2);
    }

    #[test]
    fn test_mint_requires_minter_role() {
        let admin = addr(1);
        let mut token = initialized(admin);

        let result = token.safe_mint(addr(9), addr(2), "a");
        assert!(matches!(
            result,
            Err(TokenError::CallerDoesNotHavePermission {
                role: Role::Minter,
                ..
            })
        ));
    }

    #[test]
    fn test_mint_rejects_zero_recipient() {
        let admin = addr(1);
        let mut token = initialized(admin);
        let result = token.safe_mint(admin, Address::zero(), "a");
        assert!(matches!(result, Err(TokenError::InvalidRecipient)));
    }

    #[test]
    fn test_transfer_denied_until_enabled_or_allowlisted() {
        let admin = addr(1);
        let holder = addr(2);
        let other = addr(3);
        let mut token = initialized(admin);
        token.safe_mint(admin, holder, "a").unwrap();

        let denied = token.transfer_from(holder, holder, other, 0);
        assert!(matches!(
            denied,
            Err(TokenError::TokenNonTransferable { token_id: 0 })
        ));

        token.update_allowlist(admin, &[other], &[true]).unwrap();
        token.transfer_from(holder, holder, other, 0).unwrap();
        assert_eq!(token.owner_of(0).unwrap(), other);
    }

    #[test]
    fn test_transfer_with_global_flag() {
        let admin = addr(1);
        let holder = addr(2);
        let mut token = initialized(admin);
        token.safe_mint(admin, holder, "a").unwrap();

        token.set_transfers_enabled(admin, true).unwrap();
        token.transfer_from(holder, holder, addr(3), 0).unwrap();
        assert_eq!(token.owner_of(0).unwrap(), addr(3));
    }

    #[test]
    fn test_transfer_rejects_wrong_from() {
        let admin = addr(1);
        let mut token = initialized(admin);
        token.safe_mint(admin, addr(2), "a").unwrap();
        token.set_transfers_enabled(admin, true).unwrap();

        let result = token.transfer_from(addr(3), addr(3), addr(4), 0);
        assert!(matches!(result, Err(TokenError::IncorrectOwner { .. })));
    }

    #[test]
    fn test_approval_lets_non_owner_transfer_once() {
        let admin = addr(1);
        let holder = addr(2);
        let broker = addr(3);
        let mut token = initialized(admin);
        token.safe_mint(admin, holder, "a").unwrap();
        token.set_transfers_enabled(admin, true).unwrap();

        // Not yet approved.
        let result = token.transfer_from(broker, holder, addr(4), 0);
        assert!(matches!(
            result,
            Err(TokenError::CallerNotOwnerNorApproved { .. })
        ));

        token.approve(holder, broker, 0).unwrap();
        token.transfer_from(broker, holder, addr(4), 0).unwrap();
        assert_eq!(token.owner_of(0).unwrap(), addr(4));

        // Approval was consumed by the transfer.
        assert_eq!(token.approved(0), None);
    }

    #[test]
    fn test_approve_is_owner_only() {
        let admin = addr(1);
        let mut token = initialized(admin);
        token.safe_mint(admin, addr(2), "a").unwrap();

        let result = token.approve(addr(3), addr(3), 0);
        assert!(matches!(
            result,
            Err(TokenError::CallerNotTokenOwner { .. })
        ));
    }

    #[test]
    fn test_burn_and_burnability_toggle() {
        let admin = addr(1);
        let holder = addr(2);
        let mut token = initialized(admin);
        token.safe_mint(admin, holder, "a").unwrap();

        token.toggle_burnability(admin, false).unwrap();
        let blocked = token.burn_token(holder, 0);
        assert!(matches!(blocked, Err(TokenError::BurningTokensIsDisabled)));

        token.toggle_burnability(admin, true).unwrap();
        let event = token.burn_token(holder, 0).unwrap();
        assert_eq!(
            event,
            TokenEvent::Transfer {
                from: holder,
                to: Address::zero(),
                token_id: 0
            }
        );
        assert!(!token.exists(0));
        assert!(matches!(token.owner_of(0), Err(TokenError::TokenNotFound(0))));
    }

    #[test]
    fn test_uri_override_and_fallback() {
        let admin = addr(1);
        let mut token = initialized(admin);
        token.safe_mint(admin, addr(2), "mint://a").unwrap();
        token.safe_mint(admin, addr(2), "mint://b").unwrap();

        assert_eq!(token.token_uri(0).unwrap(), "mint://a");

        let event = token.set_token_uri(admin, 0, "custom://a").unwrap();
        assert_eq!(
            event,
            TokenEvent::TokenUriUpdated {
                token_id: 0,
                uri: "custom://a".to_string(),
                actor: admin,
            }
        );

        // Only the overridden id changes.
        assert_eq!(token.token_uri(0).unwrap(), "custom://a");
        assert_eq!(token.token_uri(1).unwrap(), "mint://b");
    }

    #[test]
    fn test_set_token_uri_requires_role() {
        let admin = addr(1);
        let mut token = initialized(admin);
        token.safe_mint(admin, addr(2), "a").unwrap();

        let result = token.set_token_uri(addr(2), 0, "x");
        assert!(matches!(
            result,
            Err(TokenError::CallerDoesNotHavePermission {
                role: Role::UriUpdater,
                ..
            })
        ));
    }

    #[test]
    fn test_role_management_is_admin_only() {
        let admin = addr(1);
        let minter = addr(5);
        let mut token = initialized(admin);

        let result = token.grant_role(addr(9), Role::Minter, minter);
        assert!(matches!(
            result,
            Err(TokenError::AccessControlUnauthorizedAccount { .. })
        ));

        token.grant_role(admin, Role::Minter, minter).unwrap();
        assert!(token.has_role(Role::Minter, &minter));
        token.safe_mint(minter, addr(2), "a").unwrap();

        token.revoke_role(admin, Role::Minter, minter).unwrap();
        assert!(token.safe_mint(minter, addr(2), "b").is_err());
    }

    #[test]
    fn test_state_survives_serialization() {
        let admin = addr(1);
        let mut token = initialized(admin);
        token.safe_mint(admin, addr(2), "a").unwrap();
        token.update_allowlist(admin, &[addr(3)], &[true]).unwrap();

        let bytes = bincode::serialize(&token).unwrap();
        let restored: Citizenship = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.owner_of(0).unwrap(), addr(2));
        assert!(restored.is_allowlisted(&addr(3)));
    }
}
