//! Holdings-Tracking Citizenship Variant
//!
//! [`CitizenshipWithRegistry`] wraps [`Citizenship`] and additionally keeps
//! an ordered per-holder index of owned token ids, maintained through every
//! mint, burn, and transfer. Downstream components enumerate a holder's
//! tokens through [`CitizenshipWithRegistry::tokens_of`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use lib_types::{Address, TokenId};

use crate::citizen::Citizenship;
use crate::errors::TokenResult;
use crate::events::TokenEvent;
use crate::roles::Role;

/// Membership token with a per-holder holdings index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitizenshipWithRegistry {
    token: Citizenship,
    holdings: BTreeMap<Address, BTreeSet<TokenId>>,
}

impl CitizenshipWithRegistry {
    /// Fresh, uninitialized instance.
    pub fn new_uninitialized() -> Self {
        Self::default()
    }

    /// One-shot initialization; `initial_allowlist` seeds the transfer gate
    /// with pre-approved destinations (e.g. a wrapping vault).
    pub fn initialize(
        &mut self,
        address: Address,
        admin: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_allowlist: &[Address],
    ) -> TokenResult<()> {
        self.token.initialize(address, admin, name, symbol)?;
        let flags = vec![true; initial_allowlist.len()];
        self.token.update_allowlist(admin, initial_allowlist, &flags)?;
        Ok(())
    }

    /// Ordered ids currently owned by `identity`.
    pub fn tokens_of(&self, identity: &Address) -> Vec<TokenId> {
        self.holdings
            .get(identity)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn index_remove(&mut self, identity: &Address, token_id: TokenId) {
        if let Some(set) = self.holdings.get_mut(identity) {
            set.remove(&token_id);
            if set.is_empty() {
                self.holdings.remove(identity);
            }
        }
    }

    fn index_add(&mut self, identity: Address, token_id: TokenId) {
        self.holdings.entry(identity).or_default().insert(token_id);
    }

    // ========================================================================
    // MUTATIONS (delegate, then maintain the index)
    // ========================================================================

    pub fn safe_mint(
        &mut self,
        caller: Address,
        to: Address,
        uri: impl Into<String>,
    ) -> TokenResult<(TokenId, TokenEvent)> {
        let (token_id, event) = self.token.safe_mint(caller, to, uri)?;
        self.index_add(to, token_id);
        Ok((token_id, event))
    }

    pub fn burn_token(&mut self, caller: Address, token_id: TokenId) -> TokenResult<TokenEvent> {
        let owner = self.token.owner_of(token_id)?;
        let event = self.token.burn_token(caller, token_id)?;
        self.index_remove(&owner, token_id);
        Ok(event)
    }

    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> TokenResult<TokenEvent> {
        let event = self.token.transfer_from(caller, from, to, token_id)?;
        self.index_remove(&from, token_id);
        self.index_add(to, token_id);
        Ok(event)
    }

    // ========================================================================
    // DELEGATED SURFACE
    // ========================================================================

    pub fn approve(
        &mut self,
        caller: Address,
        approved: Address,
        token_id: TokenId,
    ) -> TokenResult<()> {
        self.token.approve(caller, approved, token_id)
    }

    pub fn approved(&self, token_id: TokenId) -> Option<Address> {
        self.token.approved(token_id)
    }

    pub fn check_transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> TokenResult<()> {
        self.token.check_transfer(caller, from, to, token_id)
    }

    pub fn set_token_uri(
        &mut self,
        caller: Address,
        token_id: TokenId,
        uri: impl Into<String>,
    ) -> TokenResult<TokenEvent> {
        self.token.set_token_uri(caller, token_id, uri)
    }

    pub fn token_uri(&self, token_id: TokenId) -> TokenResult<&str> {
        self.token.token_uri(token_id)
    }

    pub fn toggle_burnability(&mut self, caller: Address, enabled: bool) -> TokenResult<TokenEvent> {
        self.token.toggle_burnability(caller, enabled)
    }

    pub fn set_transfers_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> TokenResult<TokenEvent> {
        self.token.set_transfers_enabled(caller, enabled)
    }

    pub fn update_allowlist(
        &mut self,
        caller: Address,
        identities: &[Address],
        flags: &[bool],
    ) -> TokenResult<Vec<TokenEvent>> {
        self.token.update_allowlist(caller, identities, flags)
    }

    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> TokenResult<TokenEvent> {
        self.token.grant_role(caller, role, account)
    }

    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> TokenResult<TokenEvent> {
        self.token.revoke_role(caller, role, account)
    }

    pub fn owner_of(&self, token_id: TokenId) -> TokenResult<Address> {
        self.token.owner_of(token_id)
    }

    pub fn exists(&self, token_id: TokenId) -> bool {
        self.token.exists(token_id)
    }

    pub fn balance_of(&self, identity: &Address) -> usize {
        self.token.balance_of(identity)
    }

    pub fn total_supply(&self) -> usize {
        self.token.total_supply()
    }

    pub fn name(&self) -> &str {
        self.token.name()
    }

    pub fn symbol(&self) -> &str {
        self.token.symbol()
    }

    pub fn address(&self) -> Address {
        self.token.address()
    }

    pub fn transfers_enabled(&self) -> bool {
        self.token.transfers_enabled()
    }

    pub fn is_allowlisted(&self, identity: &Address) -> bool {
        self.token.is_allowlisted(identity)
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.token.has_role(role, account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    fn initialized(admin: Address, allowlist: &[Address]) -> CitizenshipWithRegistry {
        let mut token = CitizenshipWithRegistry::new_uninitialized();
        token
            .initialize(addr(0xF0), admin, "Testland Citizenship", "TL", allowlist)
            .unwrap();
        token
    }

    #[test]
    fn test_initial_allowlist_is_seeded() {
        let admin = addr(1);
        let vault = addr(0xAA);
        let token = initialized(admin, &[vault]);
        assert!(token.is_allowlisted(&vault));
        assert!(!token.is_allowlisted(&addr(2)));
    }

    #[test]
    fn test_holdings_track_mints() {
        let admin = addr(1);
        let holder = addr(2);
        let mut token = initialized(admin, &[]);

        token.safe_mint(admin, holder, "a").unwrap();
        token.safe_mint(admin, holder, "b").unwrap();
        token.safe_mint(admin, addr(3), "c").unwrap();

        assert_eq!(token.tokens_of(&holder), vec![0, 1]);
        assert_eq!(token.tokens_of(&addr(3)), vec![2]);
    }

    #[test]
    fn test_holdings_track_transfers() {
        let admin = addr(1);
        let holder = addr(2);
        let other = addr(3);
        let mut token = initialized(admin, &[]);
        token.safe_mint(admin, holder, "a").unwrap();
        token.safe_mint(admin, holder, "b").unwrap();
        token.set_transfers_enabled(admin, true).unwrap();

        token.transfer_from(holder, holder, other, 0).unwrap();

        assert_eq!(token.tokens_of(&holder), vec![1]);
        assert_eq!(token.tokens_of(&other), vec![0]);
    }

    #[test]
    fn test_holdings_track_burns() {
        let admin = addr(1);
        let holder = addr(2);
        let mut token = initialized(admin, &[]);
        token.safe_mint(admin, holder, "a").unwrap();

        token.burn_token(holder, 0).unwrap();
        assert!(token.tokens_of(&holder).is_empty());
        assert_eq!(token.balance_of(&holder), 0);
    }

    #[test]
    fn test_failed_transfer_leaves_index_untouched() {
        let admin = addr(1);
        let holder = addr(2);
        let mut token = initialized(admin, &[]);
        token.safe_mint(admin, holder, "a").unwrap();

        // Gate denies: neither global flag nor allowlist.
        assert!(token.transfer_from(holder, holder, addr(3), 0).is_err());
        assert_eq!(token.tokens_of(&holder), vec![0]);
        assert!(token.tokens_of(&addr(3)).is_empty());
    }
}
