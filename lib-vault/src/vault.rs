//! Escrow and wrapped-token ledger.
//!
//! Batches are atomic: every id is validated with the underlying token's
//! side-effect-free `check_transfer` preflight before the first mutation, so
//! a late gate denial cannot strand a half-deposited or half-withdrawn
//! batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_tokens::{AuthoritySet, CitizenshipWithRegistry, Role, TokenError, TokenEvent, TransferGate};
use lib_types::{Address, TokenId};

use crate::errors::{VaultError, VaultResult};

/// Wrapping vault state: underlying custody plus the wrapped token ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoterRegistration {
    initialized: bool,
    address: Address,
    name: String,
    symbol: String,
    underlying: Address,
    owners: BTreeMap<TokenId, Address>,
    approvals: BTreeMap<TokenId, Address>,
    gate: TransferGate,
    authorities: AuthoritySet,
}

impl VoterRegistration {
    /// Fresh, uninitialized instance.
    pub fn new_uninitialized() -> Self {
        Self::default()
    }

    /// One-shot initialization. `admin` receives Admin and TransferEnabler
    /// on the wrapped token.
    pub fn initialize(
        &mut self,
        address: Address,
        admin: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        underlying: Address,
    ) -> VaultResult<()> {
        if self.initialized {
            return Err(VaultError::AlreadyInitialized);
        }

        self.initialized = true;
        self.address = address;
        self.name = name.into();
        self.symbol = symbol.into();
        self.underlying = underlying;
        self.authorities.add(Role::Admin, admin);
        self.authorities.add(Role::TransferEnabler, admin);
        Ok(())
    }

    fn require_initialized(&self) -> VaultResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(VaultError::NotInitialized)
        }
    }

    // ========================================================================
    // DEPOSIT / WITHDRAW
    // ========================================================================

    /// Escrow `token_ids` from the underlying token and mint wrapped tokens
    /// of the same ids to `receiver`.
    ///
    /// Per id: the caller must be the underlying owner or its approved
    /// identity, the vault itself must hold transfer authority over the
    /// token, and the underlying gate must allow owner → vault (the vault's
    /// address has to be allowlisted on the underlying token beforehand).
    /// The whole batch fails if any single id fails.
    pub fn deposit_for(
        &mut self,
        caller: Address,
        receiver: Address,
        token_ids: &[TokenId],
        underlying: &mut CitizenshipWithRegistry,
    ) -> VaultResult<Vec<TokenEvent>> {
        self.require_initialized()?;
        if receiver.is_zero() {
            return Err(TokenError::InvalidRecipient.into());
        }

        // === VALIDATION PHASE (before any mutation) ===
        for &token_id in token_ids {
            let owner = underlying.owner_of(token_id)?;
            if caller != owner && underlying.approved(token_id) != Some(caller) {
                return Err(TokenError::CallerNotOwnerNorApproved { token_id, caller }.into());
            }
            underlying.check_transfer(self.address, owner, self.address, token_id)?;
        }

        // === MUTATION PHASE (all validations passed) ===
        let mut events = Vec::with_capacity(token_ids.len() * 2);
        for &token_id in token_ids {
            let owner = underlying.owner_of(token_id)?;
            events.push(underlying.transfer_from(self.address, owner, self.address, token_id)?);

            self.owners.insert(token_id, receiver);
            events.push(TokenEvent::Transfer {
                from: Address::zero(),
                to: receiver,
                token_id,
            });
        }

        tracing::info!(
            "{}: deposited {} token(s) for {}",
            self.symbol,
            token_ids.len(),
            receiver
        );
        Ok(events)
    }

    /// Burn wrapped `token_ids` owned by the caller and release the escrowed
    /// underlying tokens to `receiver`.
    ///
    /// The outbound underlying transfer is subject to the underlying token's
    /// own gate, so a withdrawal can fail with `TokenNonTransferable` raised
    /// by the underlying token; validation happens before the first burn, so
    /// no wrapped token is destroyed on a failed batch.
    pub fn withdraw_to(
        &mut self,
        caller: Address,
        receiver: Address,
        token_ids: &[TokenId],
        underlying: &mut CitizenshipWithRegistry,
    ) -> VaultResult<Vec<TokenEvent>> {
        self.require_initialized()?;
        if receiver.is_zero() {
            return Err(TokenError::InvalidRecipient.into());
        }

        // === VALIDATION PHASE (before any mutation) ===
        for &token_id in token_ids {
            let owner = self
                .owners
                .get(&token_id)
                .copied()
                .ok_or(VaultError::WrappedTokenNotFound(token_id))?;
            if owner != caller {
                return Err(TokenError::CallerNotTokenOwner { token_id, caller }.into());
            }
            underlying.check_transfer(self.address, self.address, receiver, token_id)?;
        }

        // === MUTATION PHASE (all validations passed) ===
        let mut events = Vec::with_capacity(token_ids.len() * 2);
        for &token_id in token_ids {
            self.owners.remove(&token_id);
            self.approvals.remove(&token_id);
            events.push(TokenEvent::Transfer {
                from: caller,
                to: Address::zero(),
                token_id,
            });

            events.push(underlying.transfer_from(
                self.address,
                self.address,
                receiver,
                token_id,
            )?);
        }

        tracing::info!(
            "{}: withdrew {} token(s) to {}",
            self.symbol,
            token_ids.len(),
            receiver
        );
        Ok(events)
    }

    // ========================================================================
    // WRAPPED TOKEN SURFACE
    // ========================================================================

    /// Move wrapped `token_id` from `from` to `to`, subject to the wrapped
    /// token's own gate.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> VaultResult<TokenEvent> {
        self.require_initialized()?;
        let owner = self
            .owners
            .get(&token_id)
            .copied()
            .ok_or(VaultError::WrappedTokenNotFound(token_id))?;
        if from != owner {
            return Err(TokenError::IncorrectOwner {
                token_id,
                claimed: from,
                actual: owner,
            }
            .into());
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient.into());
        }
        if caller != owner && self.approvals.get(&token_id) != Some(&caller) {
            return Err(TokenError::CallerNotOwnerNorApproved { token_id, caller }.into());
        }
        if !self.gate.is_transfer_allowed(&from, &to) {
            return Err(TokenError::TokenNonTransferable { token_id }.into());
        }

        self.approvals.remove(&token_id);
        self.owners.insert(token_id, to);
        Ok(TokenEvent::Transfer { from, to, token_id })
    }

    /// Approve `approved` to move wrapped `token_id`. Owner only.
    pub fn approve(
        &mut self,
        caller: Address,
        approved: Address,
        token_id: TokenId,
    ) -> VaultResult<()> {
        self.require_initialized()?;
        let owner = self
            .owners
            .get(&token_id)
            .copied()
            .ok_or(VaultError::WrappedTokenNotFound(token_id))?;
        if caller != owner {
            return Err(TokenError::CallerNotTokenOwner { token_id, caller }.into());
        }
        self.approvals.insert(token_id, approved);
        Ok(())
    }

    /// Set the wrapped token's global transferability flag. Requires the
    /// TransferEnabler role.
    pub fn set_transfers_enabled(
        &mut self,
        caller: Address,
        enabled: bool,
    ) -> VaultResult<TokenEvent> {
        self.require_initialized()?;
        self.authorities.require(Role::TransferEnabler, &caller)?;
        Ok(self.gate.set_transfers_enabled(enabled))
    }

    /// Update the wrapped token's allowlist. Admin only.
    pub fn update_allowlist(
        &mut self,
        caller: Address,
        identities: &[Address],
        flags: &[bool],
    ) -> VaultResult<Vec<TokenEvent>> {
        self.require_initialized()?;
        self.authorities.require(Role::Admin, &caller)?;
        Ok(self.gate.update_allowlist(identities, flags)?)
    }

    /// Grant `role` to `account`. Admin only.
    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> VaultResult<TokenEvent> {
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
    ) -> VaultResult<TokenEvent> {
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

    /// Owner of wrapped `token_id`.
    pub fn owner_of(&self, token_id: TokenId) -> VaultResult<Address> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(VaultError::WrappedTokenNotFound(token_id))
    }

    /// Whether a wrapped token exists for `token_id`.
    pub fn exists(&self, token_id: TokenId) -> bool {
        self.owners.contains_key(&token_id)
    }

    /// Number of wrapped tokens owned by `identity`.
    pub fn balance_of(&self, identity: &Address) -> usize {
        self.owners.values().filter(|owner| *owner == identity).count()
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

    /// Address of the underlying citizenship token.
    pub fn underlying(&self) -> Address {
        self.underlying
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
