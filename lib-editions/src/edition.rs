//! Fee-gated URI updater.
//!
//! A grant binds only the (token id, new URI) pair: there is no nonce, no
//! expiry, and no fee binding, so an identical update can be replayed under
//! the same signature, including after a fee change. Preserved deliberately.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lib_crypto::{Signature, SignatureVerifier, UriGrant};
use lib_tokens::CitizenshipWithRegistry;
use lib_types::{Address, Amount, TokenId};

use crate::errors::{EditionError, EditionResult};

/// Consumer-observable edition state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditionEvent {
    /// A token's URI was updated through the fee gate
    UriUpdated {
        token_id: TokenId,
        uri: String,
        actor: Address,
    },

    /// The update fee changed
    FeeUpdated { fee: Amount },

    /// Collected fees were withdrawn
    Withdrawal { to: Address, amount: Amount },
}

/// Fee-gated metadata updater state.
///
/// Holds the signature-verifier seam as a trait object fixed at
/// initialization, so the struct is not serializable.
pub struct CommemorativeEdition {
    initialized: bool,
    address: Address,
    citizenship: Address,
    signer: Address,
    fee: Amount,
    collected: Amount,
    verifier: Option<Arc<dyn SignatureVerifier>>,
    admin: Address,
}

impl CommemorativeEdition {
    /// Fresh, uninitialized instance.
    pub fn new_uninitialized() -> Self {
        Self {
            initialized: false,
            address: Address::zero(),
            citizenship: Address::zero(),
            signer: Address::zero(),
            fee: 0,
            collected: 0,
            verifier: None,
            admin: Address::zero(),
        }
    }

    /// One-shot initialization.
    pub fn initialize(
        &mut self,
        address: Address,
        citizenship: Address,
        signer: Address,
        fee: Amount,
        admin: Address,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> EditionResult<()> {
        if self.initialized {
            return Err(EditionError::AlreadyInitialized);
        }

        self.initialized = true;
        self.address = address;
        self.citizenship = citizenship;
        self.signer = signer;
        self.fee = fee;
        self.verifier = Some(verifier);
        self.admin = admin;
        Ok(())
    }

    fn require_initialized(&self) -> EditionResult<&Arc<dyn SignatureVerifier>> {
        if !self.initialized {
            return Err(EditionError::NotInitialized);
        }
        self.verifier.as_ref().ok_or(EditionError::NotInitialized)
    }

    fn require_admin(&self, caller: Address) -> EditionResult<()> {
        if caller != self.admin {
            return Err(EditionError::Unauthorized { account: caller });
        }
        Ok(())
    }

    /// Update `token_id`'s URI on the citizenship token.
    ///
    /// The caller must own the token, `signature` must recover to the
    /// authorized signer over exactly (`token_id`, `new_uri`), and `payment`
    /// must cover the current fee. The update goes through the UriUpdater
    /// role this edition holds on the citizenship token, wired at nation
    /// creation.
    pub fn update_uri(
        &mut self,
        caller: Address,
        token_id: TokenId,
        new_uri: impl Into<String>,
        signature: &Signature,
        payment: Amount,
        citizenship: &mut CitizenshipWithRegistry,
    ) -> EditionResult<EditionEvent> {
        let verifier = self.require_initialized()?;
        let new_uri = new_uri.into();

        let owner = citizenship.owner_of(token_id)?;
        if caller != owner {
            return Err(EditionError::CallerNotTokenOwner { token_id, caller });
        }

        let grant = UriGrant::new(token_id, new_uri.clone());
        let recovered = verifier
            .recover_signer(&grant.signing_bytes(), signature)
            .map_err(|_| EditionError::InvalidSignature)?;
        if recovered != self.signer {
            return Err(EditionError::InvalidSignature);
        }

        if payment < self.fee {
            return Err(EditionError::InsufficientFee {
                required: self.fee,
                attached: payment,
            });
        }
        let collected = self
            .collected
            .checked_add(payment)
            .ok_or(EditionError::AmountOverflow)?;

        citizenship.set_token_uri(self.address, token_id, new_uri.clone())?;
        self.collected = collected;

        tracing::info!("token {} uri updated by {} (paid {})", token_id, caller, payment);

        Ok(EditionEvent::UriUpdated {
            token_id,
            uri: new_uri,
            actor: caller,
        })
    }

    /// Set the update fee. Admin only.
    pub fn set_fee(&mut self, caller: Address, fee: Amount) -> EditionResult<EditionEvent> {
        if !self.initialized {
            return Err(EditionError::NotInitialized);
        }
        self.require_admin(caller)?;
        self.fee = fee;
        Ok(EditionEvent::FeeUpdated { fee })
    }

    /// Withdraw `amount` of the collected fees to `to`. Admin only.
    pub fn withdraw(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> EditionResult<EditionEvent> {
        if !self.initialized {
            return Err(EditionError::NotInitialized);
        }
        self.require_admin(caller)?;
        if amount > self.collected {
            return Err(EditionError::InsufficientBalance {
                requested: amount,
                available: self.collected,
            });
        }
        self.collected -= amount;
        Ok(EditionEvent::Withdrawal { to, amount })
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn collected(&self) -> Amount {
        self.collected
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// This instance's own address, set at initialization.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Address of the citizenship token this edition updates.
    pub fn citizenship(&self) -> Address {
        self.citizenship
    }
}

impl std::fmt::Debug for CommemorativeEdition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommemorativeEdition")
            .field("address", &self.address)
            .field("citizenship", &self.citizenship)
            .field("signer", &self.signer)
            .field("fee", &self.fee)
            .field("collected", &self.collected)
            .finish()
    }
}
