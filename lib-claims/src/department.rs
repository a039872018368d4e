//! State Department
//!
//! Pausable claim gate over a citizenship token. The exactly-once invariant
//! holds because the claim record and the mint commit together: the mint is
//! the last fallible step of [`StateDepartment::claim_citizenship`], and the
//! flag write immediately follows it with nothing fallible in between. The
//! verifier only ever sees the candidate identity, never the gate's state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use lib_tokens::{CitizenshipWithRegistry, Role};
use lib_types::{Address, TokenId};

use crate::eligibility::EligibilityVerifier;
use crate::errors::{ClaimError, ClaimResult};

/// Consumer-observable claim-gate state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimEvent {
    /// An identity successfully claimed citizenship
    CitizenshipClaimed {
        account: Address,
        token_id: TokenId,
    },

    /// The pause flag changed
    PauseToggled { paused: bool },
}

/// Claim gate state.
///
/// Produced uninitialized by its template; the verifier seam is fixed at
/// initialization, so the struct holds collaborator trait objects and is
/// deliberately not serializable.
pub struct StateDepartment {
    initialized: bool,
    address: Address,
    citizenship: Address,
    verifier: Option<Arc<dyn EligibilityVerifier>>,
    default_uri: String,
    paused: bool,
    claimed: BTreeSet<Address>,
    authorities: lib_tokens::AuthoritySet,
}

impl StateDepartment {
    /// Fresh, uninitialized instance.
    pub fn new_uninitialized() -> Self {
        Self {
            initialized: false,
            address: Address::zero(),
            citizenship: Address::zero(),
            verifier: None,
            default_uri: String::new(),
            paused: false,
            claimed: BTreeSet::new(),
            authorities: lib_tokens::AuthoritySet::new(),
        }
    }

    /// One-shot initialization.
    pub fn initialize(
        &mut self,
        address: Address,
        citizenship: Address,
        verifier: Arc<dyn EligibilityVerifier>,
        default_uri: impl Into<String>,
        admin: Address,
    ) -> ClaimResult<()> {
        if self.initialized {
            return Err(ClaimError::AlreadyInitialized);
        }

        self.initialized = true;
        self.address = address;
        self.citizenship = citizenship;
        self.verifier = Some(verifier);
        self.default_uri = default_uri.into();
        self.authorities.add(Role::Admin, admin);
        Ok(())
    }

    fn require_initialized(&self) -> ClaimResult<&Arc<dyn EligibilityVerifier>> {
        if !self.initialized {
            return Err(ClaimError::NotInitialized);
        }
        self.verifier.as_ref().ok_or(ClaimError::NotInitialized)
    }

    /// Claim citizenship for `caller`, minting one token on `citizenship`.
    ///
    /// Requires this department to hold the Minter role on the token, wired
    /// at nation creation. At most one claim per identity ever succeeds.
    pub fn claim_citizenship(
        &mut self,
        caller: Address,
        citizenship: &mut CitizenshipWithRegistry,
    ) -> ClaimResult<ClaimEvent> {
        let verifier = self.require_initialized()?;
        if self.paused {
            return Err(ClaimError::ContractPaused);
        }
        if self.claimed.contains(&caller) {
            return Err(ClaimError::AlreadyClaimedCitizenship { account: caller });
        }
        if !verifier.is_eligible(&caller)? {
            return Err(ClaimError::NotEligibleForCitizenship { account: caller });
        }

        // Mint is the last fallible step; the claim record commits with it.
        let (token_id, _) = citizenship.safe_mint(self.address, caller, self.default_uri.clone())?;
        self.claimed.insert(caller);

        tracing::info!("citizenship claimed by {} (token {})", caller, token_id);

        Ok(ClaimEvent::CitizenshipClaimed {
            account: caller,
            token_id,
        })
    }

    /// Flip the pause flag. Admin only.
    pub fn toggle_pause(&mut self, caller: Address) -> ClaimResult<ClaimEvent> {
        if !self.initialized {
            return Err(ClaimError::NotInitialized);
        }
        if !self.authorities.has_role(Role::Admin, &caller) {
            return Err(ClaimError::CallerNotAdmin { account: caller });
        }
        self.paused = !self.paused;
        Ok(ClaimEvent::PauseToggled {
            paused: self.paused,
        })
    }

    /// Grant `role` to `account`. Admin only.
    pub fn grant_role(&mut self, caller: Address, role: Role, account: Address) -> ClaimResult<()> {
        if !self.initialized {
            return Err(ClaimError::NotInitialized);
        }
        self.authorities.require_admin(&caller)?;
        self.authorities.add(role, account);
        Ok(())
    }

    /// Revoke `role` from `account`. Admin only.
    pub fn revoke_role(&mut self, caller: Address, role: Role, account: Address) -> ClaimResult<()> {
        if !self.initialized {
            return Err(ClaimError::NotInitialized);
        }
        self.authorities.require_admin(&caller)?;
        self.authorities.remove(role, &account);
        Ok(())
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_claimed(&self, identity: &Address) -> bool {
        self.claimed.contains(identity)
    }

    pub fn default_uri(&self) -> &str {
        &self.default_uri
    }

    /// This instance's own address, set at initialization.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Address of the citizenship token this gate mints on.
    pub fn citizenship(&self) -> Address {
        self.citizenship
    }
}

impl std::fmt::Debug for StateDepartment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDepartment")
            .field("address", &self.address)
            .field("citizenship", &self.citizenship)
            .field("paused", &self.paused)
            .field("claims", &self.claimed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::{EligibilityError, StaticEligibility};

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    /// Claim-gate fixture: an initialized citizenship token with a
    /// department wired in as minter.
    fn fixture(verifier: Arc<dyn EligibilityVerifier>) -> (StateDepartment, CitizenshipWithRegistry) {
        let admin = addr(1);
        let dept_addr = addr(0xD0);

        let mut citizenship = CitizenshipWithRegistry::new_uninitialized();
        citizenship
            .initialize(addr(0xC0), admin, "Testland Citizenship", "TL", &[])
            .unwrap();
        citizenship
            .grant_role(admin, Role::Minter, dept_addr)
            .unwrap();

        let mut department = StateDepartment::new_uninitialized();
        department
            .initialize(dept_addr, addr(0xC0), verifier, "default://citizen", admin)
            .unwrap();

        (department, citizenship)
    }

    #[test]
    fn test_claim_mints_exactly_once() {
        let alice = addr(5);
        let (mut department, mut citizenship) =
            fixture(Arc::new(StaticEligibility::allow_all()));

        let event = department.claim_citizenship(alice, &mut citizenship).unwrap();
        assert_eq!(
            event,
            ClaimEvent::CitizenshipClaimed {
                account: alice,
                token_id: 0
            }
        );
        assert!(department.has_claimed(&alice));
        assert_eq!(citizenship.owner_of(0).unwrap(), alice);
        assert_eq!(citizenship.token_uri(0).unwrap(), "default://citizen");

        let second = department.claim_citizenship(alice, &mut citizenship);
        assert!(matches!(
            second,
            Err(ClaimError::AlreadyClaimedCitizenship { .. })
        ));
        // Still exactly one token attributable to alice.
        assert_eq!(citizenship.balance_of(&alice), 1);
    }

    #[test]
    fn test_ineligible_identity_is_rejected() {
        let alice = addr(5);
        let bob = addr(6);
        let (mut department, mut citizenship) =
            fixture(Arc::new(StaticEligibility::allow_only([alice])));

        assert!(department.claim_citizenship(alice, &mut citizenship).is_ok());

        let denied = department.claim_citizenship(bob, &mut citizenship);
        assert!(matches!(
            denied,
            Err(ClaimError::NotEligibleForCitizenship { account }) if account == bob
        ));
        assert!(!department.has_claimed(&bob));
        assert_eq!(citizenship.total_supply(), 1);
    }

    #[test]
    fn test_pause_blocks_claims() {
        let admin = addr(1);
        let (mut department, mut citizenship) =
            fixture(Arc::new(StaticEligibility::allow_all()));

        department.toggle_pause(admin).unwrap();
        let blocked = department.claim_citizenship(addr(5), &mut citizenship);
        assert!(matches!(blocked, Err(ClaimError::ContractPaused)));

        department.toggle_pause(admin).unwrap();
        assert!(department.claim_citizenship(addr(5), &mut citizenship).is_ok());
    }

    #[test]
    fn test_toggle_pause_is_admin_only() {
        let (mut department, _) = fixture(Arc::new(StaticEligibility::allow_all()));
        let result = department.toggle_pause(addr(9));
        assert!(matches!(result, Err(ClaimError::CallerNotAdmin { .. })));
    }

    #[test]
    fn test_verifier_failure_surfaces_unmodified() {
        struct BrokenVerifier;
        impl EligibilityVerifier for BrokenVerifier {
            fn is_eligible(&self, _: &Address) -> Result<bool, EligibilityError> {
                Err(EligibilityError::Unavailable("backend offline".to_string()))
            }
        }

        let (mut department, mut citizenship) = fixture(Arc::new(BrokenVerifier));
        let result = department.claim_citizenship(addr(5), &mut citizenship);
        assert!(matches!(
            result,
            Err(ClaimError::Eligibility(EligibilityError::Unavailable(_)))
        ));
        // A failed consult leaves no claim record behind.
        assert!(!department.has_claimed(&addr(5)));
    }

    #[test]
    fn test_claim_without_minter_role_leaves_no_record() {
        let admin = addr(1);
        let mut citizenship = CitizenshipWithRegistry::new_uninitialized();
        citizenship
            .initialize(addr(0xC0), admin, "Testland Citizenship", "TL", &[])
            .unwrap();

        // Department initialized but never granted Minter.
        let mut department = StateDepartment::new_uninitialized();
        department
            .initialize(
                addr(0xD0),
                addr(0xC0),
                Arc::new(StaticEligibility::allow_all()),
                "default://citizen",
                admin,
            )
            .unwrap();

        let result = department.claim_citizenship(addr(5), &mut citizenship);
        assert!(matches!(result, Err(ClaimError::Token(_))));
        assert!(!department.has_claimed(&addr(5)));
        assert_eq!(citizenship.total_supply(), 0);
    }

    #[test]
    fn test_initialize_is_one_shot() {
        let (mut department, _) = fixture(Arc::new(StaticEligibility::allow_all()));
        let result = department.initialize(
            addr(0xD0),
            addr(0xC0),
            Arc::new(StaticEligibility::allow_all()),
            "again",
            addr(1),
        );
        assert!(matches!(result, Err(ClaimError::AlreadyInitialized)));
    }
}
