//! Eligibility Verification Seam
//!
//! The claim gate never decides eligibility itself; it consults an
//! [`EligibilityVerifier`]. Verifiers receive only the candidate identity,
//! so a verifier implementation has no path back into the gate's state.

use std::collections::BTreeSet;

use lib_types::Address;
use thiserror::Error;

/// Transport or backend failure while consulting a verifier.
///
/// Surfaced to callers unmodified; an unavailable verifier is not the same
/// as an ineligible identity.
#[derive(Error, Debug, Clone)]
pub enum EligibilityError {
    #[error("eligibility verifier unavailable: {0}")]
    Unavailable(String),
}

/// External eligibility oracle.
pub trait EligibilityVerifier: Send + Sync {
    /// Whether `identity` is eligible for citizenship
    fn is_eligible(&self, identity: &Address) -> Result<bool, EligibilityError>;
}

/// Fixed-answer verifier for tests and bootstrap deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticEligibility {
    eligible: BTreeSet<Address>,
    allow_all: bool,
}

impl StaticEligibility {
    /// Everyone is eligible
    pub fn allow_all() -> Self {
        Self {
            eligible: BTreeSet::new(),
            allow_all: true,
        }
    }

    /// Only the listed identities are eligible
    pub fn allow_only(identities: impl IntoIterator<Item = Address>) -> Self {
        Self {
            eligible: identities.into_iter().collect(),
            allow_all: false,
        }
    }
}

impl EligibilityVerifier for StaticEligibility {
    fn is_eligible(&self, identity: &Address) -> Result<bool, EligibilityError> {
        Ok(self.allow_all || self.eligible.contains(identity))
    }
}
