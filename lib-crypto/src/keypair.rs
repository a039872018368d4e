//! Signing identities.

use ed25519_dalek::{Signer, SigningKey};
use lib_types::Address;
use rand::rngs::OsRng;

use crate::verification::Signature;

/// Ed25519 signing identity.
///
/// The holder's [`Address`] is derived from the verifying key, so the same
/// seed always yields the same identity.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte seed (test fixtures)
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// The address derived from this keypair's verifying key
    pub fn address(&self) -> Address {
        crate::verification::address_of(&self.signing.verifying_key())
    }

    /// Sign `message`, producing a signature that carries the verifying key
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            signature: self.signing.sign(message),
            verifying_key: self.signing.verifying_key(),
        }
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_keypair_is_deterministic() {
        let a = Keypair::from_seed([7u8; 32]);
        let b = Keypair::from_seed([7u8; 32]);
        assert_eq!(a.address(), b.address());

        let c = Keypair::from_seed([8u8; 32]);
        assert_ne!(a.address(), c.address());
    }

    #[test]
    fn test_generated_keypair_has_nonzero_address() {
        let keypair = Keypair::generate();
        assert!(!keypair.address().is_zero());
    }
}
