//! Signature verification and signer recovery.
//!
//! Ed25519 has no key-recovery operation, so a [`Signature`] carries the
//! verifying key it was produced under. "Recovering" the signer means
//! verifying the signature against that key and deriving the key's address;
//! a caller therefore never trusts a claimed signer identity, only one that
//! actually verifies.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use lib_types::Address;

use crate::errors::{CryptoError, CryptoResult};

/// Domain separator for address derivation from verifying keys.
const ADDRESS_DOMAIN: &[u8] = b"NATION_ADDRESS_V1";

/// Detached signature plus the verifying key it was produced under.
#[derive(Debug, Clone)]
pub struct Signature {
    pub signature: DalekSignature,
    pub verifying_key: VerifyingKey,
}

/// Derive the canonical address of a verifying key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(key.as_bytes());
    Address::new(*hasher.finalize().as_bytes())
}

/// Verify `signature` over `message` and return the signer's address.
///
/// Fails with [`CryptoError::VerificationFailed`] if the signature does not
/// verify under its embedded key.
pub fn recover_signer(message: &[u8], signature: &Signature) -> CryptoResult<Address> {
    signature
        .verifying_key
        .verify(message, &signature.signature)
        .map_err(|_| CryptoError::VerificationFailed)?;
    Ok(address_of(&signature.verifying_key))
}

/// Seam for signature verification so callers can substitute the scheme.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` and return the signer's address
    fn recover_signer(&self, message: &[u8], signature: &Signature) -> CryptoResult<Address>;
}

/// Production verifier backed by [`recover_signer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn recover_signer(&self, message: &[u8], signature: &Signature) -> CryptoResult<Address> {
        recover_signer(message, signature)
    }
}
