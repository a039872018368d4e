//! Signing and Verification Primitives
//!
//! Narrow cryptographic surface for the nation stack:
//!
//! - [`Keypair`]: ed25519 signing identity with a derived [`Address`]
//! - [`Signature`]: detached signature carrying its verifying key
//! - [`recover_signer`]: verify a signature and return the signer's address
//! - [`SignatureVerifier`]: seam so callers can substitute verification
//! - [`UriGrant`]: canonical signing bytes for metadata-update grants
//!
//! BLAKE3 is the canonical hash for identity derivation; signer addresses
//! are derived from verifying keys, never carried alongside them.

pub mod errors;
pub mod grant;
pub mod keypair;
pub mod verification;

pub use errors::{CryptoError, CryptoResult};
pub use grant::UriGrant;
pub use keypair::Keypair;
pub use verification::{recover_signer, Ed25519Verifier, Signature, SignatureVerifier};

/// Computes the canonical BLAKE3 hash of `data`.
pub fn hash_blake3(data: &[u8]) -> [u8; 32] {
    blake3::hash(data).into()
}
