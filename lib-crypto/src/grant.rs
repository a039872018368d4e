//! Structured metadata-update grants.

use lib_types::TokenId;

/// Domain separator for URI-grant signing bytes.
const URI_GRANT_DOMAIN: &[u8] = b"NATION_URI_GRANT_V1";

/// Authorization message for a single token-URI update.
///
/// A grant binds exactly the (token id, uri) pair: two grants agree iff both
/// fields agree. It deliberately carries no nonce and no expiry, so an
/// identical update may be submitted again under the same signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriGrant {
    pub token_id: TokenId,
    pub uri: String,
}

impl UriGrant {
    pub fn new(token_id: TokenId, uri: impl Into<String>) -> Self {
        Self {
            token_id,
            uri: uri.into(),
        }
    }

    /// Canonical bytes to sign.
    ///
    /// Length-prefixed encoding keeps the mapping injective: no (id, uri)
    /// pair shares a preimage with any other.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let uri = self.uri.as_bytes();
        let mut bytes = Vec::with_capacity(URI_GRANT_DOMAIN.len() + 8 + 8 + uri.len());
        bytes.extend_from_slice(URI_GRANT_DOMAIN);
        bytes.extend_from_slice(&self.token_id.to_le_bytes());
        bytes.extend_from_slice(&(uri.len() as u64).to_le_bytes());
        bytes.extend_from_slice(uri);
        bytes
    }
}
