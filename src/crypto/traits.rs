//! Capability traits for swappable key derivation and AEAD backends.

use zeroize::Zeroizing;

use super::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::Result;

/// Turns a password and salt into symmetric key material.
///
/// Implementations must be deterministic for a given `(password, salt)` and
/// deliberately expensive.
pub trait KeyDerivation: Send + Sync {
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>>;
}

/// Authenticated encryption with associated data and a detached tag.
///
/// Each implementation has a unique version tag, recorded as the first byte
/// of every frame it produces so decode can pick the matching cipher.
pub trait AuthenticatedCipher: Send + Sync {
    /// Frame version tag identifying this cipher.
    fn version_tag(&self) -> u8;

    /// Encrypt `plaintext`, returning `(ciphertext, tag)`.
    /// Ciphertext length always equals plaintext length.
    fn encrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, [u8; TAG_LEN])>;

    /// Verify `tag` and decrypt. Any mismatch (wrong key, flipped bit,
    /// altered associated data) is
    /// [`StegoError::AuthenticationFailed`](crate::error::StegoError::AuthenticationFailed).
    fn decrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
        aad: &[u8],
    ) -> Result<Vec<u8>>;
}
