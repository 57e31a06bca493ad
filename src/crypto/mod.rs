//! # Password-Based Payload Protection
//!
//! [`PasswordCipher`] derives a 256-bit key from the password and a per-encode
//! random salt, then seals the message with an AEAD whose tag covers the
//! frame header as associated data.
//!
//! A wrong password and a corrupted or foreign payload both end in
//! [`StegoError::AuthenticationFailed`]; the two cases are never told apart.
//!
//! ## Modules
//!
//! - [`traits`]: `KeyDerivation` and `AuthenticatedCipher` capability traits
//! - [`kdf`]: Argon2id key derivation
//! - [`aes`]: AES-256-GCM backend (version tag `0x01`)
//! - [`chacha`]: ChaCha20-Poly1305 backend (version tag `0x02`)

pub mod aes;
pub mod chacha;
pub mod kdf;
pub mod traits;

use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub use aes::Aes256GcmCipher;
pub use chacha::ChaCha20Poly1305Cipher;
pub use kdf::{Argon2idKdf, KdfParams};
pub use traits::{AuthenticatedCipher, KeyDerivation};

use crate::error::{Result, StegoError};

/// Symmetric key length in bytes.
pub const KEY_LEN: usize = 32;
/// KDF salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AEAD nonce length in bytes (shared by both backends).
pub const NONCE_LEN: usize = 12;
/// Detached AEAD tag length in bytes.
pub const TAG_LEN: usize = 16;

/// The AEAD backends this build can produce and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CipherSuite {
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl CipherSuite {
    pub const ALL: [CipherSuite; 2] = [CipherSuite::Aes256Gcm, CipherSuite::ChaCha20Poly1305];

    /// Frame version tag, as reported by the suite's cipher.
    pub fn version_tag(self) -> u8 {
        self.cipher().version_tag()
    }

    pub fn from_version_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|suite| suite.version_tag() == tag)
    }

    pub fn cipher(self) -> Arc<dyn AuthenticatedCipher> {
        match self {
            Self::Aes256Gcm => Arc::new(Aes256GcmCipher),
            Self::ChaCha20Poly1305 => Arc::new(ChaCha20Poly1305Cipher),
        }
    }
}

/// Frame version tags this build recognizes.
pub fn known_version_tags() -> [u8; 2] {
    CipherSuite::ALL.map(CipherSuite::version_tag)
}

/// Key derivation plus AEAD, selected once at startup.
///
/// Encoding always uses the configured suite. Decoding picks the suite named
/// by the frame's version tag, so artifacts written under another suite stay
/// readable.
#[derive(Clone)]
pub struct PasswordCipher {
    kdf: Arc<dyn KeyDerivation>,
    suite: CipherSuite,
}

impl PasswordCipher {
    pub fn new(kdf: Arc<dyn KeyDerivation>, suite: CipherSuite) -> Self {
        Self { kdf, suite }
    }

    /// Argon2id with `params` over `suite`.
    pub fn argon2(params: &KdfParams, suite: CipherSuite) -> Result<Self> {
        Ok(Self::new(Arc::new(Argon2idKdf::new(params)?), suite))
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Version tag written into frames produced by [`encrypt`](Self::encrypt).
    pub fn version_tag(&self) -> u8 {
        self.suite.version_tag()
    }

    pub fn fresh_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        salt
    }

    pub fn fresh_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        nonce
    }

    pub fn derive_key(&self, password: &str, salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        self.kdf.derive_key(password.as_bytes(), salt)
    }

    /// Encrypt with the configured suite, returning `(ciphertext, tag)`.
    pub fn encrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, [u8; TAG_LEN])> {
        self.suite.cipher().encrypt(key, nonce, plaintext, aad)
    }

    /// Decrypt a payload written under `version_tag`.
    pub fn decrypt(
        &self,
        version_tag: u8,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let suite = CipherSuite::from_version_tag(version_tag)
            .ok_or(StegoError::FormatUnrecognized(version_tag))?;
        suite.cipher().decrypt(key, nonce, ciphertext, tag, aad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap(suite: CipherSuite) -> PasswordCipher {
        let params = KdfParams {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        };
        PasswordCipher::argon2(&params, suite).unwrap()
    }

    #[test]
    fn test_password_roundtrip_per_suite() {
        for suite in CipherSuite::ALL {
            let cipher = cheap(suite);
            let salt = PasswordCipher::fresh_salt();
            let nonce = PasswordCipher::fresh_nonce();

            let key = cipher.derive_key("secret123", &salt).unwrap();
            let (ct, tag) = cipher.encrypt(&key, &nonce, b"hello", b"aad").unwrap();

            let key = cipher.derive_key("secret123", &salt).unwrap();
            let pt = cipher
                .decrypt(cipher.version_tag(), &key, &nonce, &ct, &tag, b"aad")
                .unwrap();
            assert_eq!(pt, b"hello");

            let wrong = cipher.derive_key("wrong", &salt).unwrap();
            let result = cipher.decrypt(cipher.version_tag(), &wrong, &nonce, &ct, &tag, b"aad");
            assert!(matches!(result, Err(StegoError::AuthenticationFailed)));
        }
    }

    #[test]
    fn test_decrypt_follows_frame_tag_not_config() {
        let writer = cheap(CipherSuite::ChaCha20Poly1305);
        let reader = cheap(CipherSuite::Aes256Gcm);
        let salt = [3u8; SALT_LEN];
        let nonce = [4u8; NONCE_LEN];

        let key = writer.derive_key("pw", &salt).unwrap();
        let (ct, tag) = writer.encrypt(&key, &nonce, b"cross", b"").unwrap();
        let pt = reader
            .decrypt(writer.version_tag(), &key, &nonce, &ct, &tag, b"")
            .unwrap();
        assert_eq!(pt, b"cross");
    }

    #[test]
    fn test_unknown_tag() {
        let cipher = cheap(CipherSuite::Aes256Gcm);
        let result = cipher.decrypt(0xFF, &[0; KEY_LEN], &[0; NONCE_LEN], b"", &[0; TAG_LEN], b"");
        assert!(matches!(result, Err(StegoError::FormatUnrecognized(0xFF))));
    }

    #[test]
    fn test_fresh_values_differ() {
        assert_ne!(PasswordCipher::fresh_salt(), PasswordCipher::fresh_salt());
        assert_ne!(PasswordCipher::fresh_nonce(), PasswordCipher::fresh_nonce());
    }

    #[test]
    fn test_suite_tags() {
        assert_eq!(known_version_tags(), [0x01, 0x02]);
        assert_eq!(CipherSuite::from_version_tag(0x02), Some(CipherSuite::ChaCha20Poly1305));
        assert_eq!(CipherSuite::from_version_tag(0x00), None);
    }

    #[test]
    fn test_suite_tag_comes_from_cipher() {
        assert_eq!(CipherSuite::Aes256Gcm.version_tag(), aes::VERSION_TAG);
        assert_eq!(CipherSuite::ChaCha20Poly1305.version_tag(), chacha::VERSION_TAG);
        for suite in CipherSuite::ALL {
            let tag = suite.cipher().version_tag();
            assert_eq!(CipherSuite::from_version_tag(tag), Some(suite));
        }
    }
}
