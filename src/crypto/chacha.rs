//! ChaCha20-Poly1305 implementation of [`AuthenticatedCipher`].

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce, Tag};

use super::traits::AuthenticatedCipher;
use super::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{Result, StegoError};

/// Frame version tag for ChaCha20-Poly1305 payloads.
pub const VERSION_TAG: u8 = 0x02;

pub struct ChaCha20Poly1305Cipher;

impl AuthenticatedCipher for ChaCha20Poly1305Cipher {
    fn version_tag(&self) -> u8 {
        VERSION_TAG
    }

    fn encrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, [u8; TAG_LEN])> {
        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|e| StegoError::InternalFault(e.to_string()))?;

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
            .map_err(|e| StegoError::InternalFault(format!("ChaCha20-Poly1305 encrypt: {}", e)))?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);
        Ok((buffer, tag_bytes))
    }

    fn decrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|e| StegoError::InternalFault(e.to_string()))?;

        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                aad,
                &mut buffer,
                Tag::from_slice(tag),
            )
            .map_err(|_| StegoError::AuthenticationFailed)?;
        Ok(buffer)
    }
}
