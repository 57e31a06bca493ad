//! AES-256-GCM implementation of [`AuthenticatedCipher`].

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};

use super::traits::AuthenticatedCipher;
use super::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{Result, StegoError};

/// Frame version tag for AES-256-GCM payloads.
pub const VERSION_TAG: u8 = 0x01;

pub struct Aes256GcmCipher;

impl AuthenticatedCipher for Aes256GcmCipher {
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
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| StegoError::InternalFault(e.to_string()))?;

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
            .map_err(|e| StegoError::InternalFault(format!("AES-GCM encrypt: {}", e)))?;

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
        let cipher = Aes256Gcm::new_from_slice(key)
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

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x07; NONCE_LEN];

    #[test]
    fn test_roundtrip_with_aad() {
        let (ct, tag) = Aes256GcmCipher.encrypt(&KEY, &NONCE, b"hello", b"hdr").unwrap();
        assert_eq!(ct.len(), 5);
        let pt = Aes256GcmCipher.decrypt(&KEY, &NONCE, &ct, &tag, b"hdr").unwrap();
        assert_eq!(pt, b"hello");
    }

    #[test]
    fn test_wrong_key_fails() {
        let (ct, tag) = Aes256GcmCipher.encrypt(&KEY, &NONCE, b"secret", b"").unwrap();
        let result = Aes256GcmCipher.decrypt(&[0x43; KEY_LEN], &NONCE, &ct, &tag, b"");
        assert!(matches!(result, Err(StegoError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampering_fails() {
        let (mut ct, mut tag) = Aes256GcmCipher.encrypt(&KEY, &NONCE, b"secret", b"hdr").unwrap();

        let wrong_aad = Aes256GcmCipher.decrypt(&KEY, &NONCE, &ct, &tag, b"hdx");
        assert!(matches!(wrong_aad, Err(StegoError::AuthenticationFailed)));

        tag[0] ^= 0x80;
        assert!(Aes256GcmCipher.decrypt(&KEY, &NONCE, &ct, &tag, b"hdr").is_err());
        tag[0] ^= 0x80;

        ct[2] ^= 0x01;
        assert!(Aes256GcmCipher.decrypt(&KEY, &NONCE, &ct, &tag, b"hdr").is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let (ct, tag) = Aes256GcmCipher.encrypt(&KEY, &NONCE, b"", b"").unwrap();
        assert!(ct.is_empty());
        let pt = Aes256GcmCipher.decrypt(&KEY, &NONCE, &ct, &tag, b"").unwrap();
        assert!(pt.is_empty());
    }
}
