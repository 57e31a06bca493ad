//! # Stego Engine
//!
//! Pure, stateless encode/decode pipelines over [`PixelBuffer`]s.
//!
//! ## Encoding
//! ```text
//! Idle -> CapacityChecked -> Framed -> Embedded
//! ```
//! 1. Check `(HEADER_LEN + len(message)) * 8` bits fit (before any crypto work)
//! 2. Fresh salt + nonce, derive key, encrypt with the header as AAD
//! 3. Frame the payload
//! 4. Write the frame bits into a copy of the cover image
//!
//! ## Decoding
//! ```text
//! Idle -> Extracted -> Unframed -> Decrypted
//! ```
//! 1. Bounded read of the fixed header
//! 2. Validate version and declared length against remaining capacity
//! 3. Read the ciphertext region
//! 4. Derive key from password + recovered salt, verify tag, decrypt
//!
//! Any failure aborts the pipeline. No partial image and no partial plaintext
//! ever leaves this module.

use std::fmt;

use log::debug;

use crate::crypto::PasswordCipher;
use crate::error::{Result, StegoError};
use crate::processing::bitplane::BitPlaneCodec;
use crate::processing::framer::{self, FrameHeader, Payload, HEADER_BITS, HEADER_LEN};
use crate::processing::pixels::PixelBuffer;

/// Pipeline stage reached, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    CapacityChecked,
    Framed,
    Embedded,
    Extracted,
    Unframed,
    Decrypted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CapacityChecked => "capacity-checked",
            Self::Framed => "framed",
            Self::Embedded => "embedded",
            Self::Extracted => "extracted",
            Self::Unframed => "unframed",
            Self::Decrypted => "decrypted",
        };
        f.write_str(name)
    }
}

/// Hides and recovers password-protected messages in pixel bit planes.
///
/// Holds only immutable configuration; safe to share across threads and
/// call concurrently.
#[derive(Clone)]
pub struct StegoEngine {
    codec: BitPlaneCodec,
    cipher: PasswordCipher,
}

impl StegoEngine {
    pub fn new(codec: BitPlaneCodec, cipher: PasswordCipher) -> Self {
        Self { codec, cipher }
    }

    pub fn codec(&self) -> &BitPlaneCodec {
        &self.codec
    }

    /// Largest message (in bytes) `image` can carry.
    pub fn max_message_len(&self, image: &PixelBuffer) -> u64 {
        (self.codec.capacity_bits(image) / 8).saturating_sub(HEADER_LEN as u64)
    }

    /// Hide `message` in a copy of `image`.
    pub fn encode(&self, image: &PixelBuffer, message: &str, password: &str) -> Result<PixelBuffer> {
        let plaintext = message.as_bytes();
        trace(Stage::Idle, "encode");

        let required_bits = framer::frame_bits(plaintext.len());
        let capacity_bits = self.codec.capacity_bits(image);
        if required_bits > capacity_bits {
            return Err(StegoError::CapacityExceeded {
                required_bits,
                capacity_bits,
            });
        }
        trace(Stage::CapacityChecked, "encode");

        let ciphertext_len = u32::try_from(plaintext.len()).map_err(|_| StegoError::CapacityExceeded {
            required_bits,
            capacity_bits,
        })?;

        let salt = PasswordCipher::fresh_salt();
        let nonce = PasswordCipher::fresh_nonce();
        let version = self.cipher.version_tag();
        let aad = framer::associated_data(version, &salt, &nonce, ciphertext_len);

        let key = self.cipher.derive_key(password, &salt)?;
        let (ciphertext, auth_tag) = self.cipher.encrypt(&key, &nonce, plaintext, &aad)?;
        let frame = framer::frame(version, &salt, &nonce, &auth_tag, &ciphertext)?;
        trace(Stage::Framed, "encode");

        let stego = self.codec.embed_bytes(image, 0, &frame)?;
        trace(Stage::Embedded, "encode");

        Ok(stego)
    }

    /// Recover the message hidden in `image` with `password`.
    pub fn decode(&self, image: &PixelBuffer, password: &str) -> Result<String> {
        trace(Stage::Idle, "decode");

        let capacity_bits = self.codec.capacity_bits(image);
        if capacity_bits < HEADER_BITS {
            return Err(StegoError::FormatCorrupted(format!(
                "image holds {} bits, too few for a {}-bit header",
                capacity_bits, HEADER_BITS
            )));
        }

        let header_bytes = self.codec.extract_bytes(image, 0, HEADER_LEN)?;
        let header = FrameHeader::parse(&header_bytes, capacity_bits - HEADER_BITS)?;
        let ciphertext = self
            .codec
            .extract_bytes(image, HEADER_BITS, header.ciphertext_len as usize)?;
        trace(Stage::Extracted, "decode");

        let payload = Payload::new(header, ciphertext)?;
        let aad = payload.associated_data();
        trace(Stage::Unframed, "decode");

        let header = &payload.header;
        let key = self.cipher.derive_key(password, &header.salt)?;
        let plaintext = self.cipher.decrypt(
            header.version,
            &key,
            &header.nonce,
            &payload.ciphertext,
            &header.auth_tag,
            &aad,
        )?;
        trace(Stage::Decrypted, "decode");

        String::from_utf8(plaintext)
            .map_err(|_| StegoError::FormatCorrupted("recovered message is not UTF-8".to_string()))
    }
}

fn trace(stage: Stage, pipeline: &str) {
    debug!("🔎 {} pipeline reached stage '{}'", pipeline, stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CipherSuite, KdfParams};
    use crate::processing::bitplane::{BitPlaneLayout, ChannelOrder};

    fn engine() -> StegoEngine {
        let params = KdfParams {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        };
        StegoEngine::new(
            BitPlaneCodec::default(),
            PasswordCipher::argon2(&params, CipherSuite::Aes256Gcm).unwrap(),
        )
    }

    fn noise(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height * 3)
            .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
            .collect();
        PixelBuffer::from_raw(width, height, 3, samples).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let engine = engine();
        let cover = noise(32, 32);
        let stego = engine.encode(&cover, "meet at noon", "pw").unwrap();
        assert_eq!(engine.decode(&stego, "pw").unwrap(), "meet at noon");
    }

    #[test]
    fn test_max_message_len() {
        let engine = engine();
        // 16x16 RGB = 768 bits = 96 bytes, minus 49 header bytes.
        assert_eq!(engine.max_message_len(&noise(16, 16)), 47);
        assert_eq!(engine.max_message_len(&noise(2, 2)), 0);
    }

    #[test]
    fn test_capacity_check_precedes_work() {
        let engine = engine();
        let cover = noise(4, 4);
        match engine.encode(&cover, "too long for this image", "pw") {
            Err(StegoError::CapacityExceeded {
                required_bits,
                capacity_bits,
            }) => {
                assert_eq!(capacity_bits, 48);
                assert_eq!(required_bits, (HEADER_LEN as u64 + 23) * 8);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_image_smaller_than_header_on_decode() {
        let engine = engine();
        let result = engine.decode(&noise(3, 3), "pw");
        assert!(matches!(result, Err(StegoError::FormatCorrupted(_))));
    }

    #[test]
    fn test_layout_must_match() {
        let writer = engine();
        let reader = StegoEngine::new(
            BitPlaneCodec::new(BitPlaneLayout::new("bgr".parse::<ChannelOrder>().unwrap(), 1).unwrap()),
            writer.cipher.clone(),
        );

        let stego = writer.encode(&noise(32, 32), "layout", "pw").unwrap();
        assert!(reader.decode(&stego, "pw").is_err());
    }

    #[test]
    fn test_two_plane_layout_roundtrip() {
        let params = KdfParams {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        };
        let engine = StegoEngine::new(
            BitPlaneCodec::new(BitPlaneLayout::new(ChannelOrder::rgb(), 2).unwrap()),
            PasswordCipher::argon2(&params, CipherSuite::ChaCha20Poly1305).unwrap(),
        );
        let cover = noise(12, 12);
        let stego = engine.encode(&cover, "denser", "pw").unwrap();
        assert_eq!(engine.decode(&stego, "pw").unwrap(), "denser");

        for (a, b) in cover.samples().iter().zip(stego.samples()) {
            assert_eq!(a & 0xFC, b & 0xFC);
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::CapacityChecked.to_string(), "capacity-checked");
        assert_eq!(Stage::Decrypted.to_string(), "decrypted");
    }
}
