//! # Payload Framing
//!
//! The frame is the binary container written into the image's bit planes:
//!
//! ```text
//! [1 byte  ] version tag (identifies layout + cipher suite)
//! [16 bytes] KDF salt
//! [12 bytes] AEAD nonce
//! [4 bytes ] ciphertext length (big-endian u32)
//! [16 bytes] AEAD authentication tag
//! [N bytes ] ciphertext
//! ```
//!
//! The header is fixed at [`HEADER_LEN`] bytes so a decoder can read it with
//! one bounded read before trusting anything it says. The first
//! [`AAD_LEN`] bytes (everything except the tag) are authenticated as
//! associated data, so a flipped header bit fails tag verification.

use crate::crypto::{known_version_tags, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, StegoError};

/// Bytes covered by the AEAD as associated data: version, salt, nonce, length.
pub const AAD_LEN: usize = 1 + SALT_LEN + NONCE_LEN + 4;

/// Fixed header size: associated data plus the authentication tag (49 bytes).
pub const HEADER_LEN: usize = AAD_LEN + TAG_LEN;

/// Header size in bits.
pub const HEADER_BITS: u64 = HEADER_LEN as u64 * 8;

/// Number of bits a frame carrying `ciphertext_len` bytes occupies.
pub fn frame_bits(ciphertext_len: usize) -> u64 {
    (HEADER_LEN as u64 + ciphertext_len as u64) * 8
}

/// Parsed fixed-size header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext_len: u32,
    pub auth_tag: [u8; TAG_LEN],
}

impl FrameHeader {
    /// Parse a header and check the declared ciphertext fits in
    /// `available_bits` (the capacity left after the header itself).
    ///
    /// Never trusts the length field: an oversize declaration is reported as
    /// [`StegoError::FormatCorrupted`] before any slicing happens.
    pub fn parse(bytes: &[u8], available_bits: u64) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(StegoError::FormatCorrupted(format!(
                "header truncated: {} of {} bytes",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let version = bytes[0];
        if !known_version_tags().contains(&version) {
            return Err(StegoError::FormatUnrecognized(version));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut len_bytes = [0u8; 4];
        let mut auth_tag = [0u8; TAG_LEN];

        let mut pos = 1;
        salt.copy_from_slice(&bytes[pos..pos + SALT_LEN]);
        pos += SALT_LEN;
        nonce.copy_from_slice(&bytes[pos..pos + NONCE_LEN]);
        pos += NONCE_LEN;
        len_bytes.copy_from_slice(&bytes[pos..pos + 4]);
        pos += 4;
        auth_tag.copy_from_slice(&bytes[pos..pos + TAG_LEN]);

        let ciphertext_len = u32::from_be_bytes(len_bytes);
        let declared_bits = ciphertext_len as u64 * 8;
        if declared_bits > available_bits {
            return Err(StegoError::FormatCorrupted(format!(
                "declared length of {} bytes exceeds the {} bits left in the image",
                ciphertext_len, available_bits
            )));
        }

        Ok(Self {
            version,
            salt,
            nonce,
            ciphertext_len,
            auth_tag,
        })
    }

    /// The authenticated portion of this header.
    pub fn associated_data(&self) -> [u8; AAD_LEN] {
        associated_data(self.version, &self.salt, &self.nonce, self.ciphertext_len)
    }
}

/// A fully unframed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub header: FrameHeader,
    pub ciphertext: Vec<u8>,
}

impl Payload {
    /// Pair a parsed header with the ciphertext read after it.
    ///
    /// `ciphertext` may run past the declared length; the excess is dropped.
    /// A short read is [`StegoError::FormatCorrupted`].
    pub fn new(header: FrameHeader, mut ciphertext: Vec<u8>) -> Result<Self> {
        let declared = header.ciphertext_len as usize;
        if ciphertext.len() < declared {
            return Err(StegoError::FormatCorrupted(format!(
                "ciphertext truncated: {} of {} bytes",
                ciphertext.len(),
                declared
            )));
        }
        ciphertext.truncate(declared);
        Ok(Self { header, ciphertext })
    }

    /// Associated data the tag was computed over.
    pub fn associated_data(&self) -> [u8; AAD_LEN] {
        self.header.associated_data()
    }
}

/// Build the associated data for a header before its tag is known.
pub fn associated_data(
    version: u8,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext_len: u32,
) -> [u8; AAD_LEN] {
    let mut aad = [0u8; AAD_LEN];
    aad[0] = version;
    aad[1..1 + SALT_LEN].copy_from_slice(salt);
    aad[1 + SALT_LEN..1 + SALT_LEN + NONCE_LEN].copy_from_slice(nonce);
    aad[AAD_LEN - 4..].copy_from_slice(&ciphertext_len.to_be_bytes());
    aad
}

/// Serialize a payload into frame bytes.
///
/// Fails with [`StegoError::CapacityExceeded`] if the ciphertext is too long
/// for the u32 length field.
pub fn frame(
    version: u8,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    auth_tag: &[u8; TAG_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let ciphertext_len = u32::try_from(ciphertext.len()).map_err(|_| StegoError::CapacityExceeded {
        required_bits: frame_bits(ciphertext.len()),
        capacity_bits: frame_bits(u32::MAX as usize),
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&associated_data(version, salt, nonce, ciphertext_len));
    out.extend_from_slice(auth_tag);
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Parse complete frame bytes held in memory.
///
/// The declared length is checked against the bytes actually present;
/// trailing bytes beyond the declared ciphertext are ignored. The engine
/// reads frames out of an image in two bounded steps instead, but ends in
/// the same [`Payload::new`].
pub fn unframe(bytes: &[u8]) -> Result<Payload> {
    let remaining_bits = bytes.len().saturating_sub(HEADER_LEN) as u64 * 8;
    let header = FrameHeader::parse(bytes, remaining_bits)?;
    let ciphertext = bytes.get(HEADER_LEN..).unwrap_or_default().to_vec();
    Payload::new(header, ciphertext)
}
