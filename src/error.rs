//! # Error Types
//!
//! [`StegoError`] is the single failure taxonomy shared by the embedding
//! engine, the payload framer, the password cipher and the artifact store.
//! Every stage is all-or-nothing: when one of these is returned, no partial
//! image and no partial plaintext has been produced.

use thiserror::Error;

/// Errors that can occur while hiding or recovering a message.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The cover image is not a decodable PNG, or its channel layout/depth
    /// is not 8-bit RGB or RGBA.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The payload does not fit in the image's addressable low-order bits.
    #[error("image too small for this message: need {required_bits} bits but only {capacity_bits} bits available")]
    CapacityExceeded {
        required_bits: u64,
        capacity_bits: u64,
    },

    /// The embedded frame carries a version tag this build does not know.
    #[error("unrecognized payload format version 0x{0:02x}")]
    FormatUnrecognized(u8),

    /// Header or length field is inconsistent with the readable bits.
    #[error("corrupted payload: {0}")]
    FormatCorrupted(String),

    /// Wrong password or tampered payload. The two are never distinguished.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Decode was requested before any artifact was stored.
    #[error("no stego artifact has been stored")]
    NotFound,

    /// I/O, task or encoder failure unrelated to the caller's input.
    #[error("internal fault: {0}")]
    InternalFault(String),
}

impl StegoError {
    /// True for failures caused by the caller's input on encode.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_) | Self::CapacityExceeded { .. }
        )
    }

    /// True for the decode failures that must be reported with one generic
    /// message so a caller cannot tell which case occurred.
    pub fn is_decode_rejection(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed
                | Self::NotFound
                | Self::FormatCorrupted(_)
                | Self::FormatUnrecognized(_)
        )
    }
}

impl From<std::io::Error> for StegoError {
    fn from(e: std::io::Error) -> Self {
        Self::InternalFault(format!("I/O error: {}", e))
    }
}

impl From<tokio::task::JoinError> for StegoError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::InternalFault(format!("engine task panicked: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(StegoError::UnsupportedFormat("gif".into()).is_client_fault());
        assert!(StegoError::CapacityExceeded {
            required_bits: 10,
            capacity_bits: 9
        }
        .is_client_fault());
        assert!(!StegoError::AuthenticationFailed.is_client_fault());

        assert!(StegoError::AuthenticationFailed.is_decode_rejection());
        assert!(StegoError::NotFound.is_decode_rejection());
        assert!(StegoError::FormatUnrecognized(7).is_decode_rejection());
        assert!(StegoError::FormatCorrupted("short".into()).is_decode_rejection());
        assert!(!StegoError::InternalFault("disk".into()).is_decode_rejection());
    }

    #[test]
    fn test_capacity_message_names_both_sizes() {
        let err = StegoError::CapacityExceeded {
            required_bits: 800,
            capacity_bits: 768,
        };
        let text = err.to_string();
        assert!(text.contains("800"));
        assert!(text.contains("768"));
    }
}
