//! # Artifact Storage
//!
//! The service persists exactly one stego-image at a time. Encode replaces
//! it, decode reads it, nothing deletes it.
//!
//! ## Consistency
//!
//! Implementations serialize `put` and `get` through a single-writer /
//! multi-reader lock. A `get` observes either the complete previous artifact
//! or the complete new one, never a mixture; concurrent `put`s resolve as
//! last-writer-wins.

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use file::FileArtifactStore;
pub use memory::MemoryArtifactStore;

use crate::error::Result;

/// PNG bytes of a stego-image produced by encode.
///
/// Cheap to clone; the bytes are shared, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoArtifact {
    png: Arc<Vec<u8>>,
}

impl StegoArtifact {
    pub fn new(png: Vec<u8>) -> Self {
        Self { png: Arc::new(png) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

/// Single-slot store for the current stego artifact.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Replace the stored artifact.
    async fn put(&self, artifact: StegoArtifact) -> Result<()>;

    /// Fetch the stored artifact, or
    /// [`StegoError::NotFound`](crate::error::StegoError::NotFound) if
    /// nothing has been stored during this process lifetime.
    async fn get(&self) -> Result<StegoArtifact>;
}
