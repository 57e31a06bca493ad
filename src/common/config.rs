//! # Configuration Utilities
//!
//! Configuration structures shared by the server and the command-line tool,
//! plus the generic TOML loader.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [server]
//! address = "127.0.0.1:8000"
//! max_upload_bytes = 10485760
//! request_timeout_secs = 30
//!
//! [storage]
//! backend = "file"            # or "memory"
//! artifact_path = "stego.png"
//! adopt_existing = false
//!
//! [embedding]
//! channel_order = "rgb"
//! bits_per_channel = 1
//!
//! [crypto]
//! cipher = "aes-256-gcm"      # or "chacha20-poly1305"
//!
//! [crypto.kdf]
//! m_cost = 19456
//! t_cost = 2
//! p_cost = 1
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::crypto::{CipherSuite, KdfParams, PasswordCipher};
use crate::processing::{BitPlaneCodec, BitPlaneLayout, ChannelOrder, StegoEngine};
use crate::storage::{ArtifactStore, FileArtifactStore, MemoryArtifactStore};

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegvaultConfig = load_config("config/stegvault.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
    let config: T =
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path))?;
    Ok(config)
}

/// Complete configuration for both binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StegvaultConfig {
    /// HTTP listener and request limits
    pub server: ServerSection,
    /// Where the single stego artifact lives
    pub storage: StorageSection,
    /// Bit-plane scan layout
    pub embedding: EmbeddingSection,
    /// Key derivation and cipher selection
    pub crypto: CryptoSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address the HTTP server binds to (e.g., "127.0.0.1:8000")
    pub address: String,
    /// Largest accepted multipart body in bytes
    pub max_upload_bytes: usize,
    /// Caller-side timeout around each engine call (seconds)
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl ServerSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    /// Slot file for the file backend
    pub artifact_path: PathBuf,
    /// Serve a slot file left by a previous run
    pub adopt_existing: bool,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            artifact_path: PathBuf::from("stego.png"),
            adopt_existing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSection {
    /// Channels visited per pixel, e.g. "rgb" or "bgr"
    pub channel_order: String,
    /// Low-order planes used per channel (1-4)
    pub bits_per_channel: u8,
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            channel_order: "rgb".to_string(),
            bits_per_channel: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoSection {
    pub cipher: CipherSuite,
    pub kdf: KdfParams,
}

impl StegvaultConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }

    pub fn layout(&self) -> Result<BitPlaneLayout> {
        let order: ChannelOrder = self
            .embedding
            .channel_order
            .parse()
            .map_err(|e: String| anyhow::anyhow!("embedding.channel_order: {}", e))?;
        BitPlaneLayout::new(order, self.embedding.bits_per_channel)
            .context("embedding.bits_per_channel")
    }

    /// Build the engine described by the `embedding` and `crypto` sections.
    pub fn build_engine(&self) -> Result<StegoEngine> {
        let codec = BitPlaneCodec::new(self.layout()?);
        let cipher =
            PasswordCipher::argon2(&self.crypto.kdf, self.crypto.cipher).context("crypto.kdf")?;
        Ok(StegoEngine::new(codec, cipher))
    }

    /// Open the artifact store described by the `storage` section.
    pub async fn build_store(&self) -> Result<Arc<dyn ArtifactStore>> {
        let store: Arc<dyn ArtifactStore> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryArtifactStore::new()),
            StorageBackend::File => Arc::new(
                FileArtifactStore::open(
                    self.storage.artifact_path.clone(),
                    self.storage.adopt_existing,
                )
                .await
                .with_context(|| {
                    format!(
                        "opening artifact slot {}",
                        self.storage.artifact_path.display()
                    )
                })?,
            ),
        };
        Ok(store)
    }
}
