//! File-backed artifact slot, by default `stego.png` in the working
//! directory.
//!
//! Writes go to a temporary sibling file and are moved into place with an
//! atomic rename while the write lock is held, so the slot file on disk is
//! always a complete PNG.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::RwLock;

use super::{ArtifactStore, StegoArtifact};
use crate::error::{Result, StegoError};

pub struct FileArtifactStore {
    path: PathBuf,
    /// Whether the slot file holds an artifact this process may hand out.
    present: RwLock<bool>,
}

impl FileArtifactStore {
    /// Open the slot at `path`.
    ///
    /// A file left behind by an earlier process is only served when
    /// `adopt_existing` is set; otherwise `get` reports `NotFound` until the
    /// first `put`.
    pub async fn open(path: impl Into<PathBuf>, adopt_existing: bool) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let exists = tokio::fs::try_exists(&path).await?;
        let present = adopt_existing && exists;
        if exists && !adopt_existing {
            warn!(
                "⚠️ Ignoring existing artifact at {} until the next encode",
                path.display()
            );
        } else if present {
            info!("📂 Adopted existing artifact at {}", path.display());
        }

        Ok(Self {
            path,
            present: RwLock::new(present),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write the temp file and rename it over the slot. A failed write or
    /// rename leaves no temp file behind.
    async fn replace_slot(&self, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = self.temp_path();
        let result = match tokio::fs::write(&tmp, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn put(&self, artifact: StegoArtifact) -> Result<()> {
        let mut present = self.present.write().await;

        self.replace_slot(artifact.as_bytes()).await?;

        *present = true;
        debug!(
            "💾 Stored {} byte artifact at {}",
            artifact.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn get(&self) -> Result<StegoArtifact> {
        let present = self.present.read().await;
        if !*present {
            return Err(StegoError::NotFound);
        }

        let bytes = tokio::fs::read(&self.path).await?;
        Ok(StegoArtifact::new(bytes))
    }
}
