//! # Stego Service - Engine + Artifact Slot
//!
//! Async facade over the CPU-bound [`StegoEngine`]. Each call:
//! 1. Runs PNG decoding and the engine pipeline on the blocking thread pool
//! 2. Bounds the whole call with the configured timeout
//! 3. Stores (encode) or loads (decode) the single stego artifact
//! 4. Records the outcome in [`ServiceMetrics`]
//!
//! The engine itself is stateless and needs no locking; the only shared
//! mutable state is the artifact slot, which serializes itself.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::{Result, StegoError};
use crate::processing::{PixelBuffer, StegoEngine};
use crate::server::metrics::{Operation, ServiceMetrics};
use crate::server::requests::{DecodeRequest, EncodeRequest};
use crate::storage::{ArtifactStore, StegoArtifact};

#[derive(Clone)]
pub struct StegoService {
    engine: Arc<StegoEngine>,
    store: Arc<dyn ArtifactStore>,
    metrics: ServiceMetrics,
    timeout: Duration,
}

impl StegoService {
    pub fn new(engine: StegoEngine, store: Arc<dyn ArtifactStore>, timeout: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
            metrics: ServiceMetrics::new(),
            timeout,
        }
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    /// Hide the request's message in its cover image and replace the stored
    /// artifact with the result.
    ///
    /// The store is only touched after the engine fully succeeded.
    pub async fn encode(&self, request: EncodeRequest) -> Result<()> {
        let request_id = rand::random::<u64>();
        let started = Instant::now();
        info!(
            "📷 Encode request #{:016x}: {} ({} bytes), {} byte message",
            request_id,
            request.filename.as_deref().unwrap_or("<unnamed>"),
            request.image.len(),
            request.message.len()
        );

        let engine = Arc::clone(&self.engine);
        let result = self
            .run_blocking(move || {
                let cover = PixelBuffer::from_png(&request.image)?;
                let stego = engine.encode(&cover, &request.message, &request.password)?;
                stego.to_png()
            })
            .await;

        let result = match result {
            Ok(png) => {
                let size = png.len();
                self.store.put(StegoArtifact::new(png)).await.map(|_| size)
            }
            Err(e) => Err(e),
        };

        self.metrics
            .record(Operation::Encode, result.is_ok(), started.elapsed());

        match result {
            Ok(size) => {
                info!(
                    "✅ Encode request #{:016x} stored a {} byte artifact in {:?}",
                    request_id,
                    size,
                    started.elapsed()
                );
                Ok(())
            }
            Err(e) => {
                warn!("❌ Encode request #{:016x} failed: {}", request_id, e);
                Err(e)
            }
        }
    }

    /// Recover the message from the stored artifact.
    pub async fn decode(&self, request: DecodeRequest) -> Result<String> {
        let request_id = rand::random::<u64>();
        let started = Instant::now();
        info!("🔓 Decode request #{:016x}", request_id);

        let result = match self.store.get().await {
            Ok(artifact) => {
                let engine = Arc::clone(&self.engine);
                self.run_blocking(move || {
                    let stego = PixelBuffer::from_png(artifact.as_bytes()).map_err(|e| {
                        StegoError::FormatCorrupted(format!("stored artifact unreadable: {}", e))
                    })?;
                    engine.decode(&stego, &request.password)
                })
                .await
            }
            Err(e) => Err(e),
        };

        self.metrics
            .record(Operation::Decode, result.is_ok(), started.elapsed());

        match &result {
            Ok(_) => info!(
                "✅ Decode request #{:016x} succeeded in {:?}",
                request_id,
                started.elapsed()
            ),
            Err(e) => warn!("❌ Decode request #{:016x} failed: {}", request_id, e),
        }
        result
    }

    /// Run CPU-bound work on the blocking pool, bounded by the timeout.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(work);
        match tokio::time::timeout(self.timeout, handle).await {
            Ok(joined) => joined?,
            Err(_) => Err(StegoError::InternalFault(format!(
                "engine call exceeded {:?}",
                self.timeout
            ))),
        }
    }
}
