//! # Server Binary Entry Point
//!
//! Runs the steganography HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stegvault-server -- --config config/stegvault.toml
//! ```
//!
//! The server will:
//! 1. Load configuration from the specified TOML file (defaults if omitted)
//! 2. Build the stego engine (bit-plane layout, KDF work factor, cipher)
//! 3. Open the single artifact slot
//! 4. Serve `/encode`, `/decode` and `/health` until Ctrl-C

use std::sync::Arc;

use clap::Parser;
use log::info;

use stegvault::common::config::StegvaultConfig;
use stegvault::common::logging::init_logger;
use stegvault::server::{router, AppState, StegoService};

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    ///
    /// Example: config/stegvault.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Override `server.address` from the configuration file
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logger();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = StegvaultConfig::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    info!("🚀 Initializing stegvault server...");

    let engine = config.build_engine()?;
    let store = config.build_store().await?;
    info!(
        "🔐 Cipher {:?}, channel order '{}', {} bit(s) per channel, storage {:?}",
        config.crypto.cipher,
        config.embedding.channel_order,
        config.embedding.bits_per_channel,
        config.storage.backend
    );

    let service = StegoService::new(engine, store, config.server.request_timeout());
    let state = Arc::new(AppState { service });
    let app = router(state, config.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.address).await?;
    info!("🌐 Web server running on http://{}", config.server.address);
    info!("📡 API endpoints: POST /encode, POST /decode, GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("🛑 Shutdown signal received");
        })
        .await?;

    Ok(())
}
