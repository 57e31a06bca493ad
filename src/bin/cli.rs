//! # Offline Hide/Extract Tool
//!
//! Same engine and configuration as the server, operating on files.
//!
//! ```bash
//! stegvault-cli hide --input cover.png --output stego.png --message "hi" --password pw
//! stegvault-cli extract --input stego.png --password pw
//! stegvault-cli capacity --input cover.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use stegvault::common::config::StegvaultConfig;
use stegvault::common::logging::init_logger;
use stegvault::{PixelBuffer, StegoError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a message in a PNG image
    Hide {
        /// Cover image (PNG)
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the stego image
        #[arg(short, long)]
        output: PathBuf,
        /// Message to hide
        #[arg(short, long)]
        message: String,
        /// Password protecting the message
        #[arg(short, long)]
        password: String,
    },
    /// Extract a message from a stego image
    Extract {
        /// Stego image (PNG)
        #[arg(short, long)]
        input: PathBuf,
        /// Password the message was hidden with
        #[arg(short, long)]
        password: String,
    },
    /// Print how many message bytes an image can carry
    Capacity {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn read_png(path: &Path) -> Result<PixelBuffer> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    PixelBuffer::from_png(&bytes).with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<()> {
    init_logger();

    let args = Args::parse();
    let config = StegvaultConfig::load(args.config.as_deref())?;
    let engine = config.build_engine()?;

    match args.command {
        Command::Hide {
            input,
            output,
            message,
            password,
        } => {
            let cover = read_png(&input)?;
            let stego = engine.encode(&cover, &message, &password)?;
            fs::write(&output, stego.to_png()?)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("✅ Message hidden in {}", output.display());
        }
        Command::Extract { input, password } => {
            let stego = read_png(&input)?;
            match engine.decode(&stego, &password) {
                Ok(message) => println!("{}", message),
                Err(e @ StegoError::AuthenticationFailed) => {
                    error!("❌ Failed to decrypt the message. Incorrect password or corrupted data.");
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Capacity { input } => {
            let cover = read_png(&input)?;
            println!(
                "{}x{}: {} message bytes",
                cover.width(),
                cover.height(),
                engine.max_message_len(&cover)
            );
        }
    }

    Ok(())
}
