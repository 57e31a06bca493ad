pub mod common;
pub mod crypto;
pub mod error;
pub mod processing;
pub mod server;
pub mod storage;

pub use error::StegoError;
pub use processing::{PixelBuffer, StegoEngine};
pub use server::StegoService;
