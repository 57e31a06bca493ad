//! # Image Processing and Steganography
//!
//! This module hides password-protected messages in the low-order bit planes
//! of lossless images.
//!
//! - [`bitplane`]: addressable low-order bitstream over pixel channels
//! - [`framer`]: fixed-layout payload header + ciphertext container
//! - [`engine`]: encode/decode pipelines
//! - [`pixels`]: 8-bit RGB/RGBA rasters and PNG conversion

pub mod bitplane;
pub mod engine;
pub mod framer;
pub mod pixels;

// Re-export main types for convenience
pub use bitplane::{BitPlaneCodec, BitPlaneLayout, ChannelOrder};
pub use engine::StegoEngine;
pub use pixels::PixelBuffer;
