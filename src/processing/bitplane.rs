//! # Bit-Plane Codec
//!
//! Treats the low-order bits of an image's colour channels as one linear,
//! addressable bitstream.
//!
//! ## Scan order
//!
//! Bit index `i` maps onto the image as follows:
//!
//! ```text
//! slot   = i / bits_per_channel      plane   = i % bits_per_channel
//! pixel  = slot / channels_used      channel = channel_order[slot % channels_used]
//! ```
//!
//! Pixels are visited row-major, channels in the configured order
//! (default `R → G → B`), and within a channel the least significant plane
//! comes first. Alpha is never addressed. The order depends only on the
//! [`BitPlaneLayout`], never on image size or content, so encode and decode
//! agree as long as they share a layout.
//!
//! ### Capacity
//! `width * height * channels_used * bits_per_channel` bits. With the default
//! layout an 800x600 image carries 1,440,000 bits (~180 KB).

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StegoError};
use crate::processing::pixels::PixelBuffer;

/// Highest number of low-order planes that may be used per channel.
pub const MAX_BITS_PER_CHANNEL: u8 = 4;

/// Order in which colour channels of a pixel are visited.
///
/// Parsed from a string of distinct `r`, `g`, `b` letters, e.g. `"rgb"`,
/// `"bgr"` or `"gb"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOrder(Vec<usize>);

impl ChannelOrder {
    pub fn rgb() -> Self {
        Self(vec![0, 1, 2])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn channel_at(&self, index: usize) -> usize {
        self.0[index]
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::rgb()
    }
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut order = Vec::with_capacity(3);
        for c in s.trim().chars() {
            let channel = match c.to_ascii_lowercase() {
                'r' => 0,
                'g' => 1,
                'b' => 2,
                other => return Err(format!("unknown channel '{}' in order \"{}\"", other, s)),
            };
            if order.contains(&channel) {
                return Err(format!("channel '{}' repeated in order \"{}\"", c, s));
            }
            order.push(channel);
        }

        if order.is_empty() {
            return Err("channel order must name at least one channel".to_string());
        }

        Ok(Self(order))
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &channel in &self.0 {
            let c = match channel {
                0 => 'r',
                1 => 'g',
                _ => 'b',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Which channels and how many low-order planes carry payload bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPlaneLayout {
    channel_order: ChannelOrder,
    bits_per_channel: u8,
}

impl BitPlaneLayout {
    pub fn new(channel_order: ChannelOrder, bits_per_channel: u8) -> Result<Self> {
        if bits_per_channel == 0 || bits_per_channel > MAX_BITS_PER_CHANNEL {
            return Err(StegoError::InternalFault(format!(
                "bits_per_channel must be between 1 and {}, got {}",
                MAX_BITS_PER_CHANNEL, bits_per_channel
            )));
        }

        Ok(Self {
            channel_order,
            bits_per_channel,
        })
    }

    pub fn channel_order(&self) -> &ChannelOrder {
        &self.channel_order
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }
}

impl Default for BitPlaneLayout {
    /// One bit per channel over R, G, B.
    fn default() -> Self {
        Self {
            channel_order: ChannelOrder::rgb(),
            bits_per_channel: 1,
        }
    }
}

/// Reads and writes the low-order bitstream of a [`PixelBuffer`].
#[derive(Debug, Clone, Default)]
pub struct BitPlaneCodec {
    layout: BitPlaneLayout,
}

impl BitPlaneCodec {
    pub fn new(layout: BitPlaneLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &BitPlaneLayout {
        &self.layout
    }

    /// Total number of addressable bits in `image`.
    pub fn capacity_bits(&self, image: &PixelBuffer) -> u64 {
        image.pixel_count()
            * self.layout.channel_order.len() as u64
            * self.layout.bits_per_channel as u64
    }

    /// Write `bits` starting at `bit_offset` into a copy of `image`.
    ///
    /// The input buffer is never modified. Fails with
    /// [`StegoError::CapacityExceeded`] before copying anything if the range
    /// does not fit.
    pub fn write(&self, image: &PixelBuffer, bit_offset: u64, bits: &[bool]) -> Result<PixelBuffer> {
        self.check_range(image, bit_offset, bits.len() as u64)?;

        let mut output = image.clone();
        for (i, &bit) in bits.iter().enumerate() {
            self.put_bit(&mut output, bit_offset + i as u64, bit);
        }
        Ok(output)
    }

    /// Read `count` bits starting at `bit_offset`.
    pub fn read(&self, image: &PixelBuffer, bit_offset: u64, count: u64) -> Result<Vec<bool>> {
        self.check_range(image, bit_offset, count)?;

        Ok((0..count)
            .map(|i| self.get_bit(image, bit_offset + i))
            .collect())
    }

    /// Write `bytes` (MSB first) starting at `bit_offset` into a copy of `image`.
    pub fn embed_bytes(&self, image: &PixelBuffer, bit_offset: u64, bytes: &[u8]) -> Result<PixelBuffer> {
        self.write(image, bit_offset, &bytes_to_bits(bytes))
    }

    /// Read `byte_count` bytes (MSB first) starting at `bit_offset`.
    pub fn extract_bytes(&self, image: &PixelBuffer, bit_offset: u64, byte_count: usize) -> Result<Vec<u8>> {
        let bits = self.read(image, bit_offset, byte_count as u64 * 8)?;
        Ok(bits_to_bytes(&bits))
    }

    fn check_range(&self, image: &PixelBuffer, bit_offset: u64, count: u64) -> Result<()> {
        let capacity_bits = self.capacity_bits(image);
        let end = bit_offset.checked_add(count).unwrap_or(u64::MAX);
        if end > capacity_bits {
            return Err(StegoError::CapacityExceeded {
                required_bits: end,
                capacity_bits,
            });
        }
        Ok(())
    }

    /// Map a linear bit index onto (sample byte index, bit plane).
    fn locate(&self, image: &PixelBuffer, index: u64) -> (usize, u8) {
        let bpc = self.layout.bits_per_channel as u64;
        let used = self.layout.channel_order.len() as u64;

        let slot = index / bpc;
        let plane = (index % bpc) as u8;
        let pixel = slot / used;
        let channel = self.layout.channel_order.channel_at((slot % used) as usize);

        let sample = pixel as usize * image.channels() as usize + channel;
        (sample, plane)
    }

    fn put_bit(&self, image: &mut PixelBuffer, index: u64, bit: bool) {
        let (sample, plane) = self.locate(image, index);
        let mask = 1u8 << plane;
        let samples = image.samples_mut();
        if bit {
            samples[sample] |= mask;
        } else {
            samples[sample] &= !mask;
        }
    }

    fn get_bit(&self, image: &PixelBuffer, index: u64) -> bool {
        let (sample, plane) = self.locate(image, index);
        (image.samples()[sample] >> plane) & 1 == 1
    }
}

/// Expand bytes into bits, most significant bit of each byte first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| (byte >> (7 - i)) & 1 == 1))
        .collect()
}

/// Pack bits (MSB first) into bytes. A trailing partial byte is zero-padded.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << (7 - i)))
        })
        .collect()
}
