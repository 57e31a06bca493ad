//! # Pixel Buffers
//!
//! Owned 8-bit raster used by the embedding engine. Only RGB8 and RGBA8
//! rasters are accepted; anything else is rejected as
//! [`StegoError::UnsupportedFormat`] before the engine sees it.
//!
//! Samples are stored row-major, interleaved, `channels` bytes per pixel,
//! exactly as the `image` crate lays them out.

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage, RgbaImage};

use crate::error::{Result, StegoError};

/// An immutable-by-convention 8-bit RGB or RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Build a buffer from raw interleaved samples.
    ///
    /// `channels` must be 3 (RGB) or 4 (RGBA) and `samples` must hold exactly
    /// `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(StegoError::UnsupportedFormat(format!(
                "{} channels per pixel (need RGB or RGBA)",
                channels
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(StegoError::UnsupportedFormat(format!(
                "sample buffer holds {} bytes, expected {}",
                samples.len(),
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Decode PNG bytes into a pixel buffer.
    ///
    /// Palette PNGs are expanded by the decoder and accepted. Grayscale,
    /// 16-bit and floating point rasters are rejected.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => {}
            Ok(other) => {
                return Err(StegoError::UnsupportedFormat(format!(
                    "{:?} is not a lossless PNG container",
                    other
                )))
            }
            Err(_) => {
                return Err(StegoError::UnsupportedFormat(
                    "not a recognizable image".to_string(),
                ))
            }
        }

        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| StegoError::UnsupportedFormat(format!("PNG decode failed: {}", e)))?;

        Self::from_dynamic(img)
    }

    /// Convert an already decoded image, rejecting unsupported layouts.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        match img {
            DynamicImage::ImageRgb8(buf) => Self::from_raw(width, height, 3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => Self::from_raw(width, height, 4, buf.into_raw()),
            other => Err(StegoError::UnsupportedFormat(format!(
                "{:?} pixels (need 8-bit RGB or RGBA)",
                other.color()
            ))),
        }
    }

    /// Encode the buffer as PNG bytes, keeping the channel layout.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = match self.channels {
            3 => RgbImage::from_raw(self.width, self.height, self.samples.clone())
                .map(DynamicImage::ImageRgb8),
            _ => RgbaImage::from_raw(self.width, self.height, self.samples.clone())
                .map(DynamicImage::ImageRgba8),
        }
        .ok_or_else(|| StegoError::InternalFault("pixel buffer size mismatch".to_string()))?;

        let mut output_bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut output_bytes),
            ImageFormat::Png,
        )
        .map_err(|e| StegoError::InternalFault(format!("PNG encode failed: {}", e)))?;

        Ok(output_bytes)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel (3 or 4).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8])
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let png = gradient_png(12, 9);
        let buffer = PixelBuffer::from_png(&png).unwrap();
        assert_eq!(buffer.width(), 12);
        assert_eq!(buffer.height(), 9);
        assert_eq!(buffer.channels(), 3);

        let again = PixelBuffer::from_png(&buffer.to_png().unwrap()).unwrap();
        assert_eq!(again, buffer);
    }

    #[test]
    fn test_rgba_layout_is_kept() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 128]));
        let buffer = PixelBuffer::from_dynamic(DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(buffer.channels(), 4);

        let again = PixelBuffer::from_png(&buffer.to_png().unwrap()).unwrap();
        assert_eq!(again.channels(), 4);
        assert_eq!(&again.samples()[..4], &[10, 20, 30, 128]);
    }

    #[test]
    fn test_grayscale_is_rejected() {
        let img = image::GrayImage::new(8, 8);
        let result = PixelBuffer::from_dynamic(DynamicImage::ImageLuma8(img));
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_non_png_bytes_are_rejected() {
        let result = PixelBuffer::from_png(b"definitely not an image");
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));

        let mut bmp = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut std::io::Cursor::new(&mut bmp), ImageFormat::Bmp)
            .unwrap();
        let result = PixelBuffer::from_png(&bmp);
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_from_raw_validates_length() {
        assert!(PixelBuffer::from_raw(2, 2, 3, vec![0; 12]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, 3, vec![0; 11]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, 2, vec![0; 8]).is_err());
    }
}
