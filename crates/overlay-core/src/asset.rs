//! Raster asset preparation for the image overlay
//!
//! The asset is decoded, resampled to the slot size and stored as
//! Flate-compressed 8-bit RGB samples, ready to become an image XObject.
//! Everything stays in memory and is dropped with the owning call.

use crate::error::OverlayError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::imageops::FilterType;
use lopdf::{dictionary, Stream};
use std::io::Write;

/// Largest resample target per side, in pixels
pub const MAX_PIXEL_EXTENT: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    width: u32,
    height: u32,
    /// zlib-compressed RGB8 samples
    data: Vec<u8>,
}

impl ImageAsset {
    /// Decode PNG/JPEG bytes and resample to `width` x `height` pixels.
    /// Transparent pixels are flattened onto white.
    pub fn decode(bytes: &[u8], width: u32, height: u32) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 || width > MAX_PIXEL_EXTENT || height > MAX_PIXEL_EXTENT {
            return Err(OverlayError::AssetError(format!(
                "Invalid target size {}x{} (1 to {} px per side)",
                width, height, MAX_PIXEL_EXTENT
            )));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| OverlayError::AssetError(format!("Failed to decode image: {}", e)))?;
        tracing::debug!(
            source_width = decoded.width(),
            source_height = decoded.height(),
            width,
            height,
            "image decoded"
        );

        let rgba = decoded
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();

        let mut samples = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            samples.extend_from_slice(&[over_white(r, a), over_white(g, a), over_white(b, a)]);
        }

        Self::from_rgb(width, height, &samples)
    }

    /// Wrap an already-decoded RGB8 buffer
    pub fn from_rgb(width: u32, height: u32, samples: &[u8]) -> Result<Self, OverlayError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || samples.len() != expected {
            return Err(OverlayError::AssetError(format!(
                "Expected {} RGB bytes for {}x{}, got {}",
                expected,
                width,
                height,
                samples.len()
            )));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(samples)
            .and_then(|_| encoder.finish())
            .map(|data| Self {
                width,
                height,
                data,
            })
            .map_err(|e| OverlayError::AssetError(format!("Failed to compress image: {}", e)))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Image XObject stream for this asset
    pub(crate) fn to_xobject(&self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            self.data.clone(),
        )
    }
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
