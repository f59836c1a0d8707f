//! Preview rendering
//!
//! Builds the 8-bit sRGB images embedded next to the raw data so viewers can
//! display a DNG without developing it.

use image::{RgbImage, imageops};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::RgbImageData;

/// Role of an embedded preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Preview,
    Thumbnail,
}

#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub kind: PreviewKind,
    pub width: u32,
    pub height: u32,
    /// Interleaved RGB8, sRGB encoded
    pub data: Vec<u8>,
}

pub struct PreviewRenderer {
    preview_size: u32,
    thumbnail_size: u32,
}

impl PreviewRenderer {
    pub fn new(preview_size: u32, thumbnail_size: u32) -> Self {
        Self {
            preview_size,
            thumbnail_size,
        }
    }

    /// Renders the preview and the thumbnail, in that order.
    pub fn render(&self, image: &RgbImageData) -> Result<Vec<PreviewImage>> {
        if image.width == 0 || image.height == 0 {
            return Err(ConversionError::PreviewError(format!(
                "rendered image is empty ({}x{})",
                image.width, image.height
            )));
        }

        let full = encode_srgb(image)?;
        let mut previews = Vec::with_capacity(2);
        for (kind, long_edge) in [
            (PreviewKind::Preview, self.preview_size),
            (PreviewKind::Thumbnail, self.thumbnail_size),
        ] {
            if long_edge == 0 {
                return Err(ConversionError::PreviewError(format!("{:?} size must be positive", kind)));
            }
            let (width, height) = fit_long_edge(full.width(), full.height(), long_edge);
            let scaled = if (width, height) == full.dimensions() {
                full.clone()
            } else {
                imageops::thumbnail(&full, width, height)
            };
            debug!(?kind, width, height, "Preview rendered");
            previews.push(PreviewImage {
                kind,
                width,
                height,
                data: scaled.into_raw(),
            });
        }
        Ok(previews)
    }
}

/// Dimensions scaled down so the long edge is at most `long_edge`, keeping aspect ratio.
pub fn fit_long_edge(width: u32, height: u32, long_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= long_edge {
        return (width, height);
    }
    let scale = long_edge as f64 / longest as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

fn encode_srgb(image: &RgbImageData) -> Result<RgbImage> {
    let lut: Vec<u8> = (0..=u16::MAX as u32)
        .map(|v| {
            let linear = v as f32 / u16::MAX as f32;
            let encoded = if linear <= 0.0031308 {
                linear * 12.92
            } else {
                1.055 * linear.powf(1.0 / 2.4) - 0.055
            };
            (encoded * 255.0).round().clamp(0.0, 255.0) as u8
        })
        .collect();

    let data: Vec<u8> = image.data.iter().map(|&v| lut[v as usize]).collect();
    RgbImage::from_raw(image.width as u32, image.height as u32, data).ok_or_else(|| {
        ConversionError::PreviewError(format!(
            "pixel buffer does not match {}x{}",
            image.width, image.height
        ))
    })
}
