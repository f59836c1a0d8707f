//! Negative data types

use crate::image_pipeline::raw::types::CfaLayout;

/// How the raw pixels of a negative are laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLayout {
    /// One sample per pixel behind a color filter array
    Cfa(CfaLayout),
    /// Three samples per pixel in camera color space
    LinearRaw,
}

/// Everything the DNG needs besides the pixels themselves
#[derive(Debug, Clone)]
pub struct DngNegative {
    pub width: usize,
    pub height: usize,
    pub layout: RawLayout,
    /// `(rows, cols)` of the black level repeat pattern
    pub black_level_repeat: (u16, u16),
    /// Black levels in repeat-pattern order, one per sample
    pub black_levels: Vec<u16>,
    pub white_level: u32,
    /// XYZ (D65) to camera matrix, row-major
    pub color_matrix: [[f32; 3]; 3],
    /// Camera neutral as shot, normalized to green
    pub as_shot_neutral: [f32; 3],
    /// `(x, y)` of the default crop origin
    pub crop_origin: (u32, u32),
    /// `(width, height)` of the default crop
    pub crop_size: (u32, u32),
    /// TIFF orientation value
    pub orientation: u16,
    pub make: String,
    pub model: String,
    pub unique_camera_model: String,
    pub profile_name: String,
}

impl DngNegative {
    /// Samples per pixel of the raw image
    pub fn samples_per_pixel(&self) -> usize {
        match self.layout {
            RawLayout::Cfa(_) => 1,
            RawLayout::LinearRaw => 3,
        }
    }
}
