use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::ConversionConfig;
use crate::image_pipeline::negative::types::{DngNegative, RawLayout};
use crate::image_pipeline::raw::types::RawImageData;

/// Profile name written when no camera profile is requested.
const EMBEDDED_PROFILE_NAME: &str = "Embedded";

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Builds a [`DngNegative`] from decoded RAW data.
pub struct NegativeBuilder<'a> {
    config: &'a ConversionConfig,
}

impl<'a> NegativeBuilder<'a> {
    pub fn new(config: &'a ConversionConfig) -> Self {
        Self { config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Builds the negative. An empty `profile` keeps the camera's embedded color data
    /// and names the profile accordingly.
    pub fn build(&self, raw: &RawImageData, profile: &str) -> Result<DngNegative> {
        self.validate_dimensions(raw.width, raw.height)?;

        let layout = match raw.cpp {
            1 => {
                if raw.cfa.pattern.is_empty() || raw.cfa.pattern.len() != raw.cfa.width * raw.cfa.height {
                    return Err(ConversionError::NegativeError(
                        "single-channel image without a CFA pattern".to_string(),
                    ));
                }
                if let Some(&color) = raw.cfa.pattern.iter().find(|&&color| color > 2) {
                    return Err(ConversionError::UnsupportedFormat(format!(
                        "CFA color {} outside the RGB planes",
                        color
                    )));
                }
                RawLayout::Cfa(raw.cfa.clone())
            }
            3 => RawLayout::LinearRaw,
            cpp => {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{} components per pixel",
                    cpp
                )));
            }
        };

        let expected = raw.width * raw.height * raw.cpp;
        if raw.data.len() < expected {
            return Err(ConversionError::NegativeError(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                raw.width,
                raw.height,
                raw.cpp,
                raw.data.len()
            )));
        }

        let (black_level_repeat, black_levels) = match &layout {
            RawLayout::Cfa(cfa) => {
                let levels = cfa
                    .pattern
                    .iter()
                    .map(|&color| raw.blacklevels[color as usize])
                    .collect();
                ((cfa.height as u16, cfa.width as u16), levels)
            }
            RawLayout::LinearRaw => ((1, 1), raw.blacklevels[..3].to_vec()),
        };

        let white_level = match raw.white_level() {
            0 => (1u32 << raw.bits_per_sample.min(16)) - 1,
            level => level as u32,
        };

        let (crop_origin, crop_size) = default_crop(raw);

        let negative = DngNegative {
            width: raw.width,
            height: raw.height,
            layout,
            black_level_repeat,
            black_levels,
            white_level,
            color_matrix: color_matrix(raw),
            as_shot_neutral: as_shot_neutral(raw.wb_coeffs),
            crop_origin,
            crop_size,
            orientation: raw.orientation.to_tiff(),
            make: raw.make.clone(),
            model: raw.model.clone(),
            unique_camera_model: unique_camera_model(raw),
            profile_name: if profile.is_empty() {
                EMBEDDED_PROFILE_NAME.to_string()
            } else {
                profile.to_string()
            },
        };

        debug!(
            camera = %negative.unique_camera_model,
            white_level = negative.white_level,
            crop_w = negative.crop_size.0,
            crop_h = negative.crop_size.1,
            "Negative built"
        );
        Ok(negative)
    }
}

fn color_matrix(raw: &RawImageData) -> [[f32; 3]; 3] {
    let matrix = [raw.xyz_to_cam[0], raw.xyz_to_cam[1], raw.xyz_to_cam[2]];
    let known = matrix.iter().flatten().all(|v| v.is_finite())
        && matrix.iter().flatten().any(|&v| v != 0.0);
    if known {
        matrix
    } else {
        warn!("No color matrix for {} {}, using identity", raw.make, raw.model);
        IDENTITY
    }
}

fn as_shot_neutral(wb: [f32; 4]) -> [f32; 3] {
    if wb[..3].iter().all(|v| v.is_finite() && *v > 0.0) {
        [wb[1] / wb[0], 1.0, wb[1] / wb[2]]
    } else {
        [1.0, 1.0, 1.0]
    }
}

fn default_crop(raw: &RawImageData) -> ((u32, u32), (u32, u32)) {
    let [top, right, bottom, left] = raw.crops;
    if left + right >= raw.width || top + bottom >= raw.height {
        return ((0, 0), (raw.width as u32, raw.height as u32));
    }
    (
        (left as u32, top as u32),
        ((raw.width - left - right) as u32, (raw.height - top - bottom) as u32),
    )
}

fn unique_camera_model(raw: &RawImageData) -> String {
    let clean = format!("{} {}", raw.clean_make, raw.clean_model).trim().to_string();
    if !clean.is_empty() {
        return clean;
    }
    let full = format!("{} {}", raw.make, raw.model).trim().to_string();
    if full.is_empty() {
        "Unknown Camera".to_string()
    } else {
        full
    }
}
