//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading various RAW image formats (ARW, CR2, NEF, DNG, etc.)
//! using the rawloader library. It decodes the sensor data and carries over the camera
//! metadata a DNG negative needs: levels, white balance, color matrices, crops and the CFA.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{CfaLayout, Orientation, RawImageData};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
///
/// This reader supports any RAW format that rawloader can decode, including but not limited to:
/// - Sony ARW
/// - Canon CR2
/// - Nikon NEF
/// - Fujifilm RAF
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// This method:
    /// 1. Decodes the RAW file using rawloader
    /// 2. Converts the data to u16 format (handles both integer and float RAW data)
    /// 3. Calculates the actual bits per sample from the sensor's white level metadata
    /// 4. Copies the color metadata and CFA layout
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes of the RAW image file
    ///
    /// # Returns
    ///
    /// * `Ok(RawImageData)` - Successfully decoded image with metadata
    /// * `Err(ConversionError)` - Failed to decode the RAW file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use raw2dng::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let image_data = reader.read_raw(&raw_bytes).unwrap();
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        if data.is_empty() {
            return Err(ConversionError::DecodeError("input file is empty".to_string()));
        }

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        debug!(
            "Decoded image: {}x{} ({} {}), cpp={}",
            decoded.width, decoded.height, decoded.clean_make, decoded.clean_model, decoded.cpp
        );

        let cam_to_xyz = decoded.cam_to_xyz_normalized();

        let cfa = if decoded.cfa.width > 0 && decoded.cfa.height > 0 {
            let mut pattern = Vec::with_capacity(decoded.cfa.width * decoded.cfa.height);
            for row in 0..decoded.cfa.height {
                for col in 0..decoded.cfa.width {
                    pattern.push(decoded.cfa.color_at(row, col) as u8);
                }
            }
            CfaLayout {
                width: decoded.cfa.width,
                height: decoded.cfa.height,
                pattern,
            }
        } else {
            CfaLayout {
                width: 0,
                height: 0,
                pattern: Vec::new(),
            }
        };

        let orientation = match decoded.orientation {
            rawloader::Orientation::HorizontalFlip => Orientation::HorizontalFlip,
            rawloader::Orientation::Rotate180 => Orientation::Rotate180,
            rawloader::Orientation::VerticalFlip => Orientation::VerticalFlip,
            rawloader::Orientation::Transpose => Orientation::Transpose,
            rawloader::Orientation::Rotate90 => Orientation::Rotate90,
            rawloader::Orientation::Transverse => Orientation::Transverse,
            rawloader::Orientation::Rotate270 => Orientation::Rotate270,
            _ => Orientation::Normal,
        };

        // Integer data is cast directly, float data (normalized 0.0-1.0) is scaled to u16 range
        let samples: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect()
            }
        };

        // The white level is the largest value the sensor produces, so it gives the real
        // bit depth (12, 14 or 16) whatever the container format says.
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };

        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        Ok(RawImageData {
            width: decoded.width,
            height: decoded.height,
            cpp: decoded.cpp,
            data: samples,
            bits_per_sample,
            make: decoded.make,
            model: decoded.model,
            clean_make: decoded.clean_make,
            clean_model: decoded.clean_model,
            blacklevels: decoded.blacklevels,
            whitelevels: decoded.whitelevels,
            wb_coeffs: decoded.wb_coeffs,
            xyz_to_cam: decoded.xyz_to_cam,
            cam_to_xyz,
            crops: decoded.crops,
            orientation,
            cfa,
        })
    }
}
