//! Pipeline conversions module
//!
//! This module contains the RAW to DNG orchestration and the converter it drives.

mod raw_converter;
mod raw_to_dng;
pub mod types;

#[cfg(test)]
mod tests;

pub use raw_converter::{DngConverter, RawConverter};
pub use raw_to_dng::{RawToDngPipeline, convert_to_message, raw2dng, run_conversion};
pub use types::{ConversionConfig, ConversionConfigBuilder, DemosaicMethod};
