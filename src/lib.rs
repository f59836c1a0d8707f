//! Camera RAW to DNG conversion.

pub mod image_pipeline;
pub mod batch;
pub mod cli;
pub mod logger;

pub use image_pipeline::{ConversionError, Result, convert_to_message, raw2dng};
