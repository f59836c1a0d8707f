//! Image processing pipeline module
//!
//! RAW decoding, negative construction, rendering, preview generation and DNG
//! writing, plus the orchestration that runs them in order.

pub mod raw;
pub mod negative;
pub mod debayer;
pub mod preview;
pub mod dng;
pub mod conversions;
pub mod common;

#[cfg(test)]
pub(crate) mod test_support;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    CfaLayout,
    Orientation,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use negative::{
    DngNegative,
    NegativeBuilder,
    RawLayout,
};

pub use debayer::{
    CpuDebayer,
    RgbImageData,
};

pub use preview::{
    PreviewImage,
    PreviewKind,
    PreviewRenderer,
};

pub use dng::{
    DngWriter,
    StandardDngWriter,
};

pub use conversions::{
    ConversionConfig,
    ConversionConfigBuilder,
    DemosaicMethod,
    DngConverter,
    RawConverter,
    RawToDngPipeline,
    convert_to_message,
    raw2dng,
    run_conversion,
};
