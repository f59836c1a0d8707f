use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build negative: {0}")]
    NegativeError(String),

    #[error("Failed to render image: {0}")]
    RenderError(String),

    #[error("Failed to render previews: {0}")]
    PreviewError(String),

    #[error("Failed to encode DNG image: {0}")]
    EncodeError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Conversion step `{step}` requires `{requires}` to run first")]
    StepOutOfOrder {
        step: &'static str,
        requires: &'static str,
    },

    #[error("No RAW files found in {0}")]
    NoRawFiles(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
