//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::batch::{find_raw_files, is_raw_file};
use crate::image_pipeline::{ConversionConfig, DemosaicMethod, Result};
use crate::logger::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemosaicArg {
    Nearest,
    Linear,
    Cubic,
}

impl From<DemosaicArg> for DemosaicMethod {
    fn from(arg: DemosaicArg) -> Self {
        match arg {
            DemosaicArg::Nearest => DemosaicMethod::NearestNeighbour,
            DemosaicArg::Linear => DemosaicMethod::Linear,
            DemosaicArg::Cubic => DemosaicMethod::Cubic,
        }
    }
}

/// Convert camera RAW files to DNG
#[derive(Debug, Parser)]
#[command(name = "raw2dng", version, about)]
pub struct Cli {
    /// RAW files or folders to convert (folders are scanned recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Folder for the DNG files; defaults to next to each input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Reject images whose width or height exceeds this many pixels
    #[arg(long, default_value_t = 65535)]
    pub max_dimension: usize,

    /// Long edge of the embedded preview
    #[arg(long, default_value_t = 1024)]
    pub preview_size: u32,

    /// Long edge of the embedded thumbnail
    #[arg(long, default_value_t = 256)]
    pub thumbnail_size: u32,

    /// Demosaic algorithm used to render the full image the previews are downsampled from
    #[arg(long, value_enum, default_value_t = DemosaicArg::Linear)]
    pub demosaic: DemosaicArg,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .max_dimension(Some(self.max_dimension))
            .preview_size(self.preview_size)
            .thumbnail_size(self.thumbnail_size)
            .demosaic(self.demosaic.into())
            .build()
    }

    /// Expands folders into the RAW files they contain. Explicit file arguments are kept
    /// even without a RAW extension.
    pub fn collect_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for input in &self.inputs {
            if input.is_dir() {
                files.extend(find_raw_files(input)?);
            } else {
                if !is_raw_file(input) {
                    warn!("{} has no known RAW extension", input.display());
                }
                files.push(input.clone());
            }
        }
        Ok(files)
    }
}
