use tracing::{info, instrument};
use std::path::Path;

use crate::image_pipeline::{
    common::error::Result,
    conversions::{ConversionConfig, DngConverter, RawConverter},
    dng::{DngWriter, StandardDngWriter},
    raw::{RawImageReader, RawLoaderReader},
};

/// Runs the five conversion steps on `converter`, stopping at the first failure.
///
/// The converter is consumed, so it is dropped on every exit path.
pub fn run_conversion<C: RawConverter>(mut converter: C, raw_path: &Path, out_path: &Path) -> Result<()> {
    {
        let _span = tracing::info_span!("open_raw_file").entered();
        converter.open_raw_file(raw_path)?;
    }

    {
        let _span = tracing::info_span!("build_negative").entered();
        converter.build_negative("")?;
    }

    {
        let _span = tracing::info_span!("render_image").entered();
        converter.render_image()?;
    }

    {
        let _span = tracing::info_span!("render_previews").entered();
        converter.render_previews()?;
    }

    {
        let _span = tracing::info_span!("write_dng").entered();
        converter.write_dng(out_path)?;
    }

    Ok(())
}

pub struct RawToDngPipeline<R: RawImageReader, W: DngWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RawToDngPipeline<RawLoaderReader, StandardDngWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            writer: StandardDngWriter,
            config,
        }
    }
}

impl<R: RawImageReader, W: DngWriter> RawToDngPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Converts one file with a converter created for this call only.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let converter = DngConverter::with_custom(&self.reader, &self.writer, self.config.clone());
        run_conversion(converter, input_path, output_path)?;

        info!(output = %output_path.display(), "Conversion complete");
        Ok(())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

/// Converts `raw_path` to a DNG at `out_path` with the default configuration.
///
/// ```no_run
/// match raw2dng::raw2dng("IMG_0001.CR2", "IMG_0001.dng") {
///     Ok(()) => println!("done"),
///     Err(e) => eprintln!("conversion failed: {e}"),
/// }
/// ```
pub fn raw2dng<P: AsRef<Path>, Q: AsRef<Path>>(raw_path: P, out_path: Q) -> Result<()> {
    RawToDngPipeline::new(ConversionConfig::default()).convert_file(raw_path, out_path)
}

/// Same as [`raw2dng`], reporting the outcome as text: empty on success,
/// the error description otherwise.
pub fn convert_to_message<P: AsRef<Path>, Q: AsRef<Path>>(raw_path: P, out_path: Q) -> String {
    message_from(raw2dng(raw_path, out_path))
}

fn message_from(result: Result<()>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}
