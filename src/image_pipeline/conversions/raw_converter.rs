use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::ConversionConfig,
    debayer::{CpuDebayer, RgbImageData},
    dng::{DngWriter, StandardDngWriter},
    negative::{DngNegative, NegativeBuilder},
    preview::{PreviewImage, PreviewRenderer},
    raw::{RawImageData, RawImageReader, RawLoaderReader},
};

/// The five steps of turning a RAW file into a DNG.
///
/// Each step depends on the ones before it; calling a step early fails with
/// [`ConversionError::StepOutOfOrder`].
pub trait RawConverter {
    /// Reads and decodes the source RAW file.
    fn open_raw_file(&mut self, path: &Path) -> Result<()>;
    /// Builds the negative. An empty profile keeps the camera's own color data.
    fn build_negative(&mut self, profile: &str) -> Result<()>;
    /// Renders the full-size image.
    fn render_image(&mut self) -> Result<()>;
    /// Renders the embedded preview images.
    fn render_previews(&mut self) -> Result<()>;
    /// Serializes the DNG to `path`.
    fn write_dng(&mut self, path: &Path) -> Result<()>;
}

/// Default [`RawConverter`]: rawloader decoding, CPU rendering, `tiff` serialization.
pub struct DngConverter<R: RawImageReader, W: DngWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
    raw: Option<RawImageData>,
    negative: Option<DngNegative>,
    rendered: Option<RgbImageData>,
    previews: Option<Vec<PreviewImage>>,
}

impl DngConverter<RawLoaderReader, StandardDngWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_custom(RawLoaderReader, StandardDngWriter, config)
    }
}

impl<R: RawImageReader, W: DngWriter> DngConverter<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
            raw: None,
            negative: None,
            rendered: None,
            previews: None,
        }
    }

    fn raw(&self, step: &'static str) -> Result<&RawImageData> {
        self.raw.as_ref().ok_or(ConversionError::StepOutOfOrder {
            step,
            requires: "open_raw_file",
        })
    }

    fn negative(&self, step: &'static str) -> Result<&DngNegative> {
        self.negative.as_ref().ok_or(ConversionError::StepOutOfOrder {
            step,
            requires: "build_negative",
        })
    }
}

impl<R: RawImageReader, W: DngWriter> RawConverter for DngConverter<R, W> {
    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn open_raw_file(&mut self, path: &Path) -> Result<()> {
        self.raw = None;
        self.negative = None;
        self.rendered = None;
        self.previews = None;

        let input_data = fs::read(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;
        let raw = self.reader.read_raw(&input_data)?;

        info!(
            width = raw.width,
            height = raw.height,
            camera = %format!("{} {}", raw.clean_make, raw.clean_model),
            "RAW file opened"
        );
        self.raw = Some(raw);
        Ok(())
    }

    #[instrument(skip(self))]
    fn build_negative(&mut self, profile: &str) -> Result<()> {
        let negative = NegativeBuilder::new(&self.config).build(self.raw("build_negative")?, profile)?;
        self.negative = Some(negative);
        Ok(())
    }

    #[instrument(skip(self))]
    fn render_image(&mut self) -> Result<()> {
        let raw = self.raw("render_image")?;
        let negative = self.negative("render_image")?;

        let rendered = CpuDebayer::new(self.config.demosaic)
            .process(raw, negative)
            .map_err(|e| ConversionError::RenderError(format!("{:#}", e)))?;

        debug!(width = rendered.width, height = rendered.height, "Image rendered");
        self.rendered = Some(rendered);
        Ok(())
    }

    #[instrument(skip(self))]
    fn render_previews(&mut self) -> Result<()> {
        let rendered = self.rendered.as_ref().ok_or(ConversionError::StepOutOfOrder {
            step: "render_previews",
            requires: "render_image",
        })?;

        let previews = PreviewRenderer::new(self.config.preview_size, self.config.thumbnail_size)
            .render(rendered)?;
        self.previews = Some(previews);
        Ok(())
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn write_dng(&mut self, path: &Path) -> Result<()> {
        let raw = self.raw("write_dng")?;
        let negative = self.negative("write_dng")?;
        let previews = self.previews.as_deref().ok_or(ConversionError::StepOutOfOrder {
            step: "write_dng",
            requires: "render_previews",
        })?;

        let mut buffer = Vec::new();
        self.writer.write_dng(raw, negative, previews, &mut buffer)?;

        let written = fs::File::create(path).and_then(|mut file| {
            file.write_all(&buffer)?;
            file.sync_all()
        });
        if let Err(e) = written {
            if path.is_file() {
                if let Err(remove_err) = fs::remove_file(path) {
                    warn!("Could not remove partial output {}: {}", path.display(), remove_err);
                }
            }
            return Err(ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)));
        }

        info!(bytes = buffer.len(), "DNG written");
        Ok(())
    }
}
