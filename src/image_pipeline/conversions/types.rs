//! RAW to DNG conversion configuration types

/// Interpolation used when rendering the full image from CFA data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemosaicMethod {
    /// Nearest neighbour (fastest, blocky)
    NearestNeighbour,
    /// Bilinear interpolation (default)
    Linear,
    /// Bicubic interpolation (slower, sharper)
    Cubic,
}

/// Configuration for RAW to DNG conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Whether to validate image dimensions before building the negative
    pub validate_dimensions: bool,
    /// Largest accepted edge in pixels, when validating
    pub max_dimension: Option<usize>,
    /// Demosaic algorithm for the rendered image
    pub demosaic: DemosaicMethod,
    /// Long edge of the embedded preview in pixels
    pub preview_size: u32,
    /// Long edge of the embedded thumbnail in pixels
    pub thumbnail_size: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: Some(65535),
            demosaic: DemosaicMethod::Linear,
            preview_size: 1024,
            thumbnail_size: 256,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    demosaic: Option<DemosaicMethod>,
    preview_size: Option<u32>,
    thumbnail_size: Option<u32>,
}

impl ConversionConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn demosaic(mut self, method: DemosaicMethod) -> Self {
        self.demosaic = Some(method);
        self
    }

    pub fn preview_size(mut self, size: u32) -> Self {
        self.preview_size = Some(size);
        self
    }

    pub fn thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = Some(size);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            preview_size: self.preview_size.unwrap_or(default.preview_size),
            thumbnail_size: self.thumbnail_size.unwrap_or(default.thumbnail_size),
        }
    }
}
