//! Types for rendered images

/// Linear sRGB image rendered from a negative, already cropped to the default crop
#[derive(Debug, Clone)]
pub struct RgbImageData {
    pub width: usize,
    pub height: usize,
    /// Interleaved [R, G, B, R, G, B, ...] samples
    pub data: Vec<u16>,
}
