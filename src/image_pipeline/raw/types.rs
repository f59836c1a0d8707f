//! RAW image data types

/// Color index of a CFA cell, matching the DNG `CFAPattern` encoding.
pub const CFA_RED: u8 = 0;
pub const CFA_GREEN: u8 = 1;
pub const CFA_BLUE: u8 = 2;

/// Layout of the sensor's color filter array.
///
/// `pattern` holds `height * width` color indices in row-major order:
/// 0 = red, 1 = green, 2 = blue, 3 = emerald/other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfaLayout {
    pub width: usize,
    pub height: usize,
    pub pattern: Vec<u8>,
}

impl CfaLayout {
    /// 2x2 layout built from the four colors in row-major order.
    pub fn bayer(colors: [u8; 4]) -> Self {
        Self {
            width: 2,
            height: 2,
            pattern: colors.to_vec(),
        }
    }

    /// Color index at an image position, wrapping over the repeat pattern.
    pub fn color_at(&self, row: usize, col: usize) -> u8 {
        if self.width == 0 || self.height == 0 {
            return CFA_GREEN;
        }
        self.pattern[(row % self.height) * self.width + (col % self.width)]
    }

    /// True when the layout is a 2x2 pattern made of one red, one blue and two greens.
    pub fn is_rgb_bayer(&self) -> bool {
        if self.width != 2 || self.height != 2 || self.pattern.len() != 4 {
            return false;
        }
        let count = |c: u8| self.pattern.iter().filter(|&&v| v == c).count();
        count(CFA_RED) == 1 && count(CFA_GREEN) == 2 && count(CFA_BLUE) == 1
    }

    /// The same layout as seen from an image cropped by `(top, left)`.
    pub fn shifted(&self, top: usize, left: usize) -> Self {
        let mut pattern = Vec::with_capacity(self.pattern.len());
        for row in 0..self.height {
            for col in 0..self.width {
                pattern.push(self.color_at(row + top, col + left));
            }
        }
        Self {
            width: self.width,
            height: self.height,
            pattern,
        }
    }
}

/// EXIF orientation of the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    HorizontalFlip,
    Rotate180,
    VerticalFlip,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Value of the TIFF `Orientation` tag.
    pub fn to_tiff(self) -> u16 {
        match self {
            Orientation::Normal => 1,
            Orientation::HorizontalFlip => 2,
            Orientation::Rotate180 => 3,
            Orientation::VerticalFlip => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90 => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270 => 8,
        }
    }
}

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Components per pixel: 1 for CFA sensors, 3 for already-demosaiced data
    pub cpp: usize,
    /// Raw pixel data, `width * height * cpp` samples
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    pub make: String,
    pub model: String,
    pub clean_make: String,
    pub clean_model: String,
    /// Black level per color index
    pub blacklevels: [u16; 4],
    /// White level per color index
    pub whitelevels: [u16; 4],
    /// White balance multipliers per color index, as shot
    pub wb_coeffs: [f32; 4],
    /// XYZ to camera matrix, one row per color index
    pub xyz_to_cam: [[f32; 3]; 4],
    /// Normalized camera to XYZ matrix
    pub cam_to_xyz: [[f32; 4]; 3],
    /// Crop margins as `[top, right, bottom, left]`
    pub crops: [usize; 4],
    pub orientation: Orientation,
    pub cfa: CfaLayout,
}

impl RawImageData {
    /// Largest white level across channels.
    pub fn white_level(&self) -> u16 {
        self.whitelevels.iter().max().copied().unwrap_or(u16::MAX)
    }
}
