//! TIFF/EP and DNG tags the `tiff` crate has no named variant for

use tiff::tags::Tag;

pub const CFA_REPEAT_PATTERN_DIM: Tag = Tag::Unknown(33421);
pub const CFA_PATTERN: Tag = Tag::Unknown(33422);
pub const DNG_VERSION: Tag = Tag::Unknown(50706);
pub const DNG_BACKWARD_VERSION: Tag = Tag::Unknown(50707);
pub const UNIQUE_CAMERA_MODEL: Tag = Tag::Unknown(50708);
pub const CFA_PLANE_COLOR: Tag = Tag::Unknown(50710);
pub const CFA_LAYOUT: Tag = Tag::Unknown(50711);
pub const BLACK_LEVEL_REPEAT_DIM: Tag = Tag::Unknown(50713);
pub const BLACK_LEVEL: Tag = Tag::Unknown(50714);
pub const WHITE_LEVEL: Tag = Tag::Unknown(50717);
pub const DEFAULT_CROP_ORIGIN: Tag = Tag::Unknown(50719);
pub const DEFAULT_CROP_SIZE: Tag = Tag::Unknown(50720);
pub const COLOR_MATRIX_1: Tag = Tag::Unknown(50721);
pub const AS_SHOT_NEUTRAL: Tag = Tag::Unknown(50728);
pub const CALIBRATION_ILLUMINANT_1: Tag = Tag::Unknown(50778);
pub const PROFILE_NAME: Tag = Tag::Unknown(50936);

/// PhotometricInterpretation values
pub const PHOTOMETRIC_CFA: u16 = 32803;
pub const PHOTOMETRIC_LINEAR_RAW: u16 = 34892;

/// NewSubfileType values
pub const SUBFILE_MAIN_IMAGE: u32 = 0;
pub const SUBFILE_REDUCED_IMAGE: u32 = 1;

/// EXIF LightSource code for D65
pub const ILLUMINANT_D65: u16 = 21;

pub const DNG_VERSION_V1_4: [u8; 4] = [1, 4, 0, 0];
pub const DNG_VERSION_V1_1: [u8; 4] = [1, 1, 0, 0];
