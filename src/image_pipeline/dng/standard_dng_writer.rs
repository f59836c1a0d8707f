use std::io::{Cursor, Seek, Write};
use tiff::encoder::{DirectoryEncoder, Rational, SRational, TiffEncoder, TiffKind, colortype};
use tiff::tags::Tag;
use tracing::debug;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::dng::tags;
use crate::image_pipeline::dng::writer::DngWriter;
use crate::image_pipeline::negative::{DngNegative, RawLayout};
use crate::image_pipeline::preview::PreviewImage;
use crate::image_pipeline::raw::types::RawImageData;

const SOFTWARE: &str = concat!("raw2dng ", env!("CARGO_PKG_VERSION"));

/// Denominator used for the fixed-point color tags.
const RATIONAL_SCALE: f32 = 10000.0;

/// Writes the raw image as IFD0 followed by one reduced-resolution IFD per preview.
pub struct StandardDngWriter;

fn encode_err(e: tiff::TiffError) -> ConversionError {
    ConversionError::EncodeError(e.to_string())
}

fn srational(v: f32) -> SRational {
    SRational {
        n: (v * RATIONAL_SCALE).round() as i32,
        d: RATIONAL_SCALE as i32,
    }
}

fn rational(v: f32) -> Rational {
    Rational {
        n: (v.max(0.0) * RATIONAL_SCALE).round() as u32,
        d: RATIONAL_SCALE as u32,
    }
}

fn write_negative_tags<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    negative: &DngNegative,
) -> tiff::TiffResult<()> {
    dir.write_tag(Tag::NewSubfileType, tags::SUBFILE_MAIN_IMAGE)?;
    if !negative.make.is_empty() {
        dir.write_tag(Tag::Make, negative.make.as_str())?;
    }
    if !negative.model.is_empty() {
        dir.write_tag(Tag::Model, negative.model.as_str())?;
    }
    dir.write_tag(Tag::Software, SOFTWARE)?;
    dir.write_tag(Tag::Orientation, negative.orientation)?;

    dir.write_tag(tags::DNG_VERSION, &tags::DNG_VERSION_V1_4[..])?;
    dir.write_tag(tags::DNG_BACKWARD_VERSION, &tags::DNG_VERSION_V1_1[..])?;
    dir.write_tag(tags::UNIQUE_CAMERA_MODEL, negative.unique_camera_model.as_str())?;

    match &negative.layout {
        RawLayout::Cfa(cfa) => {
            dir.write_tag(Tag::PhotometricInterpretation, tags::PHOTOMETRIC_CFA)?;
            dir.write_tag(tags::CFA_REPEAT_PATTERN_DIM, &[cfa.height as u16, cfa.width as u16][..])?;
            dir.write_tag(tags::CFA_PATTERN, &cfa.pattern[..])?;
            dir.write_tag(tags::CFA_PLANE_COLOR, &[0u8, 1, 2][..])?;
            dir.write_tag(tags::CFA_LAYOUT, 1u16)?;
        }
        RawLayout::LinearRaw => {
            dir.write_tag(Tag::PhotometricInterpretation, tags::PHOTOMETRIC_LINEAR_RAW)?;
        }
    }

    let (rows, cols) = negative.black_level_repeat;
    dir.write_tag(tags::BLACK_LEVEL_REPEAT_DIM, &[rows, cols][..])?;
    dir.write_tag(tags::BLACK_LEVEL, &negative.black_levels[..])?;
    let white_levels = vec![negative.white_level; negative.samples_per_pixel()];
    dir.write_tag(tags::WHITE_LEVEL, &white_levels[..])?;

    dir.write_tag(tags::DEFAULT_CROP_ORIGIN, &[negative.crop_origin.0, negative.crop_origin.1][..])?;
    dir.write_tag(tags::DEFAULT_CROP_SIZE, &[negative.crop_size.0, negative.crop_size.1][..])?;

    let matrix: Vec<SRational> = negative.color_matrix.iter().flatten().map(|&v| srational(v)).collect();
    dir.write_tag(tags::COLOR_MATRIX_1, &matrix[..])?;
    dir.write_tag(tags::CALIBRATION_ILLUMINANT_1, tags::ILLUMINANT_D65)?;
    let neutral: Vec<Rational> = negative.as_shot_neutral.iter().map(|&v| rational(v)).collect();
    dir.write_tag(tags::AS_SHOT_NEUTRAL, &neutral[..])?;
    dir.write_tag(tags::PROFILE_NAME, negative.profile_name.as_str())?;

    Ok(())
}

impl StandardDngWriter {
    fn encode<W: Write + Seek>(
        &self,
        encoder: &mut TiffEncoder<W>,
        image: &RawImageData,
        negative: &DngNegative,
        previews: &[PreviewImage],
    ) -> tiff::TiffResult<()> {
        let (width, height) = (negative.width as u32, negative.height as u32);
        let samples = negative.width * negative.height * negative.samples_per_pixel();

        match negative.layout {
            RawLayout::Cfa(_) => {
                let mut raw_ifd = encoder.new_image::<colortype::Gray16>(width, height)?;
                write_negative_tags(raw_ifd.encoder(), negative)?;
                raw_ifd.write_data(&image.data[..samples])?;
            }
            RawLayout::LinearRaw => {
                let mut raw_ifd = encoder.new_image::<colortype::RGB16>(width, height)?;
                write_negative_tags(raw_ifd.encoder(), negative)?;
                raw_ifd.write_data(&image.data[..samples])?;
            }
        }

        for preview in previews {
            let mut preview_ifd = encoder.new_image::<colortype::RGB8>(preview.width, preview.height)?;
            preview_ifd.encoder().write_tag(Tag::NewSubfileType, tags::SUBFILE_REDUCED_IMAGE)?;
            preview_ifd.write_data(&preview.data)?;
        }

        Ok(())
    }
}

impl DngWriter for StandardDngWriter {
    fn write_dng(
        &self,
        image: &RawImageData,
        negative: &DngNegative,
        previews: &[PreviewImage],
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding DNG image: {}x{}", negative.width, negative.height);

        let samples = negative.width * negative.height * negative.samples_per_pixel();
        if image.data.len() < samples {
            return Err(ConversionError::EncodeError(format!(
                "raw buffer holds {} samples, negative needs {}",
                image.data.len(),
                samples
            )));
        }

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer)).map_err(encode_err)?;
            self.encode(&mut encoder, image, negative, previews).map_err(encode_err)?;
        }

        output.write_all(&buffer)?;

        debug!("DNG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
