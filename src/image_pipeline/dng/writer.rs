use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::negative::DngNegative;
use crate::image_pipeline::preview::PreviewImage;
use crate::image_pipeline::raw::types::RawImageData;

pub trait DngWriter {
    fn write_dng(
        &self,
        image: &RawImageData,
        negative: &DngNegative,
        previews: &[PreviewImage],
        output: &mut dyn Write,
    ) -> Result<()>;
}

impl<W: DngWriter + ?Sized> DngWriter for &W {
    fn write_dng(
        &self,
        image: &RawImageData,
        negative: &DngNegative,
        previews: &[PreviewImage],
        output: &mut dyn Write,
    ) -> Result<()> {
        (**self).write_dng(image, negative, previews, output)
    }
}
