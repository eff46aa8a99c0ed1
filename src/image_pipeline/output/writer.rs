use std::io::Write;

use image::RgbImage;

use crate::image_pipeline::common::config::ConversionConfig;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::output::types::OutputFormat;

pub trait ImageWriter {
    fn write_image(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()>;
}
