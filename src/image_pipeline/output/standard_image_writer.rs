use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tracing::debug;

use crate::image_pipeline::common::config::ConversionConfig;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::types::{OutputFormat, TiffCompression};
use crate::image_pipeline::output::writer::ImageWriter;

/// Encodes RGB images as JPEG or PNG with the image library and as TIFF with
/// the tiff library.
pub struct StandardImageWriter;

impl ImageWriter for StandardImageWriter {
    fn write_image(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()> {
        debug!("Encoding {} image: {}x{}", format, image.width(), image.height());

        let mut buffer = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality)
                    .write_image(
                        image.as_raw(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
            }
            OutputFormat::Png => {
                PngEncoder::new(&mut buffer)
                    .write_image(
                        image.as_raw(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
            }
            OutputFormat::Tiff => encode_tiff(image, &mut buffer, config)?,
        }

        output.write_all(&buffer)?;

        debug!("{} encoding complete, {} bytes", format, buffer.len());
        Ok(())
    }
}

fn encode_tiff(image: &RgbImage, buffer: &mut Vec<u8>, config: &ConversionConfig) -> Result<()> {
    let compression = match config.tiff_compression {
        TiffCompression::None => tiff::encoder::Compression::Uncompressed,
        TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
        TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(
            tiff::encoder::compression::DeflateLevel::Fast,
        ),
        TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(
            tiff::encoder::compression::DeflateLevel::Balanced,
        ),
        TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(
            tiff::encoder::compression::DeflateLevel::Best,
        ),
    };

    let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(buffer))
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?
        .with_compression(compression);

    if config.tiff_predictor {
        encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
    }

    encoder
        .write_image::<tiff::encoder::colortype::RGB8>(
            image.width(),
            image.height(),
            image.as_raw(),
        )
        .map_err(|e| ConversionError::EncodeError(e.to_string()))
}
