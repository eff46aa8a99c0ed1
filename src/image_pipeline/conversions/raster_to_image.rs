use std::io::Write;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, error, info, instrument};

use crate::image_pipeline::{
    common::config::{ConversionConfig, FailureMode},
    common::error::{ConversionError, Result},
    output::{ImageWriter, OutputFormat, StandardImageWriter},
    raster::{GeoTiffReader, RasterReader, SampleType},
    transform::{NormalizedImage, normalize, select_bands},
};

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// Where the image was written; `None` for in-memory conversions
    pub output_path: Option<PathBuf>,
    pub width: usize,
    pub height: usize,
    pub format: OutputFormat,
    /// Band count of the source raster
    pub source_bands: usize,
    pub sample_type: SampleType,
    /// Whether samples were rescaled to 8 bits
    pub normalized: bool,
}

pub struct RasterToImagePipeline<R: RasterReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RasterToImagePipeline<GeoTiffReader, StandardImageWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: GeoTiffReader,
            writer: StandardImageWriter,
            config,
        }
    }
}

impl<R: RasterReader, W: ImageWriter> RasterToImagePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Forced format first, then the output path extension.
    fn resolve_format(&self, output_path: &Path) -> Result<OutputFormat> {
        if let Some(format) = self.config.force_format {
            return Ok(format);
        }
        OutputFormat::from_path(output_path).ok_or_else(|| {
            ConversionError::UnsupportedFormat(format!(
                "cannot infer an image format from {}",
                output_path.display()
            ))
        })
    }

    /// Decodes a raster held in memory and writes the encoded image to `output`.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(
        &self,
        input_data: &[u8],
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<ConversionReport> {
        info!("Starting raster to {} conversion", format);

        let raster = {
            let _span = tracing::info_span!("read_raster").entered();
            self.reader.read_raster(input_data)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = raster.shape.width(),
                height = raster.shape.height()
            )
            .entered();
            self.validate_dimensions(raster.shape.width(), raster.shape.height())?;
        }

        let selected = {
            let _span = tracing::info_span!("select_bands", bands = raster.shape.bands()).entered();
            select_bands(&raster, self.config.band_selection)?
        };

        let normalized = {
            let _span =
                tracing::info_span!("normalize", sample_type = %raster.sample_type()).entered();
            normalize(selected, &self.config)?
        };
        let rescaled = normalized.rescaled;

        let image = {
            let _span = tracing::info_span!("build_image").entered();
            build_rgb(normalized)?
        };

        {
            let _span = tracing::info_span!("encode_image", %format).entered();
            self.writer.write_image(&image, format, output, &self.config)?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            "Conversion complete"
        );

        Ok(ConversionReport {
            output_path: None,
            width: image.width() as usize,
            height: image.height() as usize,
            format,
            source_bands: raster.shape.bands(),
            sample_type: raster.sample_type(),
            normalized: rescaled,
        })
    }

    /// Converts the raster at `input_path` and writes the image to `output_path`,
    /// creating missing parent directories.
    ///
    /// Nothing is written unless every earlier step succeeded.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::OpenError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let format = self.resolve_format(output_path)?;

        let mut encoded = Vec::new();
        let mut report = self.convert(&input_data, format, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
            write_output(output_path, &encoded)?;
        }

        info!("Image saved to: {}", output_path.display());

        report.output_path = Some(output_path.to_path_buf());
        Ok(report)
    }

    /// Runs [`convert_file`](Self::convert_file) and applies the configured
    /// [`FailureMode`]. Failures are always logged.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_path: Q) -> Result<()> {
        match self.convert_file(input_path, output_path) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Error converting raster to image: {}", e);
                match self.config.failure_mode {
                    FailureMode::Report => Ok(()),
                    FailureMode::Propagate => Err(e),
                }
            }
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

/// Converts a GeoTIFF to an image with the default settings, reporting the
/// outcome through the log only.
///
/// The format follows the output extension; paths without a recognised
/// extension are written as JPEG.
///
/// The status line is a `tracing` event. Nothing reaches stdout unless a
/// subscriber is installed first, e.g. with [`crate::logger::init`].
///
/// Use [`RasterToImagePipeline::convert_file`] to get a typed result instead.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input_path: P, output_path: Q) {
    let format = OutputFormat::from_path(output_path.as_ref()).unwrap_or(OutputFormat::Jpeg);
    let config = ConversionConfig::builder()
        .force_format(Some(format))
        .failure_mode(FailureMode::Report)
        .build();
    // Report mode never returns an error; it has already been logged.
    let _ = RasterToImagePipeline::new(config).run(input_path, output_path);
}

/// Builds an RGB image; grayscale is replicated across the three channels.
fn build_rgb(normalized: NormalizedImage) -> Result<RgbImage> {
    let NormalizedImage {
        width,
        height,
        channels,
        data,
        ..
    } = normalized;

    let invalid = || ConversionError::InvalidDimensions(width, height);
    let w = u32::try_from(width).map_err(|_| invalid())?;
    let h = u32::try_from(height).map_err(|_| invalid())?;

    let image = match channels {
        1 => GrayImage::from_raw(w, h, data).map(|gray| DynamicImage::ImageLuma8(gray).to_rgb8()),
        3 => RgbImage::from_raw(w, h, data),
        _ => None,
    };

    debug!("Built {}x{} RGB image from {} channel(s)", w, h, channels);
    image.ok_or_else(invalid)
}

fn write_output(output_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", parent.display(), e))
        })?;
    }

    std::fs::write(output_path, data).map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
    })
}
