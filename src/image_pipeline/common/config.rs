//! Raster to image conversion configuration types

use crate::image_pipeline::output::types::{OutputFormat, TiffCompression};

/// Default JPEG quality, matching the usual encoder default.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Which raster bands feed the output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandSelection {
    /// First three bands of a multi-band raster as RGB, single-band rasters as grayscale.
    /// Multi-band rasters with fewer than three bands are rejected.
    #[default]
    FirstThree,
    /// Explicit zero-based band indices for the red, green and blue channels
    Indices([usize; 3]),
    /// One band rendered as grayscale
    Single(usize),
}

/// When to rescale samples into the 8-bit range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Rescale unless the samples are already unsigned 8-bit
    #[default]
    Auto,
    /// Always rescale, even unsigned 8-bit samples
    Always,
    /// Never rescale; samples outside [0, 255] saturate
    Off,
}

/// Where the min/max used for rescaling are observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeStrategy {
    /// One range across every selected band
    #[default]
    Global,
    /// Each selected band is rescaled against its own range
    PerBand,
}

/// What rescaling does when max == min
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateRange {
    /// Every sample becomes 0
    #[default]
    Zero,
    /// Samples saturate into [0, 255] without scaling
    Clamp,
    /// Fail with a normalization error
    Fail,
}

/// How [`RasterToImagePipeline::run`](crate::image_pipeline::RasterToImagePipeline::run)
/// surfaces failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Log the failure and return the error to the caller
    #[default]
    Propagate,
    /// Log the failure and carry on; the caller always sees success
    Report,
}

/// Configuration for raster to image conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Output format; overrides detection from the output path extension
    pub force_format: Option<OutputFormat>,
    /// Band to channel mapping
    pub band_selection: BandSelection,
    /// Whether samples are rescaled to 8 bits
    pub normalization: Normalization,
    /// Range used when rescaling
    pub range_strategy: RangeStrategy,
    /// Policy for constant rasters
    pub degenerate_range: DegenerateRange,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Compression used for TIFF output
    pub tiff_compression: TiffCompression,
    /// Horizontal differencing predictor for compressed TIFF output
    pub tiff_predictor: bool,
    /// Whether to reject rasters with a zero width or height
    pub validate_dimensions: bool,
    /// How failures reach the caller of `run`
    pub failure_mode: FailureMode,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            force_format: None,
            band_selection: BandSelection::default(),
            normalization: Normalization::default(),
            range_strategy: RangeStrategy::default(),
            degenerate_range: DegenerateRange::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            tiff_compression: TiffCompression::None,
            tiff_predictor: false,
            validate_dimensions: true,
            failure_mode: FailureMode::default(),
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
    force_format: Option<Option<OutputFormat>>,
    band_selection: Option<BandSelection>,
    normalization: Option<Normalization>,
    range_strategy: Option<RangeStrategy>,
    degenerate_range: Option<DegenerateRange>,
    jpeg_quality: Option<u8>,
    tiff_compression: Option<TiffCompression>,
    tiff_predictor: Option<bool>,
    validate_dimensions: Option<bool>,
    failure_mode: Option<FailureMode>,
}

impl ConversionConfigBuilder {
    pub fn force_format(mut self, format: Option<OutputFormat>) -> Self {
        self.force_format = Some(format);
        self
    }

    pub fn band_selection(mut self, selection: BandSelection) -> Self {
        self.band_selection = Some(selection);
        self
    }

    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    pub fn range_strategy(mut self, strategy: RangeStrategy) -> Self {
        self.range_strategy = Some(strategy);
        self
    }

    pub fn degenerate_range(mut self, policy: DegenerateRange) -> Self {
        self.degenerate_range = Some(policy);
        self
    }

    /// Quality is clamped into 1..=100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn tiff_predictor(mut self, enable: bool) -> Self {
        self.tiff_predictor = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = Some(mode);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            force_format: self.force_format.unwrap_or(default.force_format),
            band_selection: self.band_selection.unwrap_or(default.band_selection),
            normalization: self.normalization.unwrap_or(default.normalization),
            range_strategy: self.range_strategy.unwrap_or(default.range_strategy),
            degenerate_range: self.degenerate_range.unwrap_or(default.degenerate_range),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            tiff_predictor: self.tiff_predictor.unwrap_or(default.tiff_predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            failure_mode: self.failure_mode.unwrap_or(default.failure_mode),
        }
    }
}
