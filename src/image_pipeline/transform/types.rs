//! Intermediate buffers between the raster and the encoded image

use crate::image_pipeline::raster::RasterSamples;

/// Bands chosen for output, interleaved row-major with a trailing channel axis (HWC)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedBands {
    pub width: usize,
    pub height: usize,
    /// 1 for grayscale, 3 for RGB
    pub channels: usize,
    pub samples: RasterSamples,
}

/// 8-bit pixels ready to become an image, same layout as [`SelectedBands`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
    /// Whether the values were linearly rescaled
    pub rescaled: bool,
}
