//! Pipeline conversions module
//!
//! This module contains orchestration logic for raster to image conversion.

mod raster_to_image;

#[cfg(test)]
mod tests;

pub use raster_to_image::{ConversionReport, RasterToImagePipeline, convert};
