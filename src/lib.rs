//! Converts GeoTIFF rasters into viewable 8-bit RGB images (JPEG, PNG or TIFF).

pub mod image_pipeline;
pub mod logger;

pub use image_pipeline::convert;
