//! Image writing module
//!
//! This module encodes 8-bit RGB images as JPEG, PNG or TIFF.

mod standard_image_writer;
pub mod types;
mod writer;

pub use standard_image_writer::StandardImageWriter;
pub use types::{OutputFormat, TiffCompression};
pub use writer::ImageWriter;
