//! Raster reading module
//!
//! This module turns geospatial raster files into in-memory pixel arrays.

mod geotiff_reader;
mod reader;
pub mod types;

pub use geotiff_reader::GeoTiffReader;
pub use reader::RasterReader;
pub use types::{RasterArray, RasterSamples, RasterShape, SampleType};
