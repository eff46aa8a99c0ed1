//! Image processing pipeline module
//!
//! This module provides a structured approach to raster to image conversion,
//! with separate modules for raster reading, band selection and normalization,
//! image writing, and conversion orchestration.

pub mod common;
pub mod conversions;
pub mod output;
pub mod raster;
pub mod transform;

pub use common::{
    BandSelection, ConversionConfig, ConversionConfigBuilder, ConversionError, DegenerateRange,
    ErrorKind, FailureMode, Normalization, RangeStrategy, Result,
};

pub use raster::{GeoTiffReader, RasterArray, RasterReader, RasterSamples, RasterShape, SampleType};

pub use output::{ImageWriter, OutputFormat, StandardImageWriter, TiffCompression};

pub use conversions::{ConversionReport, RasterToImagePipeline, convert};
