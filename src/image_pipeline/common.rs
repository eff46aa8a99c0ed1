//! Common utilities module
//!
//! This module contains the error type and the conversion configuration shared
//! across the image pipeline.

pub mod config;
pub mod error;

pub use config::{
    BandSelection, ConversionConfig, ConversionConfigBuilder, DegenerateRange, FailureMode,
    Normalization, RangeStrategy,
};
pub use error::{ConversionError, ErrorKind, Result};
