//! Pixel transformation module
//!
//! Band selection and 8-bit normalization between the raster reader and the
//! image writer.

mod bands;
mod rescale;
pub mod types;

pub use bands::select_bands;
pub use rescale::normalize;
pub use types::{NormalizedImage, SelectedBands};
