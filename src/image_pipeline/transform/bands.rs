use tracing::debug;

use crate::image_pipeline::common::config::BandSelection;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::{RasterArray, RasterShape};
use crate::image_pipeline::transform::types::SelectedBands;

/// Picks the bands that feed the output channels and reorders them to HWC.
///
/// With [`BandSelection::FirstThree`] a band stack must hold at least three
/// bands; anything after the third is dropped. A single-band grid stays
/// grayscale.
pub fn select_bands(raster: &RasterArray, selection: BandSelection) -> Result<SelectedBands> {
    let shape = raster.shape;
    let bands = shape.bands();

    let chosen: Vec<usize> = match (shape, selection) {
        (RasterShape::Grid { .. }, BandSelection::FirstThree) => vec![0],
        (RasterShape::Stack { .. }, BandSelection::FirstThree) if bands >= 3 => {
            if bands > 3 {
                debug!("Dropping {} band(s) beyond the first three", bands - 3);
            }
            vec![0, 1, 2]
        }
        (_, BandSelection::Indices(indices)) if indices.iter().all(|&i| i < bands) => {
            indices.to_vec()
        }
        (_, BandSelection::Single(index)) if index < bands => vec![index],
        _ => return Err(unsupported(shape, selection)),
    };

    let pixels = shape.height() * shape.width();
    let chosen_bands = &chosen;
    let positions: Vec<usize> = (0..pixels)
        .flat_map(move |pixel| chosen_bands.iter().map(move |&band| band * pixels + pixel))
        .collect();

    debug!("Selected bands {:?} of {}", chosen, bands);

    Ok(SelectedBands {
        width: shape.width(),
        height: shape.height(),
        channels: chosen.len(),
        samples: raster.samples.gather(&positions),
    })
}

fn unsupported(shape: RasterShape, selection: BandSelection) -> ConversionError {
    let detail = match selection {
        BandSelection::FirstThree => String::new(),
        BandSelection::Indices(indices) => format!(", requested bands {:?}", indices),
        BandSelection::Single(index) => format!(", requested band {}", index),
    };
    ConversionError::UnsupportedBandConfigError(format!(
        "{}-D array with {} band(s){}",
        shape.ndim(),
        shape.bands(),
        detail
    ))
}
