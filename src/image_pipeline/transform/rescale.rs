use tracing::{debug, warn};

use crate::image_pipeline::common::config::{
    ConversionConfig, DegenerateRange, Normalization, RangeStrategy,
};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::{RasterSamples, SampleType};
use crate::image_pipeline::transform::types::{NormalizedImage, SelectedBands};

/// Converts the selected bands to 8-bit samples.
///
/// Rescaling maps `[min, max]` linearly onto `[0, 255]`:
/// `round(255 * (v - min) / (max - min))`. Non-finite samples are left out of
/// the range; NaN becomes 0 and infinities saturate.
pub fn normalize(selected: SelectedBands, config: &ConversionConfig) -> Result<NormalizedImage> {
    let rescale = match config.normalization {
        Normalization::Auto => selected.samples.sample_type() != SampleType::U8,
        Normalization::Always => true,
        Normalization::Off => false,
    };

    let data = match (&selected.samples, rescale) {
        (RasterSamples::U8(values), false) => values.clone(),
        (samples, false) => samples.to_f64().into_iter().map(saturate).collect(),
        (samples, true) => rescale_samples(
            samples.to_f64(),
            selected.channels,
            config.range_strategy,
            config.degenerate_range,
        )?,
    };

    Ok(NormalizedImage {
        width: selected.width,
        height: selected.height,
        channels: selected.channels,
        data,
        rescaled: rescale,
    })
}

fn rescale_samples(
    values: Vec<f64>,
    channels: usize,
    strategy: RangeStrategy,
    degenerate: DegenerateRange,
) -> Result<Vec<u8>> {
    let ranges: Vec<(f64, f64)> = match strategy {
        RangeStrategy::Global => vec![finite_range(values.iter().copied())?],
        RangeStrategy::PerBand => (0..channels)
            .map(|channel| finite_range(values.iter().skip(channel).step_by(channels).copied()))
            .collect::<Result<_>>()?,
    };

    for &(min, max) in &ranges {
        debug!("Rescaling range [{}, {}] to [0, 255]", min, max);
        if min == max {
            match degenerate {
                DegenerateRange::Fail => {
                    return Err(ConversionError::NormalizationError(format!(
                        "constant raster, every sample equals {}",
                        min
                    )));
                }
                DegenerateRange::Zero => warn!("Constant raster ({}), output is all zeros", min),
                DegenerateRange::Clamp => {
                    warn!("Constant raster ({}), saturating without rescale", min)
                }
            }
        }
    }

    let data = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let (min, max) = match strategy {
                RangeStrategy::Global => ranges[0],
                RangeStrategy::PerBand => ranges[i % channels],
            };
            if min == max {
                return match degenerate {
                    DegenerateRange::Clamp => saturate(value),
                    _ => 0,
                };
            }
            scale(value, min, max)
        })
        .collect();

    Ok(data)
}

/// Minimum and maximum over the finite values.
fn finite_range(values: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
        .ok_or_else(|| {
            ConversionError::NormalizationError("no finite samples to rescale".to_string())
        })
}

fn scale(value: f64, min: f64, max: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (255.0 * (value - min) / (max - min)).round().clamp(0.0, 255.0) as u8
}

fn saturate(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
