//! GeoTIFF raster reader implementation using the tiff library.
//!
//! GeoTIFF is plain TIFF with extra georeferencing tags, so the decoder reads
//! it like any other TIFF and the georeferencing tags are left untouched. Only
//! the first image directory is read; overviews are ignored.

use std::io::{Cursor, Read, Seek};

use tiff::decoder::{ChunkType, Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::reader::RasterReader;
use crate::image_pipeline::raster::types::{RasterArray, RasterSamples, RasterShape};

/// TIFF `PlanarConfiguration` value for band-sequential storage.
const PLANAR_SEPARATE: u16 = 2;

/// Raster reader that decodes GeoTIFF (and plain TIFF) files.
///
/// Supports any sample layout the tiff library can decode:
/// - one or more samples per pixel
/// - unsigned, signed and floating point samples from 8 to 64 bits
/// - interleaved (chunky) and band-sequential (planar) storage
pub struct GeoTiffReader;

impl RasterReader for GeoTiffReader {
    /// Decodes a TIFF byte stream into a band-major [`RasterArray`].
    ///
    /// Single-sample images become a 2-D grid, everything else a 3-D band stack.
    /// Half-precision floats are widened to `f32`.
    ///
    /// # Errors
    ///
    /// * `ConversionError::OpenError` - the bytes are not a decodable TIFF, the
    ///   sample format is not supported, or the decoded sample count does not
    ///   match the image dimensions
    fn read_raster(&self, data: &[u8]) -> Result<RasterArray> {
        debug!("Decoding TIFF raster, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| ConversionError::OpenError(format!("not a readable TIFF: {}", e)))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ConversionError::OpenError(format!("failed to get dimensions: {}", e)))?;
        let (width, height) = (width as usize, height as usize);

        let bands = decoder
            .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)
            .map_err(|e| ConversionError::OpenError(format!("bad SamplesPerPixel tag: {}", e)))?
            .unwrap_or(1)
            .max(1) as usize;
        let planar = decoder
            .find_tag_unsigned::<u16>(Tag::PlanarConfiguration)
            .map_err(|e| {
                ConversionError::OpenError(format!("bad PlanarConfiguration tag: {}", e))
            })?
            .unwrap_or(1);

        debug!(
            "Raster header: {}x{}, {} band(s), planar configuration {}",
            width, height, bands, planar
        );

        let shape = if bands == 1 {
            RasterShape::Grid { height, width }
        } else {
            RasterShape::Stack {
                bands,
                height,
                width,
            }
        };

        let samples = if bands > 1 && planar == PLANAR_SEPARATE {
            read_planes(&mut decoder, shape)?
        } else {
            let image = decoder
                .read_image()
                .map_err(|e| ConversionError::OpenError(format!("failed to read image: {}", e)))?;
            into_samples(image)
        };

        if samples.len() != shape.sample_count() {
            return Err(ConversionError::OpenError(format!(
                "decoded {} samples, expected {} for {}x{} with {} band(s)",
                samples.len(),
                shape.sample_count(),
                width,
                height,
                bands
            )));
        }

        // Interleaved pixels are reordered so each band is contiguous.
        let samples = if bands > 1 && planar != PLANAR_SEPARATE {
            samples.gather(&band_major_positions(bands, width * height))
        } else {
            samples
        };

        debug!("Decoded {} raster: {:?}", samples.sample_type(), shape);

        Ok(RasterArray { shape, samples })
    }
}

fn into_samples(result: DecodingResult) -> RasterSamples {
    match result {
        DecodingResult::U8(v) => RasterSamples::U8(v),
        DecodingResult::U16(v) => RasterSamples::U16(v),
        DecodingResult::U32(v) => RasterSamples::U32(v),
        DecodingResult::U64(v) => RasterSamples::U64(v),
        DecodingResult::I8(v) => RasterSamples::I8(v),
        DecodingResult::I16(v) => RasterSamples::I16(v),
        DecodingResult::I32(v) => RasterSamples::I32(v),
        DecodingResult::I64(v) => RasterSamples::I64(v),
        DecodingResult::F16(v) => RasterSamples::F32(v.iter().map(|x| x.to_f32()).collect()),
        DecodingResult::F32(v) => RasterSamples::F32(v),
        DecodingResult::F64(v) => RasterSamples::F64(v),
    }
}

/// Decodes a band-sequential image chunk by chunk.
///
/// `Decoder::read_image` only returns the first plane of such files, so every
/// strip or tile is read on its own and placed into its band. Chunks are
/// numbered plane after plane, row-major within a plane.
fn read_planes<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    shape: RasterShape,
) -> Result<RasterSamples> {
    let (width, height, bands) = (shape.width(), shape.height(), shape.bands());

    let chunk_count = match decoder.get_chunk_type() {
        ChunkType::Strip => decoder.strip_count(),
        ChunkType::Tile => decoder.tile_count(),
    }
    .map_err(|e| ConversionError::OpenError(format!("failed to count chunks: {}", e)))?;
    let chunk_count = chunk_count as usize;

    let (chunk_width, chunk_height) = decoder.chunk_dimensions();
    let (chunk_width, chunk_height) = (chunk_width as usize, chunk_height as usize);
    if chunk_width == 0 || chunk_height == 0 {
        return Err(ConversionError::OpenError(format!(
            "invalid {}x{} chunk size",
            chunk_width, chunk_height
        )));
    }

    let chunks_across = width.div_ceil(chunk_width);
    let chunks_per_plane = chunks_across * height.div_ceil(chunk_height);
    if chunk_count != chunks_per_plane * bands {
        return Err(ConversionError::OpenError(format!(
            "found {} chunks, expected {} per band for {} band(s)",
            chunk_count, chunks_per_plane, bands
        )));
    }

    debug!(
        "Reading {} planar chunk(s) of {}x{}",
        chunk_count, chunk_width, chunk_height
    );

    // positions[i] is where band-major sample i sits in the concatenated chunks
    let mut positions = vec![0usize; shape.sample_count()];
    let mut samples: Option<RasterSamples> = None;
    let mut decoded = 0usize;

    for index in 0..chunk_count {
        let (data_width, data_height) = decoder.chunk_data_dimensions(index as u32);
        let (data_width, data_height) = (data_width as usize, data_height as usize);
        let chunk = into_samples(decoder.read_chunk(index as u32).map_err(|e| {
            ConversionError::OpenError(format!("failed to read chunk {}: {}", index, e))
        })?);

        if chunk.len() != data_width * data_height {
            return Err(ConversionError::OpenError(format!(
                "chunk {} holds {} samples, expected {}",
                index,
                chunk.len(),
                data_width * data_height
            )));
        }

        let band = index / chunks_per_plane;
        let within = index % chunks_per_plane;
        let x0 = (within % chunks_across) * chunk_width;
        let y0 = (within / chunks_across) * chunk_height;

        // Padding rows and columns past the image edge are skipped.
        for row in 0..data_height.min(height.saturating_sub(y0)) {
            let target = band * width * height + (y0 + row) * width + x0;
            for col in 0..data_width.min(width.saturating_sub(x0)) {
                positions[target + col] = decoded + row * data_width + col;
            }
        }
        decoded += chunk.len();

        match samples.as_mut() {
            None => samples = Some(chunk),
            Some(all) => {
                if !all.append(chunk) {
                    return Err(ConversionError::OpenError(format!(
                        "chunk {} changes the sample type",
                        index
                    )));
                }
            }
        }
    }

    Ok(samples
        .map(|all| all.gather(&positions))
        .unwrap_or(RasterSamples::U8(Vec::new())))
}

/// Source positions in an interleaved buffer, listed in band-major order.
fn band_major_positions(bands: usize, pixels: usize) -> Vec<usize> {
    (0..bands)
        .flat_map(|band| (0..pixels).map(move |pixel| pixel * bands + band))
        .collect()
}
