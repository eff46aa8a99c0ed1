//! Raster pixel array types

use std::fmt;

/// Numeric type of the samples stored in a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::U32 => "uint32",
            SampleType::U64 => "uint64",
            SampleType::I8 => "int8",
            SampleType::I16 => "int16",
            SampleType::I32 => "int32",
            SampleType::I64 => "int64",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// Flat sample storage, one variant per supported numeric type
#[derive(Debug, Clone, PartialEq)]
pub enum RasterSamples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

fn gather<T: Copy>(values: &[T], positions: &[usize]) -> Vec<T> {
    positions.iter().map(|&p| values[p]).collect()
}

impl RasterSamples {
    pub fn len(&self) -> usize {
        match self {
            RasterSamples::U8(v) => v.len(),
            RasterSamples::U16(v) => v.len(),
            RasterSamples::U32(v) => v.len(),
            RasterSamples::U64(v) => v.len(),
            RasterSamples::I8(v) => v.len(),
            RasterSamples::I16(v) => v.len(),
            RasterSamples::I32(v) => v.len(),
            RasterSamples::I64(v) => v.len(),
            RasterSamples::F32(v) => v.len(),
            RasterSamples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            RasterSamples::U8(_) => SampleType::U8,
            RasterSamples::U16(_) => SampleType::U16,
            RasterSamples::U32(_) => SampleType::U32,
            RasterSamples::U64(_) => SampleType::U64,
            RasterSamples::I8(_) => SampleType::I8,
            RasterSamples::I16(_) => SampleType::I16,
            RasterSamples::I32(_) => SampleType::I32,
            RasterSamples::I64(_) => SampleType::I64,
            RasterSamples::F32(_) => SampleType::F32,
            RasterSamples::F64(_) => SampleType::F64,
        }
    }

    /// Builds a new sample buffer from the samples at `positions`, in that order.
    ///
    /// Every position must be in bounds.
    pub fn gather(&self, positions: &[usize]) -> RasterSamples {
        match self {
            RasterSamples::U8(v) => RasterSamples::U8(gather(v, positions)),
            RasterSamples::U16(v) => RasterSamples::U16(gather(v, positions)),
            RasterSamples::U32(v) => RasterSamples::U32(gather(v, positions)),
            RasterSamples::U64(v) => RasterSamples::U64(gather(v, positions)),
            RasterSamples::I8(v) => RasterSamples::I8(gather(v, positions)),
            RasterSamples::I16(v) => RasterSamples::I16(gather(v, positions)),
            RasterSamples::I32(v) => RasterSamples::I32(gather(v, positions)),
            RasterSamples::I64(v) => RasterSamples::I64(gather(v, positions)),
            RasterSamples::F32(v) => RasterSamples::F32(gather(v, positions)),
            RasterSamples::F64(v) => RasterSamples::F64(gather(v, positions)),
        }
    }

    /// Appends `other` to the end of this buffer.
    ///
    /// Returns `false`, leaving `self` untouched, when the sample types differ.
    pub fn append(&mut self, other: RasterSamples) -> bool {
        match (self, other) {
            (RasterSamples::U8(a), RasterSamples::U8(b)) => a.extend(b),
            (RasterSamples::U16(a), RasterSamples::U16(b)) => a.extend(b),
            (RasterSamples::U32(a), RasterSamples::U32(b)) => a.extend(b),
            (RasterSamples::U64(a), RasterSamples::U64(b)) => a.extend(b),
            (RasterSamples::I8(a), RasterSamples::I8(b)) => a.extend(b),
            (RasterSamples::I16(a), RasterSamples::I16(b)) => a.extend(b),
            (RasterSamples::I32(a), RasterSamples::I32(b)) => a.extend(b),
            (RasterSamples::I64(a), RasterSamples::I64(b)) => a.extend(b),
            (RasterSamples::F32(a), RasterSamples::F32(b)) => a.extend(b),
            (RasterSamples::F64(a), RasterSamples::F64(b)) => a.extend(b),
            _ => return false,
        }
        true
    }

    /// Widens every sample to `f64` for rescaling.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            RasterSamples::U8(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::U16(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::U32(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::U64(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::I8(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::I16(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::I32(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::I64(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::F32(v) => v.iter().map(|&x| x as f64).collect(),
            RasterSamples::F64(v) => v.clone(),
        }
    }
}

/// Shape of a pixel array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterShape {
    /// Single band, (height, width)
    Grid { height: usize, width: usize },
    /// Several bands, (bands, height, width)
    Stack {
        bands: usize,
        height: usize,
        width: usize,
    },
}

impl RasterShape {
    pub fn height(&self) -> usize {
        match *self {
            RasterShape::Grid { height, .. } | RasterShape::Stack { height, .. } => height,
        }
    }

    pub fn width(&self) -> usize {
        match *self {
            RasterShape::Grid { width, .. } | RasterShape::Stack { width, .. } => width,
        }
    }

    pub fn bands(&self) -> usize {
        match *self {
            RasterShape::Grid { .. } => 1,
            RasterShape::Stack { bands, .. } => bands,
        }
    }

    /// Number of array dimensions (2 or 3)
    pub fn ndim(&self) -> usize {
        match self {
            RasterShape::Grid { .. } => 2,
            RasterShape::Stack { .. } => 3,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.bands() * self.height() * self.width()
    }
}

/// In-memory raster pixels, stored band-major: band, then row, then column
#[derive(Debug, Clone, PartialEq)]
pub struct RasterArray {
    pub shape: RasterShape,
    pub samples: RasterSamples,
}

impl RasterArray {
    /// Returns `None` when the sample count does not match the shape.
    pub fn new(shape: RasterShape, samples: RasterSamples) -> Option<Self> {
        if shape.sample_count() != samples.len() {
            return None;
        }
        Some(Self { shape, samples })
    }

    pub fn sample_type(&self) -> SampleType {
        self.samples.sample_type()
    }
}
