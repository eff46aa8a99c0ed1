use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to open raster: {0}")]
    OpenError(String),

    #[error("Unsupported number of bands or dimensions: {0}")]
    UnsupportedBandConfigError(String),

    #[error("Failed to normalize pixel values: {0}")]
    NormalizationError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse failure category of a [`ConversionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be opened or decoded as a raster.
    Open,
    /// The pixel array shape does not fit the band selection policy.
    UnsupportedBandConfig,
    /// The value range could not be rescaled to 8 bits.
    Normalization,
    /// The image could not be encoded or the output could not be written.
    EncodeOrWrite,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::OpenError(_) => ErrorKind::Open,
            ConversionError::UnsupportedBandConfigError(_) => ErrorKind::UnsupportedBandConfig,
            // A zero-sized grid is a raster that cannot be used, not an encoder fault.
            ConversionError::InvalidDimensions(_, _) => ErrorKind::Open,
            ConversionError::NormalizationError(_) => ErrorKind::Normalization,
            ConversionError::EncodeError(_)
            | ConversionError::OutputWriteError(_)
            | ConversionError::UnsupportedFormat(_)
            | ConversionError::IoError(_) => ErrorKind::EncodeOrWrite,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
