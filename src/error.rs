//! Error types for hline

use thiserror::Error;

/// Result type for hline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed spectrum text input.
///
/// Line numbers are 1-based and count the header line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A field could not be read as a floating point number
    #[error("line {line}, column {column}: '{token}' is not a number")]
    NotNumeric {
        line: usize,
        column: usize,
        token: String,
    },

    /// A data row did not have exactly two fields
    #[error("line {line}: expected 2 columns, found {found}")]
    WrongColumnCount { line: usize, found: usize },
}

/// Failure reported by a [`SampleSource`](crate::acquisition::SampleSource).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    /// The device could not be opened
    #[error("failed to open device: {0}")]
    Open(String),

    /// Center frequency or sample rate was rejected
    #[error("failed to configure device: {0}")]
    Configure(String),

    /// Sample capture failed
    #[error("failed to read samples: {0}")]
    Read(String),

    /// Fewer samples arrived than requested
    #[error("short read: requested {requested} samples, got {received}")]
    ShortRead { requested: usize, received: usize },
}

/// Invalid parameters for analysis, plotting or acquisition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Y-axis bounds are not finite or are reversed
    #[error("invalid y-axis bounds [{min}, {max}]")]
    YBounds { min: f64, max: f64 },

    /// The velocity window mapped to a reversed index range
    #[error("velocity window maps to inverted index range {min_index}..{max_index}")]
    InvertedWindow { min_index: usize, max_index: usize },

    /// The velocity window mapped to zero samples
    #[error("velocity window contains no samples (index {index})")]
    EmptyWindow { index: usize },

    /// No samples were supplied
    #[error("spectrum is empty")]
    EmptySpectrum,

    /// Frequency and intensity sequences differ in length
    #[error("frequency axis has {frequencies} values but intensity has {intensities}")]
    LengthMismatch {
        frequencies: usize,
        intensities: usize,
    },

    /// Acquisition parameters out of range
    #[error("invalid acquisition setting: {0}")]
    Acquisition(String),
}

/// Errors that can occur when using hline
#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration file could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
