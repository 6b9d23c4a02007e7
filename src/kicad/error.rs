//! Error types for KiCad file operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Largest preview image, in pixels, that will be allocated.
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 24;

/// Result type for KiCad file operations.
pub type KicadResult<T> = Result<T, KicadError>;

/// Errors that can occur while reading or writing footprint files.
#[derive(Debug, Error)]
pub enum KicadError {
    /// Failed to open or read the file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Malformed record in a legacy module file.
    #[error("Parse error at line {line}: {message}")]
    ParseError {
        /// 1-based line number.
        line: usize,
        /// Description of what's wrong.
        message: String,
    },

    /// Failed to encode or save a preview image.
    #[error("Failed to save image: {path}")]
    Image {
        /// Path to the image.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// A JSON package dump could not be decoded.
    #[error("Invalid package JSON in {path}")]
    Json {
        /// Path to the file.
        path: PathBuf,
        /// Underlying decoder error, with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The preview would need more pixels than [`MAX_PREVIEW_PIXELS`].
    #[error("Preview of {width:.0}x{height:.0} pixels exceeds the limit of {MAX_PREVIEW_PIXELS} pixels")]
    ImageTooLarge {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
    },

    /// Nothing to draw.
    #[error("Empty footprint: {message}")]
    Empty {
        /// Description of what is missing.
        message: String,
    },
}

impl KicadError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Creates an image error.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    /// Creates a JSON decode error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Creates an empty footprint error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::Empty {
            message: message.into(),
        }
    }
}
