//! Error types for ipc-footprinter.
//!
//! Generation errors are surfaced immediately to the caller. Nothing is
//! silently defaulted except the pitch-based lead width.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an IPC name into a land pattern.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    /// The identifier does not match any supported IPC-7351 pattern.
    #[error("unrecognised IPC package name: {name}")]
    Parse {
        /// The identifier as supplied.
        name: String,
    },

    /// Invalid generator configuration (unknown density level, bad override).
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The dimensions describe a package variant the generators cannot draw.
    #[error("unsupported package shape: {message}")]
    UnsupportedShape {
        /// Description of the unsupported variant.
        message: String,
    },
}

impl FootprintError {
    /// Creates a parse error.
    pub fn parse(name: impl Into<String>) -> Self {
        Self::Parse { name: name.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unsupported shape error.
    pub fn unsupported_shape(message: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            message: message.into(),
        }
    }
}

/// Problems with the optional JSON configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadError {
        /// Configuration file path.
        path: PathBuf,
        /// Operating system error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or has unknown keys.
    #[error("{}: {source}", path.display())]
    ParseError {
        /// Configuration file path.
        path: PathBuf,
        /// Includes line and column.
        #[source]
        source: serde_json::Error,
    },

    /// `--config` named a file that does not exist.
    #[error("no configuration file at {}", path.display())]
    NotFound {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// A value parsed but is out of range, such as a density letter or scale.
    #[error("bad configuration value: {message}")]
    ValidationError {
        /// What is wrong with which key.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}
