//! Error type shared by the operators and the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding, transforming or persisting a grid.
#[derive(Error, Debug)]
pub enum Error {
    /// File has an unrecognized extension or could not be decoded.
    #[error("unsupported or undecodable image {path}: {detail}")]
    Format {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        detail: String,
    },

    /// A filter window or noise parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as exposed in the configuration.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Grid is empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Writing an artifact or preparing a directory failed.
    #[error("I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
