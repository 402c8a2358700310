use std::path::{Path, PathBuf};

use crate::builder::DecodeFailure;

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("QR encoder rejected payload '{payload}': {source}")]
    Encode {
        payload: String,
        #[source]
        source: qrcode::types::QrError,
    },

    #[error("failed to render PNG: {0}")]
    Render(#[source] image::ImageError),

    #[error("could not decode '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeFailure,
    },

    #[error("identifier prefix '{0}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidPrefix(String),

    #[error("invalid sequence range: first ({first}) is greater than last ({last})")]
    InvalidRange { first: u64, last: u64 },

    #[error("label sheet: {0}")]
    Sheet(String),
}

impl GenerateError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(path: impl AsRef<Path>, source: DecodeFailure) -> Self {
        GenerateError::Decode {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
