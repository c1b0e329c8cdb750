//! Output generation errors

use crate::logging::{codes, Code};
use std::path::{Path, PathBuf};

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to write output file: {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed output document: {message}")]
    MalformedDocument { message: String },

    #[error("Unknown backend '{name}' (expected one of xml, dot, document, clist)")]
    UnknownBackend { name: String },
}

impl BackendError {
    pub fn write_failed(path: &Path, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::WriteFailed { .. } => codes::backend::OUTPUT_WRITE_FAILED,
            Self::MalformedDocument { .. } => codes::system::INTERNAL_ERROR,
            Self::UnknownBackend { .. } => codes::backend::UNKNOWN_BACKEND,
        }
    }
}
