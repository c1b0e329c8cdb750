//! Errors while turning generated markup back into source

use crate::logging::{codes, Code};
use std::path::{Path, PathBuf};

pub type ReverseResult<T> = Result<T, ReverseError>;

#[derive(Debug, thiserror::Error)]
pub enum ReverseError {
    #[error("Malformed markup in {} at line {line}: {message}", path.display())]
    MalformedMarkup {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Checklist '{include}' included from {} does not exist", wrapper.display())]
    MissingInclude { wrapper: PathBuf, include: String },

    #[error("Unexpected element <{name}> in {}, expected {expected}", path.display())]
    UnexpectedElement {
        path: PathBuf,
        name: String,
        expected: &'static str,
    },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReverseError {
    pub fn malformed(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::MalformedMarkup {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub fn unexpected(path: &Path, name: &str, expected: &'static str) -> Self {
        Self::UnexpectedElement {
            path: path.to_path_buf(),
            name: name.to_string(),
            expected,
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::MalformedMarkup { .. } => codes::reverse::MALFORMED_MARKUP,
            Self::MissingInclude { .. } => codes::reverse::MISSING_INCLUDE,
            Self::UnexpectedElement { .. } => codes::reverse::UNEXPECTED_ELEMENT,
            Self::Io { .. } => codes::file_processing::IO_ERROR,
        }
    }
}
