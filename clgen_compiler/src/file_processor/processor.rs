//! File processor implementation with compile-time limits and global logging integration

use crate::config::compile_time::file_processing::{MAX_FILE_SIZE, MAX_LINE_COUNT};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};

/// Expected extension of checklist definition files
pub const SOURCE_EXTENSION: &str = "clg";

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .clg, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    /// Whether the file carries the .clg extension
    pub is_source_file: bool,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// File name without directories, used in generated headers
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Directory containing the input, used as the default output directory
    pub fn parent_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// File processing result containing source and metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// File contents as UTF-8 string
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: std::time::Duration,
}

impl FileProcessingResult {
    /// Wrap in-memory source as if it had been read from `path`
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let path = path.into();
        let source = source.into();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_source_file = extension.as_deref() == Some(SOURCE_EXTENSION);

        Self {
            metadata: FileMetadata {
                size: source.len() as u64,
                line_count: source.lines().count(),
                path,
                extension,
                is_source_file,
            },
            source,
            processing_duration: std::time::Duration::ZERO,
        }
    }

    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    /// Only whitespace
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// Loads checklist sources under compile-time size limits
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    /// Reject files without the .clg extension
    pub require_clg_extension: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_clg_extension: prefs.require_clg_extension,
        }
    }

    pub fn with_extension_required(mut self, required: bool) -> Self {
        self.require_clg_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Process a file and return contents with metadata
    pub fn process_file(&self, file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = std::time::Instant::now();
        let display_path = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display_path.as_str());

        let metadata = self.get_metadata(file_path)?;
        self.validate_file(&metadata)?;
        let source = self.read_file(file_path)?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            let error = FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => display_path.as_str(),
                "lines" => line_count,
                "max_lines" => MAX_LINE_COUNT
            );
            return Err(error);
        }

        let mut final_metadata = metadata;
        final_metadata.line_count = line_count;

        let result = FileProcessingResult {
            source,
            metadata: final_metadata,
            processing_duration: start_time.elapsed(),
        };

        log_success!(
            codes::success::FILE_PROCESSING_SUCCESS,
            "File processed successfully",
            "file" => display_path.as_str(),
            "size" => result.metadata.human_readable_size(),
            "lines" => result.metadata.line_count,
            "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
        );

        Ok(result)
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let path_str = path.display().to_string();
            let error = match e.kind() {
                std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                    path: path_str.clone(),
                },
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: path_str.clone(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to read metadata for '{}': {}", path_str, e),
                },
            };
            log_error!(error.error_code(), "Failed to access input file",
                "path" => path_str.as_str(),
                "io_error" => e
            );
            error
        })?;

        if !metadata.is_file() {
            let path_str = path.display().to_string();
            let error = FileProcessorError::FileNotFound {
                path: path_str.clone(),
            };
            log_error!(error.error_code(), "Path is not a regular file", "path" => path_str.as_str());
            return Err(error);
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_source_file = extension.as_deref() == Some(SOURCE_EXTENSION);

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_source_file,
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        let path_str = metadata.path.display().to_string();

        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => path_str.as_str(),
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE
            );
            return Err(error);
        }

        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile;
            log_error!(error.error_code(), "File is empty", "file" => path_str.as_str());
            return Err(error);
        }

        if self.require_clg_extension && !metadata.is_source_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .clg extension",
                "file" => path_str.as_str(),
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FileProcessorError> {
        let path_str = path.display().to_string();
        let bytes = fs::read(path).map_err(|e| {
            let error = match e.kind() {
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: path_str.clone(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to read file '{}': {}", path_str, e),
                },
            };
            log_error!(error.error_code(), "I/O error reading file",
                "file" => path_str.as_str(),
                "io_error" => e
            );
            error
        })?;

        String::from_utf8(bytes).map_err(|_| {
            let error = FileProcessorError::InvalidEncoding {
                path: path_str.clone(),
            };
            log_error!(error.error_code(), "Invalid UTF-8 encoding in file",
                "file" => path_str.as_str()
            );
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_valid_source() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("aircraft.clg");
        let content = "project(\"Cub\");\nauthor(\"Ops\");\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_source_file);
        assert_eq!(result.metadata.file_name(), "aircraft.clg");
        assert_eq!(result.metadata.parent_dir(), dir.path());
        assert_eq!(result.char_count(), content.chars().count());
    }

    #[test]
    fn missing_file_is_reported() {
        let result = FileProcessor::new().process_file(Path::new("nonexistent.clg"));
        let error = result.unwrap_err();
        assert_matches!(error, FileProcessorError::FileNotFound { .. });
        assert_eq!(error.error_code().as_str(), "E005");
        assert!(error.requires_halt());
    }

    #[test]
    fn extension_is_enforced_only_when_required() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("aircraft.txt");
        fs::write(&file_path, "project(\"Cub\");").unwrap();

        assert!(FileProcessor::new().process_file(&file_path).is_ok());
        assert_matches!(
            FileProcessor::new()
                .with_extension_required(true)
                .process_file(&file_path),
            Err(FileProcessorError::InvalidExtension { .. })
        );
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.clg");
        fs::write(&file_path, "").unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::EmptyFile)
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("binary.clg");
        fs::write(&file_path, [0x66, 0xff, 0xfe, 0x0a]).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn too_many_lines_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("long.clg");
        fs::write(&file_path, "\n".repeat(MAX_LINE_COUNT + 1)).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::TooManyLines { .. })
        );
    }

    #[test]
    fn in_memory_source_carries_metadata() {
        let result = FileProcessingResult::from_source("demo/x.CLG", "a\nb");
        assert!(result.metadata.is_source_file);
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.size, 3);
    }
}
