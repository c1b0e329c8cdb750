//! File processor module with compile-time limits and global logging integration

mod processor;

use crate::config::runtime::FileProcessorPreferences;
use std::path::Path;

pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, SOURCE_EXTENSION,
};

/// Process a file with default settings
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

/// Create a file processor from runtime preferences
pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Get the compile-time maximum file size limit
pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn module_api_reads_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.clg");
        fs::write(&file_path, "project(\"Test\");\n").unwrap();

        assert!(process_file(&file_path).is_ok());
    }

    #[test]
    fn preferences_carry_extension_requirement() {
        let prefs = FileProcessorPreferences {
            require_clg_extension: true,
        };
        assert!(create_processor_from_preferences(&prefs).require_clg_extension);
        assert!(get_max_file_size() > 0);
    }
}
