use crate::ast::TreeStatistics;
use crate::file_processor::FileMetadata;
use crate::logging::codes;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a successful generation run
#[derive(Debug)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub statistics: TreeStatistics,
    pub item_count: usize,
    pub symbol_count: usize,
    pub warning_count: usize,
    /// Rendered warnings in report order
    pub warnings: Vec<String>,
    /// Every file written, in backend order
    pub written: Vec<PathBuf>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn summary(&self) -> String {
        summary_line(0, self.warning_count)
    }

    pub fn log_success(&self) {
        crate::log_success!(
            codes::success::GENERATION_COMPLETE,
            "Checklist generation succeeded",
            "file" => self.file_metadata.path.display(),
            "checklists" => self.statistics.checklists,
            "checks" => self.statistics.checks,
            "items" => self.item_count,
            "warnings" => self.warning_count,
            "files_written" => self.written.len(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Final line printed after a run
pub fn summary_line(errors: usize, warnings: usize) -> String {
    if errors > 0 {
        format!("Generation failed with {}.", plural(errors, "error"))
    } else if warnings > 0 {
        format!("Generation complete with {}.", plural(warnings, "warning"))
    } else {
        "Generation complete.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lines_are_pluralized() {
        assert_eq!(summary_line(1, 0), "Generation failed with 1 error.");
        assert_eq!(summary_line(3, 2), "Generation failed with 3 errors.");
        assert_eq!(summary_line(0, 1), "Generation complete with 1 warning.");
        assert_eq!(summary_line(0, 2), "Generation complete with 2 warnings.");
        assert_eq!(summary_line(0, 0), "Generation complete.");
    }
}
