//! Per-file event collection

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

/// The input currently being compiled on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
    pub average_file_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe store of events keyed by input file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a file, capped per file with a single overflow marker
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn file_has_errors(&self, file_path: &Path) -> bool {
        !self.get_file_errors(file_path).is_empty()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            total_files: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        let mut total_file_time = Duration::new(0, 0);
        let mut file_count_with_timing = 0u32;

        for (file_path, file_events) in events.iter() {
            let has_errors = file_events.iter().any(|e| e.is_error());
            let has_warnings = file_events.iter().any(|e| e.is_warning());

            if has_errors {
                summary.failed_files += 1;
            } else if has_warnings {
                summary.files_with_warnings += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += file_events.iter().filter(|e| e.is_error()).count();
            summary.total_warnings += file_events.iter().filter(|e| e.is_warning()).count();

            if let Some(context) = contexts.get(file_path) {
                total_file_time += context.elapsed();
                file_count_with_timing += 1;
            }
        }

        if file_count_with_timing > 0 {
            summary.average_file_time = total_file_time / file_count_with_timing;
        }

        summary
    }

    pub fn clear(&self) {
        lock(&self.file_events).clear();
        lock(&self.file_contexts).clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_summary_classifies_files() {
        let collector = ErrorCollector::new();
        let broken = PathBuf::from("broken.clg");
        let noisy = PathBuf::from("noisy.clg");

        collector.record_event(
            &broken,
            LogEvent::error(codes::semantic::DUPLICATE_ITEM, "Duplicate definition of item 'Gear'"),
        );
        collector.record_event(
            &noisy,
            LogEvent::warning_with_code(codes::usage::UNUSED_ITEM, "item 'Gear' is not used"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert!(summary.has_errors());
        assert!(collector.file_has_errors(&broken));
        assert!(!collector.file_has_errors(&noisy));
    }

    #[test]
    fn test_per_file_cap_adds_one_marker() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("big.clg");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(&path, LogEvent::info("event"));
        }

        let events = collector.get_file_events(&path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events
            .last()
            .map(|e| e.message.starts_with("Too many events"))
            .unwrap_or(false));
    }
}
