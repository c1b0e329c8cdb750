//! Logging service and logger backends

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level-filtering front end over a [`Logger`]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
    buffer: Option<Arc<MemoryLogger>>,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self {
            logger,
            min_level,
            buffer: None,
        }
    }

    /// Service wired from the runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let mut multi = MultiLogger::new(min_level);

        if config::use_console_logging() {
            multi = if config::use_structured_logging() {
                multi.with_structured_console(min_level)
            } else {
                multi.with_console(min_level)
            };
        }
        let (multi, memory) = multi.with_memory();

        Self {
            logger: Arc::new(multi),
            min_level,
            buffer: Some(memory),
        }
    }

    /// Events retained by the in-memory buffer, if this service has one
    pub fn buffered_events(&self) -> Vec<LogEvent> {
        self.buffer
            .as_ref()
            .map(|memory| memory.get_events())
            .unwrap_or_default()
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_error_with_context(
        &self,
        error_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::error(error_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_warning_with_code(&self, warning_code: Code, message: &str) {
        self.log_event(LogEvent::warning_with_code(warning_code, message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Human readable lines on stdout, errors on stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.level {
                LogLevel::Error => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            }
        }
    }
}

/// One JSON object per event
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// In-memory event buffer, capped at the configured buffer size
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn events(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events().clone()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.is_error())
            .cloned()
            .collect()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.events()
            .iter()
            .any(|e| e.is_error() && e.code == code)
    }

    pub fn has_warning_with_code(&self, code: Code) -> bool {
        self.events()
            .iter()
            .any(|e| e.is_warning() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.events().iter().any(|e| e.is_info() && e.code == code)
    }

    pub fn get_events_by_category(&self, category: &str) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.category() == category)
            .cloned()
            .collect()
    }

    pub fn get_summary(&self) -> EventSummary {
        let events = self.events();
        EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.events();

        let max_events = config::get_error_buffer_size();
        if events.len() >= max_events {
            let remove_count = events.len() - max_events + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Counts of buffered events by level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

/// Fan-out to several loggers
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl MultiLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            loggers: Vec::new(),
            min_level,
        }
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn with_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(console_level)));
        self
    }

    pub fn with_structured_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(StructuredLogger::new(console_level)));
        self
    }

    pub fn with_memory(mut self) -> (Self, Arc<MemoryLogger>) {
        let memory_logger = Arc::new(MemoryLogger::new());
        self.add_logger(memory_logger.clone());
        (self, memory_logger)
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            for logger in &self.loggers {
                logger.log(event);
            }
        }
    }
}

/// Logging service based on the current runtime preferences
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_tracks_levels() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Parsing checklists.clg"));
        logger.log(&LogEvent::error(
            codes::semantic::UNDEFINED_ITEM,
            "Undefined item 'Flaps' in checklist 'Landing'",
        ));
        logger.log(&LogEvent::warning_with_code(
            codes::usage::UNUSED_STATE,
            "state 'DOWN' in item 'Gear' is not used",
        ));

        assert_eq!(logger.event_count(), 3);
        assert!(logger.has_error_with_code(codes::semantic::UNDEFINED_ITEM));
        assert!(logger.has_warning_with_code(codes::usage::UNUSED_STATE));
        assert!(!logger.has_error_with_code(codes::usage::UNUSED_STATE));

        let summary = logger.get_summary();
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.info_count, 1);
        assert!(summary.has_errors());

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let multi = MultiLogger::new(LogLevel::Debug);
        let (multi, first) = multi.with_memory();
        let (multi, second) = multi.with_memory();

        multi.log(&LogEvent::success(
            codes::success::OUTPUT_WRITTEN,
            "Wrote checklists.xml",
        ));

        assert!(first.has_success_with_code(codes::success::OUTPUT_WRITTEN));
        assert_eq!(second.event_count(), 1);
    }

    #[test]
    fn test_service_filters_by_level() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Warning);

        service.log_debug("walking parse tree");
        service.log_info("item pass started");
        service.log_warning_with_code(codes::symbols::TYPE_CONFLICT, "Type conflict");
        service.log_error(codes::semantic::DUPLICATE_CHECKLIST, "Duplicate checklist");

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_warnings().len(), 1);
        assert_eq!(logger.get_events_by_category("Semantic").len(), 1);
    }

    #[test]
    fn test_configured_service_buffers_events() {
        let service = create_configured_service();
        service.log_error(codes::backend::OUTPUT_WRITE_FAILED, "Failed to write output file");

        assert!(service
            .buffered_events()
            .iter()
            .any(|e| e.code == codes::backend::OUTPUT_WRITE_FAILED));
    }

    #[test]
    fn test_error_context_is_attached() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_error_with_context(
            codes::semantic::UNDEFINED_STATE,
            "State 'UP' is not defined for item 'Flaps'",
            vec![("item", "Flaps"), ("state", "UP")],
        );

        let errors = logger.get_errors();
        assert_eq!(errors[0].context.get("state").map(String::as_str), Some("UP"));
    }
}
