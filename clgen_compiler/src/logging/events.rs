//! Log events emitted by the compiler stages

use super::codes::Code;
use crate::utils::Span;
use std::collections::HashMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single logged occurrence with optional source location
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    fn build(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: truncate_message(message),
            span: None,
            context: HashMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Error, error_code, message)
    }

    /// Warning without a registered code
    pub fn warning(message: &str) -> Self {
        Self::build(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Warning, warning_code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::build(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event carrying a success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::build(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn requires_halt(&self) -> bool {
        super::codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        super::codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        super::codes::get_action(self.code.as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        super::codes::is_recoverable(self.code.as_str())
    }

    /// Single line rendering: `[LEVEL] CODE - message at line:column`
    pub fn format(&self) -> String {
        let span_str = self
            .span
            .as_ref()
            .map(|s| format!(" at {}:{}", s.start().line, s.start().column))
            .unwrap_or_default();

        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            span_str
        )
    }

    pub fn format_detailed(&self) -> String {
        let mut output = self.format();

        output.push_str(&format!("\n  Category: {}", self.category()));
        output.push_str(&format!("\n  Severity: {}", self.severity()));

        if self.is_error() {
            output.push_str(&format!("\n  Recoverable: {}", self.is_recoverable()));
            output.push_str(&format!("\n  Requires halt: {}", self.requires_halt()));
        }

        let description = self.description();
        if description != "Unknown error" {
            output.push_str(&format!("\n  Description: {}", description));
        }

        let action = self.recommended_action();
        if action != "No specific action available" {
            output.push_str(&format!("\n  Recommended action: {}", action));
        }

        if !self.context.is_empty() {
            output.push_str("\n  Context:");
            let mut keys: Vec<_> = self.context.keys().collect();
            keys.sort();
            for key in keys {
                output.push_str(&format!("\n    {}: {}", key, self.context[key]));
            }
        }

        output
    }

    /// JSON rendering for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp = self
            .timestamp
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut json = serde_json::json!({
            "timestamp": timestamp,
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": self.is_recoverable(),
                "requires_halt": self.requires_halt(),
                "description": self.description(),
                "recommended_action": self.recommended_action(),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "start_line": span.start().line,
                "start_column": span.start().column,
                "end_line": span.end().line,
                "end_column": span.end().column,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

fn truncate_message(message: &str) -> String {
    let limit = super::config::get_max_log_message_length();
    if message.chars().count() <= limit {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(
            codes::semantic::DUPLICATE_ITEM,
            "Duplicate definition of item 'Flaps'",
        );

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E100");
        assert_eq!(event.category(), "Semantic");
        assert!(!event.requires_halt());
    }

    #[test]
    fn test_warning_codes() {
        let generic = LogEvent::warning("Generic warning");
        assert_eq!(generic.code.as_str(), "W000");

        let unused = LogEvent::warning_with_code(
            codes::usage::UNUSED_ITEM,
            "item 'Flaps' is not used in any checklist",
        );
        assert!(unused.is_warning());
        assert_eq!(unused.category(), "Usage");
    }

    #[test]
    fn test_event_formatting_includes_position() {
        let start = Position::new(14, 3, 9);
        let end = Position::new(19, 3, 14);
        let event = LogEvent::error(codes::symbols::UNDEFINED_ALIAS, "Alias 'flap' is not defined")
            .with_span(Span::new(start, end));

        assert_eq!(
            event.format(),
            "[ERROR] E092 - Alias 'flap' is not defined at 3:9"
        );
    }

    #[test]
    fn test_detailed_format_sorts_context() {
        let event = LogEvent::error(codes::semantic::UNDEFINED_STATE, "State 'UP' is not defined")
            .with_context("item", "Flaps")
            .with_context("checklist", "Before Takeoff");
        let detailed = event.format_detailed();

        let checklist = detailed.find("checklist: Before Takeoff").unwrap();
        let item = detailed.find("item: Flaps").unwrap();
        assert!(checklist < item);
        assert!(detailed.contains("Recommended action:"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::backend::OUTPUT_WRITE_FAILED, "Failed to write output file")
            .with_context("path", "out/checklists.xml");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], "E150");
        assert_eq!(value["context"]["path"], "out/checklists.xml");
        assert_eq!(value["error_metadata"]["requires_halt"], true);
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let limit = crate::logging::config::get_max_log_message_length();
        let message = "x".repeat(limit + 10);
        let event = LogEvent::info(&message);
        assert_eq!(event.message.chars().count(), limit + 3);
        assert!(event.message.ends_with("..."));
    }
}
