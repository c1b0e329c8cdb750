//! Collects semantic diagnostics and renders them with source context

use crate::logging::Code;
use crate::passes::error::SemanticError;
use crate::utils::{SourceMap, Span};
use crate::{log_error, log_warning};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: Code, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            line: span.start.line,
            column: span.start.column,
            message: message.into(),
        }
    }

    pub fn from_error(error: &SemanticError) -> Self {
        let severity = if error.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        };
        Self::new(severity, error.error_code(), error.span(), error.to_string())
    }

    /// Header line plus the offending source line and a caret, when the
    /// line exists
    pub fn render(&self, source: &SourceMap) -> String {
        let header = format!("{} at line {}: {}", self.severity, self.line, self.message);
        let char_in_line = self.column.saturating_sub(1) as usize;
        match source.caret_context(self.line, char_in_line) {
            Some(context) => format!("{}\n{}", header, context),
            None => header,
        }
    }
}

/// Accumulates every diagnostic of a pass
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: SemanticError) {
        let span: Span = error.span();
        let message = error.to_string();
        if error.is_warning() {
            self.warnings += 1;
            log_warning!(error.error_code(), &message, span = span);
        } else {
            self.errors += 1;
            log_error!(error.error_code(), &message, span = span);
        }
        self.diagnostics.push(Diagnostic::from_error(&error));
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Every diagnostic in report order, separated by newlines
    pub fn render(&self, source: &SourceMap) -> String {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.render(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn renders_caret_under_column() {
        let source = SourceMap::new("item(\"Gear\") {\n    state(\"UP\");\n    state(\"UP\");\n}\n");
        let mut sink = DiagnosticSink::new();
        sink.report(SemanticError::DuplicateState {
            state: "UP".into(),
            item: "Gear".into(),
            span: Span::single(Position::new(40, 3, 11)),
        });

        assert_eq!(sink.error_count(), 1);
        assert_eq!(
            sink.render(&source),
            "error at line 3: Duplicate definition of state 'UP' in item 'Gear'\n    state(\"UP\");\n          ^"
        );
    }

    #[test]
    fn lines_past_the_end_have_no_context() {
        let source = SourceMap::new("one line");
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            code: crate::logging::codes::symbols::TYPE_CONFLICT,
            line: 9,
            column: 1,
            message: "Alias 'x' used as BOOL, previously used as INT".into(),
        };
        assert_eq!(
            diagnostic.render(&source),
            "warning at line 9: Alias 'x' used as BOOL, previously used as INT"
        );
    }
}
