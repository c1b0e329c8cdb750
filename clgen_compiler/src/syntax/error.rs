//! Syntax errors with span-accurate reporting

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, Code};
use crate::tokens::TokenStreamError;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("nesting exceeds maximum depth of {max_depth}")]
    MaxRecursionDepth { max_depth: usize, span: Span },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, span: Span) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span,
        }
    }

    pub fn max_recursion_depth(span: Span) -> Self {
        Self::MaxRecursionDepth {
            max_depth: MAX_PARSE_DEPTH,
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_EOF,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::MaxRecursionDepth { span, .. } => *span,
        }
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

impl From<TokenStreamError> for SyntaxError {
    fn from(error: TokenStreamError) -> Self {
        match error {
            TokenStreamError::UnexpectedToken {
                expected,
                found,
                span,
            } => Self::UnexpectedToken {
                expected: format!("'{}'", expected),
                found,
                span,
            },
            TokenStreamError::UnexpectedEndOfStream { expected, span } => {
                Self::UnexpectedEndOfInput {
                    expected: format!("'{}'", expected),
                    span,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn codes_follow_variants() {
        let span = Span::single(Position::start());
        assert_eq!(
            SyntaxError::unexpected_token("';'", "}", span).error_code().as_str(),
            "E050"
        );
        assert_eq!(
            SyntaxError::unexpected_end_of_input("'}'", span).error_code().as_str(),
            "E040"
        );
        assert_eq!(
            SyntaxError::max_recursion_depth(span).error_code().as_str(),
            "E087"
        );
    }

    #[test]
    fn messages_name_expected_and_found() {
        let span = Span::single(Position::new(4, 1, 5));
        let error = SyntaxError::unexpected_token("';'", "}", span);
        assert_eq!(error.to_string(), "expected ';', found '}'");
        assert_eq!(error.span().start.column, 5);
    }

    #[test]
    fn token_stream_errors_convert() {
        let span = Span::single(Position::start());
        let converted: SyntaxError = TokenStreamError::UnexpectedEndOfStream {
            expected: ")".into(),
            span,
        }
        .into();
        assert_eq!(converted.to_string(), "expected ')', found end of input");
    }
}
