//! Semantic diagnostics raised while building the checklist tree

use crate::logging::{codes, Code};
use crate::symbols::{SymbolError, TypeConflict};
use crate::syntax::Rule;
use crate::utils::Span;

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Problems found by the item and checklist passes
///
/// Everything except [`SemanticError::TypeConflict`] is fatal once the pass
/// that found it completes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Duplicate definition of item '{name}'")]
    DuplicateItem { name: String, span: Span },

    #[error("Duplicate definition of state '{state}' in item '{item}'")]
    DuplicateState {
        state: String,
        item: String,
        span: Span,
    },

    #[error("Alias '{alias}' is already defined in item '{scope}'")]
    DuplicateAlias {
        alias: String,
        scope: String,
        span: Span,
    },

    #[error("Alias '{alias}' is not defined in item '{scope}'")]
    UndefinedAlias {
        alias: String,
        scope: String,
        span: Span,
    },

    #[error("{source}")]
    SymbolLimit {
        #[source]
        source: SymbolError,
        span: Span,
    },

    #[error("Undefined item '{item}' in checklist '{checklist}'")]
    UndefinedItem {
        item: String,
        checklist: String,
        span: Span,
    },

    #[error("State '{state}' is not defined for item '{item}'")]
    UndefinedState {
        state: String,
        item: String,
        span: Span,
    },

    #[error("Duplicate definition of checklist with title '{title}' (ignoring case)")]
    DuplicateChecklist { title: String, span: Span },

    #[error("{conflict}")]
    TypeConflict { conflict: TypeConflict, span: Span },
}

impl SemanticError {
    pub fn type_conflict(conflict: TypeConflict, span: Span) -> Self {
        Self::TypeConflict { conflict, span }
    }

    /// Map a symbol table failure for `alias` declared in `scope`
    pub fn from_symbol_error(error: SymbolError, span: Span) -> Self {
        match error {
            SymbolError::DuplicateSymbol { identifier, scope } => Self::DuplicateAlias {
                alias: identifier,
                scope,
                span,
            },
            other => Self::SymbolLimit {
                source: other,
                span,
            },
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::DuplicateItem { span, .. }
            | Self::DuplicateState { span, .. }
            | Self::DuplicateAlias { span, .. }
            | Self::UndefinedAlias { span, .. }
            | Self::SymbolLimit { span, .. }
            | Self::UndefinedItem { span, .. }
            | Self::UndefinedState { span, .. }
            | Self::DuplicateChecklist { span, .. }
            | Self::TypeConflict { span, .. } => *span,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::TypeConflict { .. })
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateItem { .. } => codes::semantic::DUPLICATE_ITEM,
            Self::DuplicateState { .. } => codes::semantic::DUPLICATE_STATE,
            Self::DuplicateAlias { .. } => codes::symbols::DUPLICATE_ALIAS,
            Self::UndefinedAlias { .. } => codes::symbols::UNDEFINED_ALIAS,
            Self::SymbolLimit { source, .. } => source.error_code(),
            Self::UndefinedItem { .. } => codes::semantic::UNDEFINED_ITEM,
            Self::UndefinedState { .. } => codes::semantic::UNDEFINED_STATE,
            Self::DuplicateChecklist { .. } => codes::semantic::DUPLICATE_CHECKLIST,
            Self::TypeConflict { conflict, .. } => conflict.error_code(),
        }
    }
}

/// A string token without its surrounding double quotes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("String '{text}' is not quoted")]
pub struct UnquoteError {
    pub text: String,
}

impl UnquoteError {
    pub fn error_code(&self) -> Code {
        codes::system::CONTRACT_VIOLATION
    }
}

/// Parse tree shapes the passes rely on but did not find
///
/// The parser never produces these; seeing one aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PassError {
    #[error(transparent)]
    Unquote(#[from] UnquoteError),

    #[error("Malformed {rule} node: expected {expected} at child {index}")]
    MalformedTree {
        rule: Rule,
        expected: &'static str,
        index: usize,
    },
}

impl PassError {
    pub fn malformed(rule: Rule, expected: &'static str, index: usize) -> Self {
        Self::MalformedTree {
            rule,
            expected,
            index,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Unquote(error) => error.error_code(),
            Self::MalformedTree { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Type;

    #[test]
    fn messages_match_diagnostic_text() {
        let span = Span::dummy();
        let cases = [
            (
                SemanticError::DuplicateChecklist {
                    title: "BEFORE START".into(),
                    span,
                },
                "Duplicate definition of checklist with title 'BEFORE START' (ignoring case)",
            ),
            (
                SemanticError::UndefinedItem {
                    item: "Flaps".into(),
                    checklist: "Landing".into(),
                    span,
                },
                "Undefined item 'Flaps' in checklist 'Landing'",
            ),
            (
                SemanticError::DuplicateAlias {
                    alias: "gear".into(),
                    scope: "__global".into(),
                    span,
                },
                "Alias 'gear' is already defined in item '__global'",
            ),
        ];
        for (error, text) in cases {
            assert_eq!(error.to_string(), text);
            assert!(!error.is_warning());
        }
    }

    #[test]
    fn duplicate_symbol_becomes_duplicate_alias() {
        let error = SemanticError::from_symbol_error(
            SymbolError::duplicate_symbol("gear", "Gear"),
            Span::dummy(),
        );
        assert_eq!(error.error_code(), codes::symbols::DUPLICATE_ALIAS);
        assert_eq!(error.to_string(), "Alias 'gear' is already defined in item 'Gear'");
    }

    #[test]
    fn type_conflicts_are_warnings() {
        let error = SemanticError::type_conflict(
            TypeConflict {
                alias: "mode".into(),
                used_as: Type::Bool,
                previous: Type::String,
            },
            Span::dummy(),
        );
        assert!(error.is_warning());
        assert_eq!(error.error_code(), codes::symbols::TYPE_CONFLICT);
    }
}
