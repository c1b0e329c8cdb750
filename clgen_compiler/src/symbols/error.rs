//! Symbol table and type inference errors

use crate::logging::{codes, Code};
use crate::symbols::types::Type;

pub type SymbolResult<T> = Result<T, SymbolError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("Symbol '{identifier}' already exists in scope '{scope}'")]
    DuplicateSymbol { identifier: String, scope: String },

    #[error("Scope '{scope}' exceeds the limit of {limit} entries")]
    ScopeLimitExceeded { scope: String, limit: usize },
}

impl SymbolError {
    pub fn duplicate_symbol(identifier: &str, scope: &str) -> Self {
        Self::DuplicateSymbol {
            identifier: identifier.to_string(),
            scope: scope.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateSymbol { .. } => codes::symbols::DUPLICATE_SYMBOL,
            Self::ScopeLimitExceeded { .. } => codes::symbols::SCOPE_LIMIT_EXCEEDED,
        }
    }
}

/// An alias was used with a type incompatible with an earlier use
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Alias '{alias}' used as {used_as}, previously used as {previous}")]
pub struct TypeConflict {
    pub alias: String,
    pub used_as: Type,
    pub previous: Type,
}

impl TypeConflict {
    pub fn error_code(&self) -> Code {
        codes::symbols::TYPE_CONFLICT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_uses_upper_case_types() {
        let conflict = TypeConflict {
            alias: "gear".into(),
            used_as: Type::Bool,
            previous: Type::String,
        };
        assert_eq!(
            conflict.to_string(),
            "Alias 'gear' used as BOOL, previously used as STRING"
        );
        assert_eq!(conflict.error_code().as_str(), "W093");
    }

    #[test]
    fn duplicate_symbol_names_scope() {
        let error = SymbolError::duplicate_symbol("flaps", "__global");
        assert_eq!(
            error.to_string(),
            "Symbol 'flaps' already exists in scope '__global'"
        );
        assert_eq!(error.error_code(), codes::symbols::DUPLICATE_SYMBOL);
    }
}
