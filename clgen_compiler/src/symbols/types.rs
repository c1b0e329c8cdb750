//! Closed value-type lattice for aliases, terminals and bindings

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Null` means "not yet known"; `Int` and `Double` are mutually compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    #[default]
    Null,
    Int,
    Double,
    Bool,
    String,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Double)
    }

    pub fn is_null(self) -> bool {
        self == Self::Null
    }

    /// Equal, or both numeric
    pub fn is_compatible(self, other: Type) -> bool {
        self == other || (self.is_numeric() && other.is_numeric())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Int => "INT",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOL",
            Self::String => "STRING",
        }
    }

    /// Value of the markup `type` attribute; only BOOL and STRING carry one
    pub fn markup_attribute(self) -> Option<&'static str> {
        match self {
            Self::Bool => Some("bool"),
            Self::String => Some("string"),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_types_are_compatible() {
        assert!(Type::Int.is_compatible(Type::Double));
        assert!(Type::Double.is_compatible(Type::Int));
        assert!(Type::Bool.is_compatible(Type::Bool));
        assert!(!Type::String.is_compatible(Type::Bool));
        assert!(!Type::Null.is_compatible(Type::Int));
    }

    #[test]
    fn only_bool_and_string_have_markup_attributes() {
        assert_eq!(Type::Bool.markup_attribute(), Some("bool"));
        assert_eq!(Type::String.markup_attribute(), Some("string"));
        assert_eq!(Type::Int.markup_attribute(), None);
        assert_eq!(Type::default(), Type::Null);
    }
}
