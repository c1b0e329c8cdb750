//! Literal-or-alias values used by terminals and command parameters

use crate::symbols::{Symbol, Type};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    Symbol(Rc<Symbol>),
}

impl Value {
    /// Intrinsic literal type, or the alias's current type
    pub fn ty(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Double(_) => Type::Double,
            Self::Bool(_) => Type::Bool,
            Self::String(_) => Type::String,
            Self::Symbol(symbol) => symbol.ty(),
        }
    }

    pub fn as_symbol(&self) -> Option<&Rc<Symbol>> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        self.as_symbol().is_some()
    }
}

/// Literals print as written; aliases print their expansion
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{:?}", d),
            Self::Bool(b) => write!(f, "{}", b),
            Self::String(s) => f.write_str(s),
            Self::Symbol(symbol) => f.write_str(symbol.expansion()),
        }
    }
}
