//! Two-level alias scopes: one global scope plus one scope per item

use crate::config::compile_time::symbols::{MAX_SCOPES, MAX_SYMBOLS_PER_SCOPE};
use crate::symbols::error::{SymbolError, SymbolResult, TypeConflict};
use crate::symbols::types::Type;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Name of the scope holding aliases declared outside any item
pub const GLOBAL: &str = "__global";

/// An alias together with the property path it expands to
///
/// The type starts as [`Type::Null`] and is refined each time the alias is
/// used in a context with a known type.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    identifier: String,
    expansion: String,
    ty: Cell<Type>,
}

impl Symbol {
    pub fn new(identifier: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            expansion: expansion.into(),
            ty: Cell::new(Type::Null),
        }
    }

    /// Stand-in for an undefined alias so that tree construction can continue
    pub fn placeholder(identifier: &str) -> Self {
        Self::new(identifier, identifier)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    pub fn ty(&self) -> Type {
        self.ty.get()
    }

    /// Record a use of this alias as `ty`
    ///
    /// Conflicting uses are reported but the new type is still recorded.
    /// Refining with `Null` carries no information and is ignored.
    pub fn refine(&self, ty: Type) -> Result<(), TypeConflict> {
        let current = self.ty.get();
        if ty.is_null() || current == ty {
            return Ok(());
        }
        self.ty.set(ty);
        if current.is_null() || current.is_compatible(ty) {
            Ok(())
        } else {
            Err(TypeConflict {
                alias: self.identifier.clone(),
                used_as: ty,
                previous: current,
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: HashMap<String, HashMap<String, Rc<Symbol>>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(GLOBAL.to_string(), HashMap::new());
        Self { scopes }
    }

    /// Add `symbol` to `scope`, creating the scope on first use
    pub fn add(&mut self, scope: &str, symbol: Symbol) -> SymbolResult<Rc<Symbol>> {
        if !self.scopes.contains_key(scope) && self.scopes.len() >= MAX_SCOPES {
            return Err(SymbolError::ScopeLimitExceeded {
                scope: scope.to_string(),
                limit: MAX_SCOPES,
            });
        }

        let entries = self.scopes.entry(scope.to_string()).or_default();
        if entries.contains_key(symbol.identifier()) {
            return Err(SymbolError::duplicate_symbol(symbol.identifier(), scope));
        }
        if entries.len() >= MAX_SYMBOLS_PER_SCOPE {
            return Err(SymbolError::ScopeLimitExceeded {
                scope: scope.to_string(),
                limit: MAX_SYMBOLS_PER_SCOPE,
            });
        }

        let symbol = Rc::new(symbol);
        entries.insert(symbol.identifier().to_string(), Rc::clone(&symbol));
        Ok(symbol)
    }

    /// Scope-local symbol if present, else the global one
    pub fn lookup(&self, scope: &str, identifier: &str) -> Option<Rc<Symbol>> {
        self.scopes
            .get(scope)
            .and_then(|entries| entries.get(identifier))
            .or_else(|| {
                self.scopes
                    .get(GLOBAL)
                    .and_then(|entries| entries.get(identifier))
            })
            .cloned()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.scopes.values().map(HashMap::len).sum()
    }

    /// One line per symbol, `scope: TYPE id = expansion`, sorted
    pub fn dump(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .scopes
            .iter()
            .flat_map(|(scope, entries)| {
                entries.values().map(move |symbol| {
                    format!(
                        "{}: {} {} = {}",
                        scope,
                        symbol.ty(),
                        symbol.identifier(),
                        symbol.expansion()
                    )
                })
            })
            .collect();
        lines.sort();
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn item_scope_shadows_global() {
        let mut table = SymbolTable::new();
        table
            .add(GLOBAL, Symbol::new("power", "/systems/electrical/volts"))
            .unwrap();
        table
            .add("Radio", Symbol::new("power", "/instrumentation/comm/power"))
            .unwrap();

        assert_eq!(
            table.lookup("Radio", "power").unwrap().expansion(),
            "/instrumentation/comm/power"
        );
        assert_eq!(
            table.lookup("Lights", "power").unwrap().expansion(),
            "/systems/electrical/volts"
        );
        assert!(table.lookup("Radio", "missing").is_none());
    }

    #[test]
    fn duplicates_fail_within_one_scope_only() {
        let mut table = SymbolTable::new();
        table.add("Gear", Symbol::new("gear", "/a")).unwrap();
        table.add("Flaps", Symbol::new("gear", "/b")).unwrap();

        assert_matches!(
            table.add("Gear", Symbol::new("gear", "/c")),
            Err(SymbolError::DuplicateSymbol { ref scope, .. }) if scope == "Gear"
        );
        assert_eq!(table.lookup("Gear", "gear").unwrap().expansion(), "/a");
        assert_eq!(table.scope_count(), 3);
        assert_eq!(table.symbol_count(), 2);
    }

    #[test]
    fn repeated_int_use_is_not_a_conflict() {
        let symbol = Symbol::new("rpm", "/engines/engine/rpm");
        assert!(symbol.refine(Type::Int).is_ok());
        assert!(symbol.refine(Type::Int).is_ok());
        assert_eq!(symbol.ty(), Type::Int);
    }

    #[test]
    fn numeric_refinement_keeps_latest() {
        let symbol = Symbol::new("flaps", "/controls/flight/flaps");
        symbol.refine(Type::Int).unwrap();
        symbol.refine(Type::Double).unwrap();
        assert_eq!(symbol.ty(), Type::Double);
    }

    #[test]
    fn string_then_bool_conflicts_and_records_new_type() {
        let symbol = Symbol::new("mode", "/autopilot/mode");
        symbol.refine(Type::String).unwrap();
        let conflict = symbol.refine(Type::Bool).unwrap_err();
        assert_eq!(conflict.previous, Type::String);
        assert_eq!(conflict.used_as, Type::Bool);
        assert_eq!(symbol.ty(), Type::Bool);
    }

    #[test]
    fn null_refinement_is_ignored() {
        let symbol = Symbol::new("x", "/x");
        symbol.refine(Type::Bool).unwrap();
        symbol.refine(Type::Null).unwrap();
        assert_eq!(symbol.ty(), Type::Bool);
    }

    #[test]
    fn dump_lists_typed_symbols() {
        let mut table = SymbolTable::new();
        let symbol = table.add("Gear", Symbol::new("gear", "/gear")).unwrap();
        symbol.refine(Type::Bool).unwrap();
        assert_eq!(table.dump(), vec!["Gear: BOOL gear = /gear".to_string()]);
    }
}
