//! Alias symbols, scopes and the value-type lattice

pub mod error;
pub mod table;
pub mod types;

pub use error::{SymbolError, SymbolResult, TypeConflict};
pub use table::{Symbol, SymbolTable, GLOBAL};
pub use types::Type;
