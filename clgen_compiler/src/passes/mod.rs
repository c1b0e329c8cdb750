//! Semantic passes turning the parse tree into the checklist AST
//!
//! [`ItemPass`] runs first and produces the item and symbol tables;
//! [`ChecklistPass`] then resolves every check against those items. Both
//! report into a [`DiagnosticSink`] and never stop early on a semantic
//! problem, so every diagnostic of a pass is available before the caller
//! decides whether to continue.

pub mod checklist_pass;
pub mod diagnostics;
pub mod error;
pub mod item_pass;
pub mod support;

pub use checklist_pass::ChecklistPass;
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use error::{PassError, SemanticError, SemanticResult, UnquoteError};
pub use item_pass::{ItemPass, ItemPassOutput};
pub use support::unquote;
