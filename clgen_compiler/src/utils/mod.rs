//! Shared source-location utilities for the checklist lexer, parser and passes.

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
