// Internal modules
#[macro_use]
pub mod logging;
pub mod ast;
pub mod backend;
pub mod config;
pub mod file_processor;
pub mod lexical;
pub mod passes;
pub mod pipeline;
pub mod reverse;
pub mod symbols;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use ast::AbstractSyntaxTree;
pub use backend::BackendKind;
pub use pipeline::{PipelineError, PipelineOptions, PipelineResult};
