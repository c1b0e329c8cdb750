//! Syntax analysis module - TokenStream to ParseTree
//!
//! The parse tree is a faithful record of the grammar productions; the
//! semantic passes walk it with a [`ParseListener`] to build the AST.

mod error;
mod parser;
mod tree;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::ChecklistParser;
pub use tree::{ParseChild, ParseListener, ParseNode, ParseTree, ParseTreeWalker, Rule};

use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse a token stream into a parse tree, stopping at the first error
pub fn parse_token_stream(token_stream: TokenStream) -> SyntaxResult<ParseTree> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let result = ChecklistParser::new(token_stream).parse_specification();

    match &result {
        Ok(tree) => {
            log_success!(
                codes::success::PARSE_TREE_COMPLETE,
                "Syntax analysis completed successfully",
                "nodes" => tree.node_count(),
                "depth" => tree.root.depth()
            );
        }
        Err(error) => {
            log_error!(error.error_code(), "Syntax analysis failed",
                span = error.span(),
                "error" => error
            );
        }
    }

    result
}

/// Lex and parse source text in one step
pub fn parse_source(source: &str) -> Result<ParseTree, crate::pipeline::PipelineError> {
    let tokens = crate::lexical::tokenize(source)?;
    Ok(parse_token_stream(tokens)?)
}
