//! Token model for the checklist language
//!
//! The lexer produces a flat list of [`SpannedToken`]s, comments and
//! whitespace included. [`TokenStream`] hides the insignificant ones from the
//! parser while every token keeps its exact source [`Span`](crate::utils::Span).

pub mod keywords;
pub mod token;
pub mod token_stream;

pub use keywords::Keyword;
pub use token::{classify_operator_symbol, classify_word, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamError};
