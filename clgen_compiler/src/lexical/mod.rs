//! Lexical analysis module
//!
//! Turns checklist source text into a [`TokenStream`]. Whitespace and
//! comments are kept in the stream as non-significant tokens.

mod analyzer;

use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Token, TokenClass, TokenStream};

pub use analyzer::{LexerError, LexerMetrics, LexicalAnalyzer};

/// Tokenize source text
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    let mut analyzer = LexicalAnalyzer::new(source);
    let tokens = analyzer.tokenize()?;
    Ok(TokenStream::new(tokens))
}

/// Tokenize the contents of a loaded file
pub fn tokenize_file_result(file_result: &FileProcessingResult) -> Result<TokenStream, LexerError> {
    let mut analyzer = LexicalAnalyzer::new(&file_result.source);
    let tokens = analyzer.tokenize()?;
    let stream = TokenStream::new(tokens);

    let metrics = analyzer.metrics();
    crate::log_success!(
        codes::success::TOKENIZATION_COMPLETE,
        "Tokenization complete",
        "file" => file_result.metadata.path.display(),
        "tokens" => metrics.total_tokens,
        "identifiers" => metrics.identifiers,
        "strings" => metrics.string_literals
    );

    Ok(stream)
}

/// Token totals by class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub total: usize,
    pub structural: usize,
    pub operations: usize,
    pub literals: usize,
    pub identifiers: usize,
    pub punctuation: usize,
    pub whitespace: usize,
    pub comments: usize,
}

impl TokenCounts {
    pub fn significant(&self) -> usize {
        self.total - self.whitespace - self.comments
    }

    pub fn has_content(&self) -> bool {
        self.structural > 0
    }
}

pub fn get_token_counts(token_stream: &TokenStream) -> TokenCounts {
    let mut counts = TokenCounts::default();
    for spanned in token_stream.all_tokens() {
        if matches!(spanned.value, Token::Eof) {
            continue;
        }
        counts.total += 1;
        match spanned.value.token_class() {
            TokenClass::Structural => counts.structural += 1,
            TokenClass::Operation => counts.operations += 1,
            TokenClass::Literal => counts.literals += 1,
            TokenClass::Identifier => counts.identifiers += 1,
            TokenClass::Punctuation => counts.punctuation += 1,
            TokenClass::Whitespace => counts.whitespace += 1,
            TokenClass::Special => counts.comments += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_skips_layout_tokens() {
        let stream = tokenize("checklist(\"Before Start\") { } # done").unwrap();
        assert_eq!(stream.len(), 7);
        assert!(!stream.is_at_end());
    }

    #[test]
    fn counts_group_tokens_by_class() {
        let stream = tokenize("state(\"ON\", power > 20);\n// trailing").unwrap();
        let counts = get_token_counts(&stream);
        assert_eq!(counts.structural, 1);
        assert_eq!(counts.literals, 2);
        assert_eq!(counts.identifiers, 1);
        assert_eq!(counts.operations, 1);
        assert_eq!(counts.punctuation, 4);
        assert_eq!(counts.comments, 1);
        assert_eq!(counts.significant(), 9);
        assert!(counts.has_content());
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let stream = tokenize("   \n").unwrap();
        assert!(stream.is_at_end());
        assert!(!get_token_counts(&stream).has_content());
    }
}
