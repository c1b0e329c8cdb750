//! Token stream over significant tokens with span-accurate lookahead

use crate::{
    tokens::token::Token,
    utils::{Span, Spanned},
};

pub type SpannedToken = Spanned<Token>;

/// Navigates the significant tokens of a lexed source while keeping the
/// full token list (comments and whitespace included) available.
#[derive(Debug, Clone)]
pub struct TokenStream {
    all_tokens: Vec<SpannedToken>,
    significant_indices: Vec<usize>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, spanned)| spanned.value.is_significant())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        crate::log_debug!("Token stream built",
            "total_tokens" => tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
        }
    }

    // === CORE NAVIGATION ===

    pub fn current(&self) -> Option<&SpannedToken> {
        self.peek_ahead(0)
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.current().map(|spanned| &spanned.value)
    }

    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|spanned| spanned.span)
    }

    pub fn peek(&self) -> Option<&SpannedToken> {
        self.peek_ahead(1)
    }

    pub fn peek_ahead(&self, n: usize) -> Option<&SpannedToken> {
        self.significant_indices
            .get(self.position + n)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    pub fn advance(&mut self) -> Option<&SpannedToken> {
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
        self.current()
    }

    /// True once only `Eof` (or nothing) remains
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_token(), None | Some(Token::Eof))
    }

    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    /// Span of the last significant token, for end-of-input errors
    pub fn last_span(&self) -> Span {
        self.significant_indices
            .last()
            .and_then(|&i| self.all_tokens.get(i))
            .map(|spanned| spanned.span)
            .unwrap_or_else(Span::dummy)
    }

    // === MATCHING ===

    /// Whether the current token has the same variant as `expected`
    pub fn check_token(&self, expected: &Token) -> bool {
        self.current_token()
            .map(|token| std::mem::discriminant(token) == std::mem::discriminant(expected))
            .unwrap_or(false)
    }

    pub fn advance_if_matches(&mut self, expected: &Token) -> bool {
        if self.check_token(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the same variant as `expected`
    pub fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, TokenStreamError> {
        match self.current() {
            Some(current)
                if std::mem::discriminant(&current.value)
                    == std::mem::discriminant(&expected) =>
            {
                let result = current.clone();
                self.advance();
                Ok(result)
            }
            Some(current) if matches!(current.value, Token::Eof) => {
                Err(TokenStreamError::UnexpectedEndOfStream {
                    expected: expected.as_source_string(),
                    span: current.span,
                })
            }
            Some(current) => Err(TokenStreamError::UnexpectedToken {
                expected: expected.as_source_string(),
                found: current.value.as_source_string(),
                span: current.span,
            }),
            None => Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.as_source_string(),
                span: self.last_span(),
            }),
        }
    }

    // === CHECKPOINTS ===

    pub fn save_position(&self) -> usize {
        self.position
    }

    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.significant_indices.len());
    }

    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }

    pub fn iter_significant(&self) -> impl Iterator<Item = &SpannedToken> {
        self.significant_indices
            .iter()
            .map(|&i| &self.all_tokens[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenStreamError {
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    UnexpectedEndOfStream {
        expected: String,
        span: Span,
    },
}

impl TokenStreamError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::UnexpectedEndOfStream { span, .. } => *span,
        }
    }
}

impl std::fmt::Display for TokenStreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => {
                write!(f, "expected '{}', found '{}'", expected, found)
            }
            Self::UnexpectedEndOfStream { expected, .. } => {
                write!(f, "expected '{}', found end of input", expected)
            }
        }
    }
}

impl std::error::Error for TokenStreamError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn spanned(token: Token, offset: usize) -> SpannedToken {
        let start = Position::new(offset, 1, offset as u32 + 1);
        Spanned::new(token, Span::new(start, start.advance('x')))
    }

    fn stream() -> TokenStream {
        TokenStream::new(vec![
            spanned(Token::Comment(" header".into()), 0),
            spanned(Token::Identifier("gear".into()), 1),
            spanned(Token::Whitespace, 2),
            spanned(Token::Assign, 3),
            spanned(Token::Integer(1), 4),
            spanned(Token::Eof, 5),
        ])
    }

    #[test]
    fn skips_insignificant_tokens() {
        let mut tokens = stream();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens.all_tokens().len(), 6);
        assert!(tokens.current_token().map(Token::is_identifier).unwrap_or(false));
        assert_eq!(tokens.advance().map(|t| &t.value), Some(&Token::Assign));
    }

    #[test]
    fn expect_token_reports_found_token() {
        let mut tokens = stream();
        let err = tokens.expect_token(Token::LeftParen).unwrap_err();
        assert_eq!(err.to_string(), "expected '(', found 'gear'");
        assert_eq!(err.span().start.offset, 1);
    }

    #[test]
    fn expect_token_at_eof_reports_end_of_input() {
        let mut tokens = stream();
        tokens.restore_position(3);
        assert!(tokens.is_at_end());
        let err = tokens.expect_token(Token::Semicolon).unwrap_err();
        assert_eq!(err.to_string(), "expected ';', found end of input");
    }

    #[test]
    fn checkpoints_restore_position() {
        let mut tokens = stream();
        let saved = tokens.save_position();
        tokens.advance();
        tokens.advance();
        assert!(tokens.advance_if_matches(&Token::Integer(0)));
        tokens.restore_position(saved);
        assert!(tokens.check_token(&Token::Identifier(String::new())));
    }
}
