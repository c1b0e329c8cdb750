//! Lexical analyzer for checklist definition sources

use crate::config::compile_time::lexical::{
    MAX_IDENTIFIER_LENGTH, MAX_STRING_SIZE, MAX_TOKEN_COUNT,
};
use crate::logging::codes;
use crate::tokens::{classify_word, SpannedToken, Token};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error};
use std::iter::Peekable;
use std::str::CharIndices;

/// Lexer specific errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("token recognition error at: '{ch}'")]
    InvalidCharacter { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String, span: Span },

    #[error("identifier exceeds {max} characters")]
    IdentifierTooLong { length: usize, max: usize, span: Span },

    #[error("string literal exceeds {max} bytes")]
    StringTooLarge { size: usize, max: usize, span: Span },

    #[error("invalid escape sequence '\\{ch}' in string literal")]
    InvalidEscape { ch: char, span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("source produces more than {max} tokens")]
    TooManyTokens { max: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            Self::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            Self::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            Self::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            Self::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            Self::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            Self::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            Self::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::InvalidCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::InvalidNumber { span, .. }
            | Self::IdentifierTooLong { span, .. }
            | Self::StringTooLarge { span, .. }
            | Self::InvalidEscape { span, .. }
            | Self::UnterminatedComment { span }
            | Self::TooManyTokens { span, .. } => *span,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// Counters gathered while scanning
#[derive(Debug, Clone, Default)]
pub struct LexerMetrics {
    pub total_tokens: usize,
    pub comment_tokens: usize,
    pub string_literals: usize,
    pub numeric_literals: usize,
    pub identifiers: usize,
    pub keywords: usize,
    pub max_string_length: usize,
}

/// Character cursor that keeps the source position of the next character
struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    position: Position,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            position: Position::start(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, ch)| ch)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn bump_while(&mut self, buffer: &mut String, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            buffer.push(ch);
            self.bump();
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Converts source text into a span-annotated token list ending in `Eof`
pub struct LexicalAnalyzer<'a> {
    source: &'a str,
    metrics: LexerMetrics,
}

impl<'a> LexicalAnalyzer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            metrics: LexerMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &LexerMetrics {
        &self.metrics
    }

    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, LexerError> {
        let mut cursor = Cursor::new(self.source);
        let mut tokens = Vec::new();

        while let Some(ch) = cursor.peek() {
            let start = cursor.position;
            let token = self.scan_token(&mut cursor, ch, start)?;
            let span = Span::new(start, cursor.position);

            if token.is_significant() {
                self.metrics.total_tokens += 1;
                if self.metrics.total_tokens > MAX_TOKEN_COUNT {
                    let error = LexerError::TooManyTokens {
                        max: MAX_TOKEN_COUNT,
                        span,
                    };
                    log_error!(error.error_code(), "Token limit exceeded",
                        span = span,
                        "max_tokens" => MAX_TOKEN_COUNT
                    );
                    return Err(error);
                }
            }
            self.record(&token);
            tokens.push(Spanned::new(token, span));
        }

        tokens.push(Spanned::new(Token::Eof, Span::single(cursor.position)));

        log_debug!("Source tokenized",
            "tokens" => self.metrics.total_tokens,
            "comments" => self.metrics.comment_tokens,
            "strings" => self.metrics.string_literals
        );

        Ok(tokens)
    }

    fn record(&mut self, token: &Token) {
        match token {
            Token::Comment(_) => self.metrics.comment_tokens += 1,
            Token::StringLiteral(text) => {
                self.metrics.string_literals += 1;
                self.metrics.max_string_length = self.metrics.max_string_length.max(text.len());
            }
            Token::Integer(_) | Token::Double(_) => self.metrics.numeric_literals += 1,
            Token::Identifier(_) => self.metrics.identifiers += 1,
            Token::Keyword(_) => self.metrics.keywords += 1,
            _ => {}
        }
    }

    fn scan_token(
        &mut self,
        cursor: &mut Cursor<'_>,
        ch: char,
        start: Position,
    ) -> Result<Token, LexerError> {
        match ch {
            c if c.is_whitespace() => {
                let mut skipped = String::new();
                cursor.bump_while(&mut skipped, char::is_whitespace);
                Ok(Token::Whitespace)
            }
            '#' => {
                cursor.bump();
                Ok(Token::Comment(self.scan_line_comment(cursor)))
            }
            '/' => match cursor.peek_second() {
                Some('/') => {
                    cursor.bump();
                    cursor.bump();
                    Ok(Token::Comment(self.scan_line_comment(cursor)))
                }
                Some('*') => {
                    cursor.bump();
                    cursor.bump();
                    self.scan_block_comment(cursor, start).map(Token::Comment)
                }
                _ => Err(self.invalid_character(cursor, ch, start)),
            },
            '"' => self.scan_string(cursor, start),
            c if c.is_ascii_digit() => self.scan_number(cursor, start),
            '-' if cursor.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(cursor, start)
            }
            c if is_identifier_start(c) => self.scan_word(cursor, start),
            '&' | '|' => {
                if cursor.peek_second() == Some(ch) {
                    cursor.bump();
                    cursor.bump();
                    Ok(if ch == '&' { Token::AndAnd } else { Token::OrOr })
                } else {
                    Err(self.invalid_character(cursor, ch, start))
                }
            }
            '!' | '=' | '<' | '>' => {
                cursor.bump();
                let followed_by_equals = cursor.peek() == Some('=');
                if followed_by_equals {
                    cursor.bump();
                }
                Ok(match (ch, followed_by_equals) {
                    ('!', true) => Token::NotEquals,
                    ('!', false) => Token::Not,
                    ('=', true) => Token::EqualEqual,
                    ('=', false) => Token::Assign,
                    ('<', true) => Token::LessThanOrEqual,
                    ('<', false) => Token::LessThan,
                    ('>', true) => Token::GreaterThanOrEqual,
                    _ => Token::GreaterThan,
                })
            }
            '(' | ')' | '{' | '}' | ',' | ';' => {
                cursor.bump();
                Ok(match ch {
                    '(' => Token::LeftParen,
                    ')' => Token::RightParen,
                    '{' => Token::LeftBrace,
                    '}' => Token::RightBrace,
                    ',' => Token::Comma,
                    _ => Token::Semicolon,
                })
            }
            _ => Err(self.invalid_character(cursor, ch, start)),
        }
    }

    fn invalid_character(&self, cursor: &mut Cursor<'_>, ch: char, start: Position) -> LexerError {
        cursor.bump();
        let span = Span::new(start, cursor.position);
        let error = LexerError::InvalidCharacter { ch, span };
        log_error!(error.error_code(), "Unrecognized character",
            span = span,
            "character" => ch.escape_default()
        );
        error
    }

    fn scan_line_comment(&self, cursor: &mut Cursor<'_>) -> String {
        let mut text = String::new();
        cursor.bump_while(&mut text, |c| c != '\n');
        text
    }

    fn scan_block_comment(
        &self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Result<String, LexerError> {
        let mut text = String::new();
        loop {
            match cursor.bump() {
                Some('*') if cursor.peek() == Some('/') => {
                    cursor.bump();
                    return Ok(text);
                }
                Some(c) => text.push(c),
                None => {
                    let span = Span::new(start, cursor.position);
                    let error = LexerError::UnterminatedComment { span };
                    log_error!(error.error_code(), "Block comment is never closed", span = span);
                    return Err(error);
                }
            }
        }
    }

    /// Scan a quoted string, keeping the quotes and escapes as written
    fn scan_string(&self, cursor: &mut Cursor<'_>, start: Position) -> Result<Token, LexerError> {
        let mut raw = String::new();
        if let Some(quote) = cursor.bump() {
            raw.push(quote);
        }

        loop {
            match cursor.peek() {
                Some('"') => {
                    cursor.bump();
                    raw.push('"');
                    break;
                }
                Some('\\') => {
                    let escape_start = cursor.position;
                    cursor.bump();
                    match cursor.peek() {
                        Some(escaped @ ('"' | '\\')) => {
                            cursor.bump();
                            raw.push('\\');
                            raw.push(escaped);
                        }
                        Some(other) => {
                            cursor.bump();
                            let span = Span::new(escape_start, cursor.position);
                            let error = LexerError::InvalidEscape { ch: other, span };
                            log_error!(error.error_code(), "Invalid escape sequence",
                                span = span,
                                "escape" => other.escape_default()
                            );
                            return Err(error);
                        }
                        None => return Err(self.unterminated_string(start, cursor.position)),
                    }
                }
                Some('\n') | None => {
                    return Err(self.unterminated_string(start, cursor.position));
                }
                Some(c) => {
                    cursor.bump();
                    raw.push(c);
                }
            }
        }

        // Content excludes the surrounding quotes
        let content_size = raw.len().saturating_sub(2);
        if content_size > MAX_STRING_SIZE {
            let span = Span::new(start, cursor.position);
            let error = LexerError::StringTooLarge {
                size: content_size,
                max: MAX_STRING_SIZE,
                span,
            };
            log_error!(error.error_code(), "String literal too large",
                span = span,
                "size" => content_size,
                "max_size" => MAX_STRING_SIZE
            );
            return Err(error);
        }

        Ok(Token::StringLiteral(raw))
    }

    fn unterminated_string(&self, start: Position, end: Position) -> LexerError {
        let span = Span::new(start, end);
        let error = LexerError::UnterminatedString { span };
        log_error!(error.error_code(), "Unterminated string literal", span = span);
        error
    }

    fn scan_number(&self, cursor: &mut Cursor<'_>, start: Position) -> Result<Token, LexerError> {
        let mut text = String::new();
        if cursor.peek() == Some('-') {
            text.push('-');
            cursor.bump();
        }
        cursor.bump_while(&mut text, |c| c.is_ascii_digit());

        let is_double =
            cursor.peek() == Some('.') && cursor.peek_second().is_some_and(|c| c.is_ascii_digit());
        if is_double {
            text.push('.');
            cursor.bump();
            cursor.bump_while(&mut text, |c| c.is_ascii_digit());
        }

        let parsed = if is_double {
            text.parse::<f64>().ok().map(Token::Double)
        } else {
            text.parse::<i64>().ok().map(Token::Integer)
        };

        parsed.ok_or_else(|| {
            let span = Span::new(start, cursor.position);
            let error = LexerError::InvalidNumber {
                text: text.clone(),
                span,
            };
            log_error!(error.error_code(), "Number literal out of range",
                span = span,
                "literal" => text.as_str()
            );
            error
        })
    }

    fn scan_word(&self, cursor: &mut Cursor<'_>, start: Position) -> Result<Token, LexerError> {
        let mut word = String::new();
        cursor.bump_while(&mut word, is_identifier_continue);

        let length = word.chars().count();
        if length > MAX_IDENTIFIER_LENGTH {
            let span = Span::new(start, cursor.position);
            let error = LexerError::IdentifierTooLong {
                length,
                max: MAX_IDENTIFIER_LENGTH,
                span,
            };
            log_error!(error.error_code(), "Identifier too long",
                span = span,
                "length" => length,
                "max_length" => MAX_IDENTIFIER_LENGTH
            );
            return Err(error);
        }

        Ok(classify_word(&word))
    }
}
