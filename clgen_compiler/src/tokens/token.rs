//! Token definitions for the checklist language
use crate::tokens::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Keyword(Keyword),

    // Logical operators
    AndAnd, // &&
    OrOr,   // ||
    Not,    // !

    // Comparison operators
    EqualEqual,         // ==
    NotEquals,          // !=
    GreaterThan,        // >
    LessThan,           // <
    GreaterThanOrEqual, // >=
    LessThanOrEqual,    // <=

    /// Assignment and parameter binding
    Assign, // =

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,

    /// Quoted string exactly as written, quotes and escapes included
    StringLiteral(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),

    Identifier(String),

    /// Run of spaces, tabs and newlines
    Whitespace,
    Comment(String),
    Eof,
}

impl Token {
    pub fn is_comparison_operator(&self) -> bool {
        matches!(
            self,
            Self::EqualEqual
                | Self::NotEquals
                | Self::GreaterThan
                | Self::LessThan
                | Self::GreaterThanOrEqual
                | Self::LessThanOrEqual
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::StringLiteral(_) | Self::Integer(_) | Self::Double(_) | Self::Boolean(_)
        )
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment(_))
    }

    pub fn is_significant(&self) -> bool {
        !self.is_ignorable()
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(kw) if *kw == keyword)
    }

    /// The token as it appears in source; used in syntax error messages
    pub fn as_source_string(&self) -> String {
        match self {
            Self::Keyword(kw) => kw.as_str().to_string(),
            Self::AndAnd => "&&".to_string(),
            Self::OrOr => "||".to_string(),
            Self::Not => "!".to_string(),
            Self::EqualEqual => "==".to_string(),
            Self::NotEquals => "!=".to_string(),
            Self::GreaterThan => ">".to_string(),
            Self::LessThan => "<".to_string(),
            Self::GreaterThanOrEqual => ">=".to_string(),
            Self::LessThanOrEqual => "<=".to_string(),
            Self::Assign => "=".to_string(),
            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
            Self::LeftBrace => "{".to_string(),
            Self::RightBrace => "}".to_string(),
            Self::Comma => ",".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::StringLiteral(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Double(d) => format!("{:?}", d),
            Self::Boolean(b) => b.to_string(),
            Self::Identifier(id) => id.clone(),
            Self::Whitespace => " ".to_string(),
            Self::Comment(text) => format!("#{}", text),
            Self::Eof => "<EOF>".to_string(),
        }
    }

    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Keyword(_) => TokenClass::Structural,

            Self::AndAnd
            | Self::OrOr
            | Self::Not
            | Self::EqualEqual
            | Self::NotEquals
            | Self::GreaterThan
            | Self::LessThan
            | Self::GreaterThanOrEqual
            | Self::LessThanOrEqual
            | Self::Assign => TokenClass::Operation,

            Self::StringLiteral(_) | Self::Integer(_) | Self::Double(_) | Self::Boolean(_) => {
                TokenClass::Literal
            }

            Self::Identifier(_) => TokenClass::Identifier,

            Self::LeftParen
            | Self::RightParen
            | Self::LeftBrace
            | Self::RightBrace
            | Self::Comma
            | Self::Semicolon => TokenClass::Punctuation,

            Self::Whitespace => TokenClass::Whitespace,
            Self::Comment(_) | Self::Eof => TokenClass::Special,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_source_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Structural,
    Operation,
    Literal,
    Identifier,
    Punctuation,
    Whitespace,
    Special,
}

/// Keyword, boolean literal or identifier for a scanned word
pub fn classify_word(word: &str) -> Token {
    if let Some(keyword) = Keyword::from_str(word) {
        return Token::Keyword(keyword);
    }
    match word {
        "true" => Token::Boolean(true),
        "false" => Token::Boolean(false),
        _ => Token::Identifier(word.to_string()),
    }
}

/// Map a one- or two-character operator to its token
pub fn classify_operator_symbol(symbol: &str) -> Option<Token> {
    match symbol {
        "&&" => Some(Token::AndAnd),
        "||" => Some(Token::OrOr),
        "!" => Some(Token::Not),
        "==" => Some(Token::EqualEqual),
        "!=" => Some(Token::NotEquals),
        ">" => Some(Token::GreaterThan),
        "<" => Some(Token::LessThan),
        ">=" => Some(Token::GreaterThanOrEqual),
        "<=" => Some(Token::LessThanOrEqual),
        "=" => Some(Token::Assign),
        _ => None,
    }
}
