//! Source location tracking for the checklist compiler
//!
//! Every token produced by the lexer carries a [`Span`], and every semantic
//! diagnostic is anchored to one. [`SourceMap`] turns a position back into
//! the offending source line for caret-style error context.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number in characters (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character.
    ///
    /// Tabs count as a single column so that caret context lines up with
    /// the character index of the offending token.
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position by a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }

    /// Zero-based character index within the line
    pub fn char_in_line(&self) -> usize {
        self.column.saturating_sub(1) as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering a single character at `pos`
    pub fn single(pos: Position) -> Self {
        let end = Position {
            offset: pos.offset + 1,
            line: pos.line,
            column: pos.column + 1,
        };
        Self { start: pos, end }
    }

    /// Line number of the span start (1-based)
    pub fn line(&self) -> u32 {
        self.start.line
    }

    /// Span covering both `self` and `other`
    pub fn to(&self, other: Span) -> Span {
        let start = if self.start.offset < other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset > other.end.offset {
            self.end
        } else {
            other.end
        };
        Span::new(start, end)
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text for this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }

    /// Placeholder span for synthesized nodes
    pub fn dummy() -> Self {
        Self {
            start: Position::start(),
            end: Position::start(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value paired with the source span it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// Tracks line starts of a source text for line lookup
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get a line of text by line number (1-based), without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Two-line context for a diagnostic: the source line, then a caret
    /// under the zero-based character index. `None` past the end of input.
    pub fn caret_context(&self, line_num: u32, char_in_line: usize) -> Option<String> {
        let line = self.get_line(line_num)?;
        let mut context = String::with_capacity(line.len() + char_in_line + 2);
        context.push_str(line);
        context.push('\n');
        context.push_str(&" ".repeat(char_in_line));
        context.push('^');
        Some(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let pos = Position::start().advance_str("ab\nc");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.char_in_line(), 1);
    }

    #[test]
    fn caret_context_points_at_column() {
        let map = SourceMap::new("item(\"Gear\") {\n    state(\"UP\");\n}\n");
        let context = map.caret_context(2, 10).unwrap();
        assert_eq!(context, "    state(\"UP\");\n          ^");
    }

    #[test]
    fn caret_context_past_end_is_none() {
        let map = SourceMap::new("one line");
        assert!(map.caret_context(5, 0).is_none());
        assert_eq!(map.get_line(1), Some("one line"));
    }
}
