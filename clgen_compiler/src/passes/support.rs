//! Token helpers shared by the passes

use crate::passes::error::{PassError, UnquoteError};
use crate::syntax::ParseNode;
use crate::tokens::Token;

/// Strip the surrounding quotes of a string literal and undo `\"` and `\\`
pub fn unquote(quoted: &str) -> Result<String, UnquoteError> {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| UnquoteError {
            text: quoted.to_string(),
        })?;

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => text.push(escaped),
                Some(other) => {
                    text.push('\\');
                    text.push(other);
                }
                None => text.push('\\'),
            }
        } else {
            text.push(ch);
        }
    }
    Ok(text)
}

/// Unquoted string at child position `index`
pub fn string_child(node: &ParseNode, index: usize) -> Result<String, PassError> {
    let raw = node
        .string_at(index)
        .ok_or_else(|| PassError::malformed(node.rule, "a string", index))?;
    Ok(unquote(raw)?)
}

pub fn identifier_child(node: &ParseNode, index: usize) -> Result<&str, PassError> {
    node.identifier_at(index)
        .ok_or_else(|| PassError::malformed(node.rule, "an identifier", index))
}

/// Numeric literal at child position `index` as a float
pub fn number_child(node: &ParseNode, index: usize) -> Result<f64, PassError> {
    match node.token(index).map(|token| &token.value) {
        Some(Token::Integer(i)) => Ok(*i as f64),
        Some(Token::Double(d)) => Ok(*d),
        _ => Err(PassError::malformed(node.rule, "a number", index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unquote_strips_quotes_and_escapes() {
        assert_eq!(unquote("\"Landing Gear\"").unwrap(), "Landing Gear");
        assert_eq!(unquote(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
        assert_eq!(unquote(r#""a\\b""#).unwrap(), "a\\b");
        assert_eq!(unquote("\"\"").unwrap(), "");
    }

    #[test]
    fn unquote_rejects_bare_text() {
        assert_eq!(
            unquote("Gear").unwrap_err().to_string(),
            "String 'Gear' is not quoted"
        );
        assert!(unquote("\"").is_err());
    }

    #[test]
    fn child_accessors_read_by_position() {
        let tree = crate::syntax::parse_source("item(\"Gear\") { marker(1, 2.5, 3, 4); }").unwrap();
        let item = tree.root.nodes().next().unwrap();
        assert_eq!(string_child(item, 2).unwrap(), "Gear");

        let marker = item.nodes().next().unwrap();
        assert_eq!(number_child(marker, 2).unwrap(), 1.0);
        assert_eq!(number_child(marker, 4).unwrap(), 2.5);
        assert_matches!(
            number_child(marker, 3),
            Err(PassError::MalformedTree { index: 3, .. })
        );
        assert!(identifier_child(marker, 0).is_err());
    }
}
