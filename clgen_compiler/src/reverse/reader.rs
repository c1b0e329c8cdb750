//! Element reader for the markup this compiler writes
//!
//! Understands the declaration, comments, elements, attributes, text and
//! the predefined and numeric character references. DTDs, CDATA sections
//! and processing instructions other than the declaration are rejected.

use crate::backend::{Document, Element, Node};
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::reverse::error::{ReverseError, ReverseResult};
use std::path::Path;

pub fn parse_document(text: &str, path: &Path) -> ReverseResult<Document> {
    let mut reader = Reader {
        text,
        pos: 0,
        line: 1,
        path,
    };

    let mut comment = None;
    reader.skip_whitespace();
    if reader.starts_with("<?xml") {
        reader.skip_past("?>")?;
    }
    loop {
        reader.skip_whitespace();
        if reader.starts_with("<!--") {
            reader.advance(4);
            let text = reader.skip_past("-->")?;
            comment.get_or_insert_with(|| text.trim().to_string());
        } else {
            break;
        }
    }

    if !reader.starts_with("<") {
        return Err(reader.error("expected root element"));
    }
    let root = reader.element(0)?;

    loop {
        reader.skip_whitespace();
        if reader.starts_with("<!--") {
            reader.advance(4);
            reader.skip_past("-->")?;
        } else if reader.at_end() {
            break;
        } else {
            return Err(reader.error("content after root element"));
        }
    }

    Ok(Document { comment, root })
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn advance(&mut self, bytes: usize) {
        let consumed = &self.text[self.pos..self.pos + bytes];
        self.line += consumed.matches('\n').count();
        self.pos += bytes;
    }

    fn error(&self, message: impl Into<String>) -> ReverseError {
        ReverseError::malformed(self.path, self.line, message)
    }

    fn skip_whitespace(&mut self) {
        let skipped = self.rest().len() - self.rest().trim_start().len();
        self.advance(skipped);
    }

    /// Consume through `end`, returning what came before it
    fn skip_past(&mut self, end: &str) -> ReverseResult<&'a str> {
        let Some(index) = self.rest().find(end) else {
            return Err(self.error(format!("missing '{}'", end)));
        };
        let content = &self.rest()[..index];
        self.advance(index + end.len());
        Ok(content)
    }

    fn expect(&mut self, token: &str) -> ReverseResult<()> {
        if !self.starts_with(token) {
            return Err(self.error(format!("expected '{}'", token)));
        }
        self.advance(token.len());
        Ok(())
    }

    fn name(&mut self) -> ReverseResult<&'a str> {
        let length = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
            .unwrap_or(self.rest().len());
        if length == 0 {
            return Err(self.error("expected a name"));
        }
        let name = &self.rest()[..length];
        self.advance(length);
        Ok(name)
    }

    fn element(&mut self, depth: usize) -> ReverseResult<Element> {
        if depth > MAX_PARSE_DEPTH {
            return Err(self.error(format!("elements nested deeper than {}", MAX_PARSE_DEPTH)));
        }
        self.expect("<")?;
        let mut element = Element::new(self.name()?);

        loop {
            self.skip_whitespace();
            if self.starts_with("/>") {
                self.advance(2);
                return Ok(element);
            }
            if self.starts_with(">") {
                self.advance(1);
                break;
            }
            let name = self.name()?;
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.error(format!("unquoted value for attribute '{}'", name))),
            };
            self.advance(1);
            let raw = self.skip_past(&quote.to_string())?;
            let value = self.unescape(raw)?;
            element.set_attribute(name, value);
        }

        loop {
            if self.at_end() {
                return Err(self.error(format!("unclosed element <{}>", element.name)));
            }
            if self.starts_with("</") {
                self.advance(2);
                let name = self.name()?;
                if name != element.name {
                    return Err(self.error(format!(
                        "closing </{}> does not match <{}>",
                        name, element.name
                    )));
                }
                self.skip_whitespace();
                self.expect(">")?;
                return Ok(element);
            }
            if self.starts_with("<!--") {
                self.advance(4);
                self.skip_past("-->")?;
            } else if self.starts_with("<![") || self.starts_with("<?") || self.starts_with("<!") {
                return Err(self.error("unsupported markup declaration"));
            } else if self.starts_with("<") {
                let child = self.element(depth + 1)?;
                element.push(child);
            } else {
                let length = self.rest().find('<').unwrap_or(self.rest().len());
                let raw = &self.rest()[..length];
                self.advance(length);
                if !raw.trim().is_empty() {
                    element.children.push(Node::Text(self.unescape(raw)?));
                }
            }
        }
    }

    fn unescape(&self, raw: &str) -> ReverseResult<String> {
        let mut text = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find('&') {
            text.push_str(&rest[..start]);
            let Some(end) = rest[start..].find(';') else {
                return Err(self.error("unterminated character reference"));
            };
            let entity = &rest[start + 1..start + end];
            let ch = match entity {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(decimal) = entity.strip_prefix('#') {
                        decimal.parse().ok()
                    } else {
                        None
                    };
                    code.and_then(char::from_u32).ok_or_else(|| {
                        self.error(format!("unknown character reference '&{};'", entity))
                    })?
                }
            };
            text.push(ch);
            rest = &rest[start + end + 1..];
        }
        text.push_str(rest);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> ReverseResult<Document> {
        parse_document(text, Path::new("test.xml"))
    }

    #[test]
    fn reads_serialized_documents() {
        let mut root = Element::new("PropertyList");
        root.push_text("title", "Fuel & Oil <check>", None);
        let mut item = Element::new("item");
        item.push(Element::new("name"));
        item.push_text("value", "true", Some("bool"));
        root.push(item);
        let document = Document::new(root).with_comment("Generated by clgen");

        let parsed = parse(&document.serialize()).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn decodes_references_and_attributes() {
        let document = parse(
            "<PropertyList><checklist include='a&#45;b.xml'/><name>x&#x41;&quot;</name></PropertyList>",
        )
        .unwrap();
        let root = &document.root;
        assert_eq!(root.child("checklist").unwrap().attribute("include"), Some("a-b.xml"));
        assert_eq!(root.child("name").unwrap().text(), "xA\"");
        assert_eq!(document.comment, None);
    }

    #[test]
    fn mismatched_close_reports_line() {
        let error = parse("<?xml version=\"1.0\"?>\n<PropertyList>\n  <title>x</name>\n</PropertyList>").unwrap_err();
        assert_matches!(error, ReverseError::MalformedMarkup { line: 3, .. });
    }

    #[test]
    fn rejects_trailing_content_and_unclosed_elements() {
        assert_matches!(parse("<a/><b/>"), Err(ReverseError::MalformedMarkup { .. }));
        assert_matches!(parse("<a><b></b>"), Err(ReverseError::MalformedMarkup { .. }));
        assert_matches!(parse("<a>&bogus;</a>"), Err(ReverseError::MalformedMarkup { .. }));
    }
}
