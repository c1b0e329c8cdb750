//! Minimal element tree for the simulator's property-list markup
//!
//! Shared by the markup generator, which serializes it, and the reverse
//! generator, which reads it back.

use crate::config::compile_time::output::MARKUP_INDENT_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<name>text</name>`, or `<name/>` when `text` is empty
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        let text = text.into();
        if !text.is_empty() {
            element.children.push(Node::Text(text));
        }
        element
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append `<name type="...">text</name>`
    pub fn push_text(&mut self, name: &str, text: impl Into<String>, type_attribute: Option<&str>) {
        let mut child = Self::with_text(name, text);
        if let Some(ty) = type_attribute {
            child.set_attribute("type", ty);
        }
        self.push(child);
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Concatenated text content of the direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = " ".repeat(depth * MARKUP_INDENT_WIDTH);
        out.push_str(&format!("{}<{}", indent, self.name));
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        if self.elements().next().is_none() {
            out.push_str(&format!(">{}</{}>\n", escape(&self.text()), self.name));
            return;
        }

        out.push_str(">\n");
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out, depth + 1),
                Node::Text(text) if !text.trim().is_empty() => {
                    let inner = " ".repeat((depth + 1) * MARKUP_INDENT_WIDTH);
                    out.push_str(&format!("{}{}\n", inner, escape(text.trim())));
                }
                Node::Text(_) => {}
            }
        }
        out.push_str(&format!("{}</{}>\n", indent, self.name));
    }
}

/// A complete markup file: declaration, one comment, one root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub comment: Option<String>,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            comment: None,
            root,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn serialize(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(comment) = &self.comment {
            out.push_str(&format!("<!-- {} -->\n", comment.replace("--", "- -")));
        }
        self.root.write_to(&mut out, 0);
        out
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_elements_with_indentation() {
        let mut root = Element::new("PropertyList");
        root.push_text("title", "Before Start", None);
        let mut item = Element::new("item");
        item.push(Element::with_text("name", ""));
        item.push_text("value", "true", Some("bool"));
        root.push(item);

        let document = Document::new(root).with_comment("Generated by clgen");
        assert_eq!(
            document.serialize(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<!-- Generated by clgen -->\n",
                "<PropertyList>\n",
                "  <title>Before Start</title>\n",
                "  <item>\n",
                "    <name/>\n",
                "    <value type=\"bool\">true</value>\n",
                "  </item>\n",
                "</PropertyList>\n",
            )
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let mut root = Element::new("checklist");
        root.set_attribute("include", "a&b.xml");
        root.push_text("name", "<Gear> \"down\"", None);
        let text = Document::new(root).serialize();
        assert!(text.contains("include=\"a&amp;b.xml\""));
        assert!(text.contains("&lt;Gear&gt; &quot;down&quot;"));
    }

    #[test]
    fn child_finds_first_element_by_name() {
        let mut item = Element::new("item");
        item.push_text("value", "DOWN", None);
        item.push_text("name", "Gear", None);
        item.push_text("value", "Three green", None);

        assert_eq!(item.child("value").map(Element::text), Some("DOWN".to_string()));
        assert_eq!(item.child("name").map(Element::text), Some("Gear".to_string()));
        assert!(item.child("marker").is_none());
        assert_eq!(item.children_named("value").count(), 2);
    }
}
