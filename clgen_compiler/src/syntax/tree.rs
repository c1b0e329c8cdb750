//! Concrete parse tree and the listener protocol used by the semantic passes
//!
//! Each [`ParseNode`] keeps its tokens and sub-rules interleaved in source
//! order, so a pass can address the pieces of a production by position:
//! for `item("Gear") { ... }` token 0 is `item` and token 2 is the quoted
//! name.

use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;
use std::fmt;

/// Grammar productions that appear in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Specification,
    Project,
    Author,
    Declaration,
    Item,
    State,
    ConditionRoot,
    AndCondition,
    OrCondition,
    BinaryCondition,
    NotCondition,
    UnaryCondition,
    IntTerminal,
    DoubleTerminal,
    BoolTerminal,
    StringTerminal,
    IdTerminal,
    ConditionalBinding,
    AssignInt,
    AssignDouble,
    AssignBool,
    AssignString,
    AssignId,
    Command,
    IntParam,
    DoubleParam,
    BoolParam,
    StringParam,
    IdParam,
    Marker,
    Checklist,
    Page,
    NormalCheck,
    Spacer,
    Subtitle,
}

impl Rule {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::IntTerminal
                | Self::DoubleTerminal
                | Self::BoolTerminal
                | Self::StringTerminal
                | Self::IdTerminal
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::AssignInt
                | Self::AssignDouble
                | Self::AssignBool
                | Self::AssignString
                | Self::AssignId
        )
    }

    pub fn is_param(self) -> bool {
        matches!(
            self,
            Self::IntParam | Self::DoubleParam | Self::BoolParam | Self::StringParam | Self::IdParam
        )
    }

    pub fn is_check(self) -> bool {
        matches!(self, Self::NormalCheck | Self::Spacer | Self::Subtitle)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseChild {
    Token(SpannedToken),
    Node(ParseNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub rule: Rule,
    /// Token diagnostics for this production point at
    pub anchor: SpannedToken,
    pub children: Vec<ParseChild>,
}

impl ParseNode {
    pub fn new(rule: Rule, anchor: SpannedToken) -> Self {
        Self {
            rule,
            anchor,
            children: Vec::new(),
        }
    }

    pub fn push_token(&mut self, token: SpannedToken) {
        self.children.push(ParseChild::Token(token));
    }

    pub fn push_node(&mut self, node: ParseNode) {
        self.children.push(ParseChild::Node(node));
    }

    /// Token at child position `index`, if that child is a token
    pub fn token(&self, index: usize) -> Option<&SpannedToken> {
        match self.children.get(index) {
            Some(ParseChild::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// Span of child `index`, falling back to the anchor
    pub fn span_of(&self, index: usize) -> Span {
        self.token(index)
            .map(|token| token.span)
            .unwrap_or(self.anchor.span)
    }

    /// Raw (still quoted) string literal at child position `index`
    pub fn string_at(&self, index: usize) -> Option<&str> {
        match self.token(index).map(|token| &token.value) {
            Some(Token::StringLiteral(raw)) => Some(raw),
            _ => None,
        }
    }

    pub fn identifier_at(&self, index: usize) -> Option<&str> {
        self.token(index).and_then(|token| token.value.as_identifier())
    }

    /// All string literal tokens directly under this node, in order
    pub fn string_literals(&self) -> impl Iterator<Item = &SpannedToken> {
        self.children.iter().filter_map(|child| match child {
            ParseChild::Token(token) if matches!(token.value, Token::StringLiteral(_)) => {
                Some(token)
            }
            _ => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter_map(|child| match child {
            ParseChild::Node(node) => Some(node),
            ParseChild::Token(_) => None,
        })
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.nodes().map(ParseNode::node_count).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.nodes().map(ParseNode::depth).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    pub root: ParseNode,
}

impl ParseTree {
    pub fn new(root: ParseNode) -> Self {
        Self { root }
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Top-level productions of the given rule
    pub fn top_level(&self, rule: Rule) -> impl Iterator<Item = &ParseNode> {
        self.root.nodes().filter(move |node| node.rule == rule)
    }
}

/// Receives enter/exit callbacks for every node during a walk
///
/// Returning an error from either hook stops the walk.
pub trait ParseListener {
    type Error;

    fn enter(&mut self, _node: &ParseNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit(&mut self, _node: &ParseNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Depth-first driver for [`ParseListener`]s
pub struct ParseTreeWalker;

impl ParseTreeWalker {
    pub fn walk<L: ParseListener + ?Sized>(
        listener: &mut L,
        tree: &ParseTree,
    ) -> Result<(), L::Error> {
        Self::walk_node(listener, &tree.root)
    }

    fn walk_node<L: ParseListener + ?Sized>(
        listener: &mut L,
        node: &ParseNode,
    ) -> Result<(), L::Error> {
        listener.enter(node)?;
        for child in node.nodes() {
            Self::walk_node(listener, child)?;
        }
        listener.exit(node)
    }
}
