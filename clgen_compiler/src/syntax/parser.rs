//! Recursive descent parser producing a [`ParseTree`]
//!
//! The parser stops at the first syntax error. Nesting of conditions and
//! blocks is bounded by the compile-time `MAX_PARSE_DEPTH`.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::log_error;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::syntax::tree::{ParseNode, ParseTree, Rule};
use crate::tokens::{Keyword, SpannedToken, Token, TokenStream};

pub struct ChecklistParser {
    tokens: TokenStream,
    depth: usize,
}

impl ChecklistParser {
    pub fn new(tokens: TokenStream) -> Self {
        Self { tokens, depth: 0 }
    }

    /// specification : (project | author | declaration | item | checklist)* EOF
    pub fn parse_specification(&mut self) -> SyntaxResult<ParseTree> {
        let first = self.current()?.clone();
        let mut root = ParseNode::new(Rule::Specification, first);

        loop {
            let current = self.current()?;
            let node = match &current.value {
                Token::Eof => break,
                Token::Keyword(Keyword::Project) => self.parse_metadata(Rule::Project)?,
                Token::Keyword(Keyword::Author) => self.parse_metadata(Rule::Author)?,
                Token::Keyword(Keyword::Item) => self.parse_item()?,
                Token::Keyword(Keyword::Checklist) => self.parse_checklist()?,
                Token::Identifier(_) => self.parse_declaration()?,
                _ => {
                    return Err(self.unexpected(
                        "'project', 'author', 'item', 'checklist' or an alias declaration",
                    ))
                }
            };
            root.push_node(node);
        }

        let eof = self.bump()?;
        root.push_token(eof);
        Ok(ParseTree::new(root))
    }

    // === TOKEN HELPERS ===

    fn current(&self) -> SyntaxResult<&SpannedToken> {
        self.tokens.current().ok_or_else(|| {
            SyntaxError::unexpected_end_of_input("more input", self.tokens.last_span())
        })
    }

    fn check(&self, expected: &Token) -> bool {
        self.tokens.current_token() == Some(expected)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(&Token::Keyword(keyword))
    }

    fn bump(&mut self) -> SyntaxResult<SpannedToken> {
        let token = self.current()?.clone();
        self.tokens.advance();
        Ok(token)
    }

    /// Error for the current token, or end of input
    fn unexpected(&self, expected: &str) -> SyntaxError {
        match self.tokens.current() {
            Some(current) if matches!(current.value, Token::Eof) => {
                SyntaxError::unexpected_end_of_input(expected, current.span)
            }
            Some(current) => SyntaxError::unexpected_token(
                expected,
                &current.value.as_source_string(),
                current.span,
            ),
            None => SyntaxError::unexpected_end_of_input(expected, self.tokens.last_span()),
        }
    }

    /// Consume exactly `expected` (punctuation, operator or keyword)
    fn expect(&mut self, expected: Token) -> SyntaxResult<SpannedToken> {
        if self.check(&expected) {
            self.bump()
        } else {
            Err(self.unexpected(&format!("'{}'", expected.as_source_string())))
        }
    }

    fn expect_string(&mut self) -> SyntaxResult<SpannedToken> {
        match self.current()?.value {
            Token::StringLiteral(_) => self.bump(),
            _ => Err(self.unexpected("a quoted string")),
        }
    }

    fn expect_identifier(&mut self) -> SyntaxResult<SpannedToken> {
        match self.current()?.value {
            Token::Identifier(_) => self.bump(),
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn expect_number(&mut self) -> SyntaxResult<SpannedToken> {
        match self.current()?.value {
            Token::Integer(_) | Token::Double(_) => self.bump(),
            _ => Err(self.unexpected("a number")),
        }
    }

    fn descend(&mut self) -> SyntaxResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            let span = self.current()?.span;
            let error = SyntaxError::max_recursion_depth(span);
            log_error!(error.error_code(), "Maximum parser nesting depth exceeded",
                span = span,
                "max_depth" => MAX_PARSE_DEPTH
            );
            return Err(error);
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // === TOP-LEVEL PRODUCTIONS ===

    /// project | author : keyword '(' STRING ')' ';'
    fn parse_metadata(&mut self, rule: Rule) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(rule, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_string()?);
        node.push_token(self.expect(Token::RightParen)?);
        node.push_token(self.expect(Token::Semicolon)?);
        Ok(node)
    }

    /// declaration : ID '=' STRING ';'
    fn parse_declaration(&mut self) -> SyntaxResult<ParseNode> {
        let id = self.expect_identifier()?;
        let mut node = ParseNode::new(Rule::Declaration, id.clone());
        node.push_token(id);
        node.push_token(self.expect(Token::Assign)?);
        node.push_token(self.expect_string()?);
        node.push_token(self.expect(Token::Semicolon)?);
        Ok(node)
    }

    /// item : 'item' '(' STRING ')' '{' (declaration | state | marker)* '}'
    fn parse_item(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::Item, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_string()?);
        node.push_token(self.expect(Token::RightParen)?);
        node.push_token(self.expect(Token::LeftBrace)?);

        self.descend()?;
        while !self.check(&Token::RightBrace) {
            let child = match &self.current()?.value {
                Token::Identifier(_) => self.parse_declaration()?,
                Token::Keyword(Keyword::State) => self.parse_state()?,
                Token::Keyword(Keyword::Marker) => self.parse_marker()?,
                _ => return Err(self.unexpected("'state', 'marker', an alias declaration or '}'")),
            };
            node.push_node(child);
        }
        self.ascend();

        node.push_token(self.expect(Token::RightBrace)?);
        Ok(node)
    }

    /// state : 'state' '(' STRING (',' condition)? ')' ('{' binding* '}' | ';')
    fn parse_state(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::State, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_string()?);

        if self.check(&Token::Comma) {
            node.push_token(self.bump()?);
            let condition = self.parse_condition()?;
            let mut root = ParseNode::new(Rule::ConditionRoot, condition.anchor.clone());
            root.push_node(condition);
            node.push_node(root);
        }
        node.push_token(self.expect(Token::RightParen)?);

        if self.check(&Token::Semicolon) {
            node.push_token(self.bump()?);
            return Ok(node);
        }

        node.push_token(self.expect(Token::LeftBrace)?);
        self.descend()?;
        while !self.check(&Token::RightBrace) {
            let binding = if self.check_keyword(Keyword::If) {
                self.parse_conditional_binding()?
            } else {
                self.parse_simple_binding("an assignment, 'command', 'if' or '}'")?
            };
            node.push_node(binding);
        }
        self.ascend();
        node.push_token(self.expect(Token::RightBrace)?);
        Ok(node)
    }

    /// marker : 'marker' '(' num ',' num ',' num ',' num ')' ';'
    fn parse_marker(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::Marker, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_number()?);
        for _ in 0..3 {
            node.push_token(self.expect(Token::Comma)?);
            node.push_token(self.expect_number()?);
        }
        node.push_token(self.expect(Token::RightParen)?);
        node.push_token(self.expect(Token::Semicolon)?);
        Ok(node)
    }

    // === BINDINGS ===

    /// assignment ';' | command ';'
    fn parse_simple_binding(&mut self, expected: &str) -> SyntaxResult<ParseNode> {
        let mut node = match &self.current()?.value {
            Token::Identifier(_) => self.parse_assignment()?,
            Token::Keyword(Keyword::Command) => self.parse_command()?,
            _ => return Err(self.unexpected(expected)),
        };
        node.push_token(self.expect(Token::Semicolon)?);
        Ok(node)
    }

    /// 'if' '(' condition ')' '{' (assignment ';' | command ';')* '}'
    fn parse_conditional_binding(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::ConditionalBinding, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_node(self.parse_condition()?);
        node.push_token(self.expect(Token::RightParen)?);
        node.push_token(self.expect(Token::LeftBrace)?);
        self.descend()?;
        while !self.check(&Token::RightBrace) {
            node.push_node(self.parse_simple_binding("an assignment, 'command' or '}'")?);
        }
        self.ascend();
        node.push_token(self.expect(Token::RightBrace)?);
        Ok(node)
    }

    /// assignment : ID '=' (INT | DOUBLE | BOOL | STRING | ID)
    fn parse_assignment(&mut self) -> SyntaxResult<ParseNode> {
        let id = self.expect_identifier()?;
        let assign = self.expect(Token::Assign)?;
        let rule = match &self.current()?.value {
            Token::Integer(_) => Rule::AssignInt,
            Token::Double(_) => Rule::AssignDouble,
            Token::Boolean(_) => Rule::AssignBool,
            Token::StringLiteral(_) => Rule::AssignString,
            Token::Identifier(_) => Rule::AssignId,
            _ => return Err(self.unexpected("a value or alias")),
        };
        let value = self.bump()?;

        let mut node = ParseNode::new(rule, id.clone());
        node.push_token(id);
        node.push_token(assign);
        node.push_token(value);
        Ok(node)
    }

    /// command : 'command' '(' STRING (',' ID '=' value)* ')'
    fn parse_command(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::Command, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_string()?);
        while self.check(&Token::Comma) {
            node.push_token(self.bump()?);
            node.push_node(self.parse_param()?);
        }
        node.push_token(self.expect(Token::RightParen)?);
        Ok(node)
    }

    fn parse_param(&mut self) -> SyntaxResult<ParseNode> {
        let name = self.expect_identifier()?;
        let assign = self.expect(Token::Assign)?;
        let rule = match &self.current()?.value {
            Token::Integer(_) => Rule::IntParam,
            Token::Double(_) => Rule::DoubleParam,
            Token::Boolean(_) => Rule::BoolParam,
            Token::StringLiteral(_) => Rule::StringParam,
            Token::Identifier(_) => Rule::IdParam,
            _ => return Err(self.unexpected("a parameter value")),
        };
        let value = self.bump()?;

        let mut node = ParseNode::new(rule, name.clone());
        node.push_token(name);
        node.push_token(assign);
        node.push_token(value);
        Ok(node)
    }

    // === CONDITIONS ===

    /// condition : and ('||' and)*
    fn parse_condition(&mut self) -> SyntaxResult<ParseNode> {
        self.descend()?;
        let mut lhs = self.parse_and()?;
        while self.check(&Token::OrOr) {
            let op = self.bump()?;
            let rhs = self.parse_and()?;
            lhs = Self::binary(Rule::OrCondition, lhs, op, rhs);
        }
        self.ascend();
        Ok(lhs)
    }

    /// and : comparison ('&&' comparison)*
    fn parse_and(&mut self) -> SyntaxResult<ParseNode> {
        let mut lhs = self.parse_comparison()?;
        while self.check(&Token::AndAnd) {
            let op = self.bump()?;
            let rhs = self.parse_comparison()?;
            lhs = Self::binary(Rule::AndCondition, lhs, op, rhs);
        }
        Ok(lhs)
    }

    /// comparison : unary (op unary)?
    ///
    /// A lone terminal is wrapped in an operator-less `UnaryCondition`.
    fn parse_comparison(&mut self) -> SyntaxResult<ParseNode> {
        let lhs = self.parse_unary()?;
        let is_comparison = self
            .tokens
            .current_token()
            .is_some_and(Token::is_comparison_operator);

        if is_comparison {
            let op = self.bump()?;
            let rhs = self.parse_unary()?;
            return Ok(Self::binary(Rule::BinaryCondition, lhs, op, rhs));
        }

        if lhs.rule.is_terminal() {
            let mut unary = ParseNode::new(Rule::UnaryCondition, lhs.anchor.clone());
            unary.push_node(lhs);
            return Ok(unary);
        }
        Ok(lhs)
    }

    /// unary : '!' unary | '(' condition ')' | terminal
    fn parse_unary(&mut self) -> SyntaxResult<ParseNode> {
        self.descend()?;
        let current = self.current()?.clone();
        let node = match &current.value {
            Token::Not => {
                let not = self.bump()?;
                let mut node = ParseNode::new(Rule::NotCondition, not.clone());
                node.push_token(not);
                node.push_node(self.parse_unary()?);
                node
            }
            Token::LeftParen => {
                let open = self.bump()?;
                let mut node = ParseNode::new(Rule::UnaryCondition, open.clone());
                node.push_token(open);
                node.push_node(self.parse_condition()?);
                node.push_token(self.expect(Token::RightParen)?);
                node
            }
            value => {
                let rule = match value {
                    Token::Integer(_) => Rule::IntTerminal,
                    Token::Double(_) => Rule::DoubleTerminal,
                    Token::Boolean(_) => Rule::BoolTerminal,
                    Token::StringLiteral(_) => Rule::StringTerminal,
                    Token::Identifier(_) => Rule::IdTerminal,
                    _ => return Err(self.unexpected("a condition")),
                };
                let token = self.bump()?;
                let mut node = ParseNode::new(rule, token.clone());
                node.push_token(token);
                node
            }
        };
        self.ascend();
        Ok(node)
    }

    fn binary(rule: Rule, lhs: ParseNode, op: SpannedToken, rhs: ParseNode) -> ParseNode {
        let mut node = ParseNode::new(rule, op.clone());
        node.push_node(lhs);
        node.push_token(op);
        node.push_node(rhs);
        node
    }

    // === CHECKLISTS ===

    /// checklist : 'checklist' '(' STRING ')' '{' (page+ | check*) '}'
    fn parse_checklist(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::Checklist, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftParen)?);
        node.push_token(self.expect_string()?);
        node.push_token(self.expect(Token::RightParen)?);
        node.push_token(self.expect(Token::LeftBrace)?);

        // Either every entry is a page or none is
        self.descend()?;
        let paged = self.check_keyword(Keyword::Page);
        while !self.check(&Token::RightBrace) {
            let child = if paged {
                if !self.check_keyword(Keyword::Page) {
                    return Err(self.unexpected("'page' or '}'"));
                }
                self.parse_page()?
            } else {
                if self.check_keyword(Keyword::Page) {
                    return Err(self.unexpected("'check', 'text' or '}'"));
                }
                self.parse_check("'page', 'check', 'text' or '}'")?
            };
            node.push_node(child);
        }
        self.ascend();

        node.push_token(self.expect(Token::RightBrace)?);
        Ok(node)
    }

    /// page : 'page' '{' check* '}'
    fn parse_page(&mut self) -> SyntaxResult<ParseNode> {
        let keyword = self.bump()?;
        let mut node = ParseNode::new(Rule::Page, keyword.clone());
        node.push_token(keyword);
        node.push_token(self.expect(Token::LeftBrace)?);
        while !self.check(&Token::RightBrace) {
            node.push_node(self.parse_check("'check', 'text' or '}'")?);
        }
        node.push_token(self.expect(Token::RightBrace)?);
        Ok(node)
    }

    /// check : 'check' '(' STRING ',' STRING (',' STRING)* ')' ';'
    ///       | 'text' '(' ')' ';'
    ///       | 'text' '(' STRING ')' ';'
    fn parse_check(&mut self, expected: &str) -> SyntaxResult<ParseNode> {
        let mut node = match &self.current()?.value {
            Token::Keyword(Keyword::Check) => {
                let keyword = self.bump()?;
                let mut node = ParseNode::new(Rule::NormalCheck, keyword.clone());
                node.push_token(keyword);
                node.push_token(self.expect(Token::LeftParen)?);
                node.push_token(self.expect_string()?);
                node.push_token(self.expect(Token::Comma)?);
                node.push_token(self.expect_string()?);
                while self.check(&Token::Comma) {
                    node.push_token(self.bump()?);
                    node.push_token(self.expect_string()?);
                }
                node.push_token(self.expect(Token::RightParen)?);
                node
            }
            Token::Keyword(Keyword::Text) => {
                let keyword = self.bump()?;
                let open = self.expect(Token::LeftParen)?;
                let rule = if self.check(&Token::RightParen) {
                    Rule::Spacer
                } else {
                    Rule::Subtitle
                };
                let mut node = ParseNode::new(rule, keyword.clone());
                node.push_token(keyword);
                node.push_token(open);
                if rule == Rule::Subtitle {
                    node.push_token(self.expect_string()?);
                }
                node.push_token(self.expect(Token::RightParen)?);
                node
            }
            _ => return Err(self.unexpected(expected)),
        };
        node.push_token(self.expect(Token::Semicolon)?);
        Ok(node)
    }
}
