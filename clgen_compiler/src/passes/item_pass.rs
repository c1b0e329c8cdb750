//! First pass: aliases, items, states, conditions and bindings
//!
//! Walks the parse tree once. Items and states are built while their blocks
//! are open and registered on exit, so a duplicate keeps the first
//! definition. Condition subtrees are built bottom-up when their root
//! (a state condition or an `if` guard) is entered; comparison, NOT and
//! grouping nodes refine alias types as they are completed, and every
//! conflict becomes a warning anchored at the operator.

use crate::ast::{
    BinaryCondition, Binding, CommandBinding, Condition, ConditionNode, Item, ItemTable, Marker,
    Operator, PropertyBinding, State, Terminal, UnaryCondition, Value, ValueBinding,
};
use crate::logging::codes;
use crate::passes::diagnostics::DiagnosticSink;
use crate::passes::error::{PassError, SemanticError};
use crate::passes::support::{identifier_child, number_child, string_child, unquote};
use crate::symbols::{Symbol, SymbolTable, TypeConflict, GLOBAL};
use crate::syntax::{ParseListener, ParseNode, ParseTree, ParseTreeWalker, Rule};
use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;
use crate::{log_debug, log_success};
use std::rc::Rc;

/// Everything the later passes need from the item definitions
#[derive(Debug, Default)]
pub struct ItemPassOutput {
    pub items: ItemTable,
    pub symbols: SymbolTable,
}

pub struct ItemPass<'a> {
    sink: &'a mut DiagnosticSink,
    items: ItemTable,
    symbols: SymbolTable,
    item: Option<Item>,
    state: Option<State>,
    guard: Option<Rc<Condition>>,
}

impl<'a> ItemPass<'a> {
    pub fn new(sink: &'a mut DiagnosticSink) -> Self {
        Self {
            sink,
            items: ItemTable::new(),
            symbols: SymbolTable::new(),
            item: None,
            state: None,
            guard: None,
        }
    }

    /// Build the item table and symbol table from `tree`
    ///
    /// Semantic problems go to `sink`; only a malformed tree fails the call.
    pub fn run(tree: &ParseTree, sink: &mut DiagnosticSink) -> Result<ItemPassOutput, PassError> {
        let mut pass = ItemPass::new(sink);
        ParseTreeWalker::walk(&mut pass, tree)?;

        log_success!(
            codes::success::ITEM_PASS_COMPLETE,
            "Item pass completed",
            "items" => pass.items.len(),
            "symbols" => pass.symbols.symbol_count(),
            "errors" => pass.sink.error_count(),
            "warnings" => pass.sink.warning_count()
        );

        Ok(ItemPassOutput {
            items: pass.items,
            symbols: pass.symbols,
        })
    }

    fn scope(&self) -> &str {
        self.item.as_ref().map_or(GLOBAL, |item| item.name.as_str())
    }

    fn warn(&mut self, conflict: TypeConflict, span: Span) {
        self.sink.report(SemanticError::type_conflict(conflict, span));
    }

    fn refine(&mut self, symbol: &Symbol, value: &Value, span: Span) {
        if let Err(conflict) = symbol.refine(value.ty()) {
            self.warn(conflict, span);
        }
    }

    /// Resolve an alias in the current scope, reporting it when undefined
    fn lookup(&mut self, token: &SpannedToken) -> Result<Rc<Symbol>, PassError> {
        let identifier = token
            .value
            .as_identifier()
            .ok_or_else(|| PassError::malformed(Rule::IdTerminal, "an identifier", 0))?;

        if let Some(symbol) = self.symbols.lookup(self.scope(), identifier) {
            return Ok(symbol);
        }

        let error = SemanticError::UndefinedAlias {
            alias: identifier.to_string(),
            scope: self.scope().to_string(),
            span: token.span,
        };
        self.sink.report(error);
        Ok(Rc::new(Symbol::placeholder(identifier)))
    }

    fn value_of(&mut self, node: &ParseNode, index: usize) -> Result<Value, PassError> {
        let token = node
            .token(index)
            .ok_or_else(|| PassError::malformed(node.rule, "a value", index))?;

        Ok(match &token.value {
            Token::Integer(i) => Value::Int(*i),
            Token::Double(d) => Value::Double(*d),
            Token::Boolean(b) => Value::Bool(*b),
            Token::StringLiteral(raw) => Value::String(unquote(raw)?),
            Token::Identifier(_) => Value::Symbol(self.lookup(token)?),
            _ => return Err(PassError::malformed(node.rule, "a value", index)),
        })
    }

    // === DECLARATIONS ===

    fn declare(&mut self, node: &ParseNode) -> Result<(), PassError> {
        let alias = identifier_child(node, 0)?.to_string();
        let expansion = string_child(node, 2)?;
        let scope = self.scope().to_string();

        log_debug!("Declaring alias", "alias" => &alias, "scope" => &scope);
        if let Err(error) = self.symbols.add(&scope, Symbol::new(alias, expansion)) {
            self.sink
                .report(SemanticError::from_symbol_error(error, node.span_of(0)));
        }
        Ok(())
    }

    fn finish_item(&mut self, node: &ParseNode) {
        let Some(item) = self.item.take() else {
            return;
        };
        if self.items.contains(&item.name) {
            self.sink.report(SemanticError::DuplicateItem {
                name: item.name,
                span: node.span_of(0),
            });
        } else {
            self.items.insert(item);
        }
    }

    fn finish_state(&mut self, node: &ParseNode) {
        let Some(state) = self.state.take() else {
            return;
        };
        let Some(item) = self.item.as_mut() else {
            return;
        };
        if item.has_state(&state.name) {
            let error = SemanticError::DuplicateState {
                state: state.name,
                item: item.name.clone(),
                span: node.span_of(2),
            };
            self.sink.report(error);
        } else {
            item.add_state(state);
        }
    }

    fn set_marker(&mut self, node: &ParseNode) -> Result<(), PassError> {
        let marker = Marker::new(
            number_child(node, 2)?,
            number_child(node, 4)?,
            number_child(node, 6)?,
            number_child(node, 8)?,
        );
        if let Some(item) = self.item.as_mut() {
            item.marker = Some(marker);
        }
        Ok(())
    }

    // === CONDITIONS ===

    fn first_node(node: &ParseNode) -> Result<&ParseNode, PassError> {
        node.nodes()
            .next()
            .ok_or_else(|| PassError::malformed(node.rule, "a condition", 0))
    }

    fn build_root(&mut self, node: &ParseNode) -> Result<Condition, PassError> {
        let child = self.build_condition(Self::first_node(node)?)?;
        Ok(Condition::new(child))
    }

    fn build_condition(&mut self, node: &ParseNode) -> Result<ConditionNode, PassError> {
        match node.rule {
            Rule::AndCondition | Rule::OrCondition | Rule::BinaryCondition => {
                let mut operands = node.nodes();
                let (Some(lhs), Some(rhs)) = (operands.next(), operands.next()) else {
                    return Err(PassError::malformed(node.rule, "two operands", 0));
                };
                let operator = Operator::from_token(&node.anchor.value)
                    .ok_or_else(|| PassError::malformed(node.rule, "an operator", 1))?;

                let lhs = self.build_condition(lhs)?;
                let rhs = self.build_condition(rhs)?;
                let binary = BinaryCondition::new(operator, lhs, rhs);
                if node.rule == Rule::BinaryCondition {
                    if let Err(conflict) = binary.resolve_types() {
                        self.warn(conflict, node.anchor.span);
                    }
                }
                Ok(ConditionNode::Binary(binary))
            }
            Rule::NotCondition | Rule::UnaryCondition => {
                let operand = self.build_condition(Self::first_node(node)?)?;
                let operator = (node.rule == Rule::NotCondition).then_some(Operator::Not);
                let unary = UnaryCondition::new(operator, operand);
                if let Err(conflict) = unary.resolve_types() {
                    self.warn(conflict, node.anchor.span);
                }
                Ok(ConditionNode::Unary(unary))
            }
            rule if rule.is_terminal() => {
                let value = self.value_of(node, 0)?;
                Ok(ConditionNode::Terminal(Terminal::new(value)))
            }
            _ => Err(PassError::malformed(node.rule, "a condition", 0)),
        }
    }

    // === BINDINGS ===

    fn push_binding(&mut self, binding: Binding) {
        if let Some(state) = self.state.as_mut() {
            state.bindings.push(binding);
        }
    }

    fn assign(&mut self, node: &ParseNode) -> Result<(), PassError> {
        let target_token = node
            .token(0)
            .ok_or_else(|| PassError::malformed(node.rule, "an identifier", 0))?;
        let target = self.lookup(target_token)?;
        let value = self.value_of(node, 2)?;
        let assign_span = node.span_of(1);

        let binding = match value {
            Value::Symbol(source) => {
                if !source.ty().is_null() {
                    if let Err(conflict) = target.refine(source.ty()) {
                        self.warn(conflict, assign_span);
                    }
                }
                Binding::Property(PropertyBinding {
                    target,
                    source,
                    guard: self.guard.clone(),
                })
            }
            value => {
                self.refine(&target, &value, assign_span);
                Binding::Value(ValueBinding {
                    symbol: target,
                    value,
                    guard: self.guard.clone(),
                })
            }
        };
        self.push_binding(binding);
        Ok(())
    }

    fn command(&mut self, node: &ParseNode) -> Result<(), PassError> {
        let mut command = CommandBinding::new(string_child(node, 2)?, self.guard.clone());
        for param in node.nodes().filter(|child| child.rule.is_param()) {
            let name = identifier_child(param, 0)?.to_string();
            let value = self.value_of(param, 2)?;
            command.add_param(name, value);
        }

        let property = command.param("property").and_then(Value::as_symbol).cloned();
        if let (Some(symbol), Some(value)) = (property, command.param("value").cloned()) {
            self.refine(&symbol, &value, node.span_of(0));
        }

        self.push_binding(Binding::Command(command));
        Ok(())
    }
}

impl ParseListener for ItemPass<'_> {
    type Error = PassError;

    fn enter(&mut self, node: &ParseNode) -> Result<(), PassError> {
        match node.rule {
            Rule::Item => self.item = Some(Item::new(string_child(node, 2)?)),
            Rule::Declaration => self.declare(node)?,
            Rule::State => self.state = Some(State::new(string_child(node, 2)?)),
            Rule::ConditionRoot => {
                let condition = self.build_root(node)?;
                if let Some(state) = self.state.as_mut() {
                    state.condition = Some(condition);
                }
            }
            Rule::ConditionalBinding => {
                let guard = self.build_root(node)?;
                self.guard = Some(Rc::new(guard));
            }
            rule if rule.is_assignment() => self.assign(node)?,
            Rule::Command => self.command(node)?,
            Rule::Marker => self.set_marker(node)?,
            _ => {}
        }
        Ok(())
    }

    fn exit(&mut self, node: &ParseNode) -> Result<(), PassError> {
        match node.rule {
            Rule::Item => self.finish_item(node),
            Rule::State => self.finish_state(node),
            Rule::ConditionalBinding => self.guard = None,
            _ => {}
        }
        Ok(())
    }
}
