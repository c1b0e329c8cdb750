//! Boolean condition trees guarding states and bindings

use crate::ast::value::Value;
use crate::symbols::{Type, TypeConflict};
use crate::tokens::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Operator {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::AndAnd => Some(Self::And),
            Token::OrOr => Some(Self::Or),
            Token::Not => Some(Self::Not),
            Token::EqualEqual => Some(Self::Equals),
            Token::NotEquals => Some(Self::NotEquals),
            Token::GreaterThan => Some(Self::GreaterThan),
            Token::LessThan => Some(Self::LessThan),
            Token::GreaterThanOrEqual => Some(Self::GreaterThanOrEqual),
            Token::LessThanOrEqual => Some(Self::LessThanOrEqual),
            _ => None,
        }
    }

    /// Element name in the markup output
    pub fn markup_tag(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Equals => "equals",
            Self::NotEquals => "not-equals",
            Self::GreaterThan => "greater-than",
            Self::LessThan => "less-than",
            Self::GreaterThanOrEqual => "greater-than-equals",
            Self::LessThanOrEqual => "less-than-equals",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
        }
    }
}

/// Transparent root wrapper with exactly one child
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub child: ConditionNode,
}

impl Condition {
    pub fn new(child: ConditionNode) -> Self {
        Self { child }
    }

    pub fn ty(&self) -> Type {
        self.child.ty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Binary(BinaryCondition),
    Unary(UnaryCondition),
    Terminal(Terminal),
}

impl ConditionNode {
    pub fn ty(&self) -> Type {
        match self {
            Self::Binary(binary) => binary.ty(),
            Self::Unary(unary) => unary.ty(),
            Self::Terminal(terminal) => terminal.ty(),
        }
    }

    fn as_symbol_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal(terminal) if terminal.value.is_symbol() => Some(terminal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryCondition {
    pub operator: Operator,
    pub lhs: Box<ConditionNode>,
    pub rhs: Box<ConditionNode>,
}

impl BinaryCondition {
    pub fn new(operator: Operator, lhs: ConditionNode, rhs: ConditionNode) -> Self {
        Self {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Null if both sides are Null, otherwise the right side's type unless
    /// it is Null
    pub fn ty(&self) -> Type {
        let (lhs, rhs) = (self.lhs.ty(), self.rhs.ty());
        if !rhs.is_null() {
            rhs
        } else {
            lhs
        }
    }

    /// Refine every alias operand to this condition's type
    ///
    /// Both operands are refined; the first conflict is returned.
    pub fn resolve_types(&self) -> Result<(), TypeConflict> {
        let ty = self.ty();
        let mut first_conflict = None;
        for operand in [&self.lhs, &self.rhs] {
            if let Some(terminal) = operand.as_symbol_terminal() {
                if let Err(conflict) = terminal.refine(ty) {
                    first_conflict.get_or_insert(conflict);
                }
            }
        }
        first_conflict.map_or(Ok(()), Err)
    }
}

/// `NOT` operand, or a transparent grouping when `operator` is `None`
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryCondition {
    pub operator: Option<Operator>,
    pub operand: Box<ConditionNode>,
}

impl UnaryCondition {
    pub fn new(operator: Option<Operator>, operand: ConditionNode) -> Self {
        Self {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn is_grouping(&self) -> bool {
        self.operator.is_none()
    }

    pub fn ty(&self) -> Type {
        Type::Bool
    }

    pub fn resolve_types(&self) -> Result<(), TypeConflict> {
        match self.operand.as_symbol_terminal() {
            Some(terminal) => terminal.refine(self.ty()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub value: Value,
}

impl Terminal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn ty(&self) -> Type {
        self.value.ty()
    }

    fn refine(&self, ty: Type) -> Result<(), TypeConflict> {
        match self.value.as_symbol() {
            Some(symbol) => symbol.refine(ty),
            None => Ok(()),
        }
    }
}
