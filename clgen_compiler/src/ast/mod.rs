//! Checklist abstract syntax tree
//!
//! Built once by the item and checklist passes, read-only afterwards except
//! for alias types, which are refined while items are built.

pub mod bindings;
pub mod conditions;
pub mod nodes;
pub mod value;
pub mod visitor;

pub use bindings::{Binding, CommandBinding, PropertyBinding, ValueBinding};
pub use conditions::{BinaryCondition, Condition, ConditionNode, Operator, Terminal, UnaryCondition};
pub use nodes::{
    AbstractSyntaxTree, Check, CheckKind, Checklist, Coordinate, Item, ItemTable, Marker, Page,
    State, TreeStatistics,
};
pub use value::Value;
pub use visitor::{Visitable, VisitResult, Visitor};
