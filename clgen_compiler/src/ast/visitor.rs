//! Depth-first traversal over the checklist tree
//!
//! Every node kind has an `enter_*`/`exit_*` pair on [`Visitor`]; both
//! default to doing nothing so a visitor overrides only what it needs.
//! [`Visitable::accept`] calls `enter`, walks the children in stored order,
//! then calls `exit`. An error from any hook stops the walk.

use crate::ast::bindings::{Binding, CommandBinding, PropertyBinding, ValueBinding};
use crate::ast::conditions::{BinaryCondition, Condition, ConditionNode, Terminal, UnaryCondition};
use crate::ast::nodes::{AbstractSyntaxTree, Check, CheckKind, Checklist, Item, Marker, Page, State};
use crate::backend::BackendError;

pub type VisitResult = Result<(), BackendError>;

#[allow(unused_variables)]
pub trait Visitor {
    fn enter_tree(&mut self, tree: &AbstractSyntaxTree) -> VisitResult {
        Ok(())
    }
    fn exit_tree(&mut self, tree: &AbstractSyntaxTree) -> VisitResult {
        Ok(())
    }

    fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        Ok(())
    }
    fn exit_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        Ok(())
    }

    fn enter_page(&mut self, page: &Page) -> VisitResult {
        Ok(())
    }
    fn exit_page(&mut self, page: &Page) -> VisitResult {
        Ok(())
    }

    fn enter_check(&mut self, check: &Check) -> VisitResult {
        Ok(())
    }
    fn exit_check(&mut self, check: &Check) -> VisitResult {
        Ok(())
    }

    fn enter_item(&mut self, item: &Item) -> VisitResult {
        Ok(())
    }
    fn exit_item(&mut self, item: &Item) -> VisitResult {
        Ok(())
    }

    fn enter_marker(&mut self, marker: &Marker) -> VisitResult {
        Ok(())
    }
    fn exit_marker(&mut self, marker: &Marker) -> VisitResult {
        Ok(())
    }

    fn enter_state(&mut self, state: &State) -> VisitResult {
        Ok(())
    }
    fn exit_state(&mut self, state: &State) -> VisitResult {
        Ok(())
    }

    fn enter_condition(&mut self, condition: &Condition) -> VisitResult {
        Ok(())
    }
    fn exit_condition(&mut self, condition: &Condition) -> VisitResult {
        Ok(())
    }

    fn enter_binary_condition(&mut self, condition: &BinaryCondition) -> VisitResult {
        Ok(())
    }
    fn exit_binary_condition(&mut self, condition: &BinaryCondition) -> VisitResult {
        Ok(())
    }

    fn enter_unary_condition(&mut self, condition: &UnaryCondition) -> VisitResult {
        Ok(())
    }
    fn exit_unary_condition(&mut self, condition: &UnaryCondition) -> VisitResult {
        Ok(())
    }

    fn enter_terminal(&mut self, terminal: &Terminal) -> VisitResult {
        Ok(())
    }
    fn exit_terminal(&mut self, terminal: &Terminal) -> VisitResult {
        Ok(())
    }

    fn enter_value_binding(&mut self, binding: &ValueBinding) -> VisitResult {
        Ok(())
    }
    fn exit_value_binding(&mut self, binding: &ValueBinding) -> VisitResult {
        Ok(())
    }

    fn enter_property_binding(&mut self, binding: &PropertyBinding) -> VisitResult {
        Ok(())
    }
    fn exit_property_binding(&mut self, binding: &PropertyBinding) -> VisitResult {
        Ok(())
    }

    fn enter_command_binding(&mut self, binding: &CommandBinding) -> VisitResult {
        Ok(())
    }
    fn exit_command_binding(&mut self, binding: &CommandBinding) -> VisitResult {
        Ok(())
    }
}

pub trait Visitable {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult;
}

impl Visitable for AbstractSyntaxTree {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_tree(self)?;
        for checklist in &self.checklists {
            checklist.accept(visitor)?;
        }
        visitor.exit_tree(self)
    }
}

impl Visitable for Checklist {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_checklist(self)?;
        for page in &self.pages {
            page.accept(visitor)?;
        }
        visitor.exit_checklist(self)
    }
}

impl Visitable for Page {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_page(self)?;
        for check in &self.checks {
            check.accept(visitor)?;
        }
        visitor.exit_page(self)
    }
}

impl Visitable for Check {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_check(self)?;
        if let CheckKind::Normal { item, state } = &self.kind {
            item.accept(visitor)?;
            state.accept(visitor)?;
        }
        visitor.exit_check(self)
    }
}

impl Visitable for Item {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_item(self)?;
        if let Some(marker) = &self.marker {
            visitor.enter_marker(marker)?;
            visitor.exit_marker(marker)?;
        }
        visitor.exit_item(self)
    }
}

impl Visitable for State {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_state(self)?;
        if let Some(condition) = &self.condition {
            condition.accept(visitor)?;
        }
        for binding in &self.bindings {
            binding.accept(visitor)?;
        }
        visitor.exit_state(self)
    }
}

impl Visitable for Binding {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        match self {
            Binding::Value(binding) => {
                visitor.enter_value_binding(binding)?;
                if let Some(guard) = &binding.guard {
                    guard.accept(visitor)?;
                }
                visitor.exit_value_binding(binding)
            }
            Binding::Property(binding) => {
                visitor.enter_property_binding(binding)?;
                if let Some(guard) = &binding.guard {
                    guard.accept(visitor)?;
                }
                visitor.exit_property_binding(binding)
            }
            Binding::Command(binding) => {
                visitor.enter_command_binding(binding)?;
                if let Some(guard) = &binding.guard {
                    guard.accept(visitor)?;
                }
                visitor.exit_command_binding(binding)
            }
        }
    }
}

impl Visitable for Condition {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        visitor.enter_condition(self)?;
        self.child.accept(visitor)?;
        visitor.exit_condition(self)
    }
}

impl Visitable for ConditionNode {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        match self {
            ConditionNode::Binary(binary) => {
                visitor.enter_binary_condition(binary)?;
                binary.lhs.accept(visitor)?;
                binary.rhs.accept(visitor)?;
                visitor.exit_binary_condition(binary)
            }
            ConditionNode::Unary(unary) => {
                visitor.enter_unary_condition(unary)?;
                unary.operand.accept(visitor)?;
                visitor.exit_unary_condition(unary)
            }
            ConditionNode::Terminal(terminal) => {
                visitor.enter_terminal(terminal)?;
                visitor.exit_terminal(terminal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::conditions::Operator;
    use crate::ast::value::Value;
    use crate::symbols::Symbol;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
            self.events.push(format!("checklist {}", checklist.title));
            Ok(())
        }
        fn enter_check(&mut self, _: &Check) -> VisitResult {
            self.events.push("check".into());
            Ok(())
        }
        fn exit_check(&mut self, _: &Check) -> VisitResult {
            self.events.push("/check".into());
            Ok(())
        }
        fn enter_item(&mut self, item: &Item) -> VisitResult {
            self.events.push(format!("item {}", item.name));
            Ok(())
        }
        fn enter_marker(&mut self, _: &Marker) -> VisitResult {
            self.events.push("marker".into());
            Ok(())
        }
        fn enter_state(&mut self, state: &State) -> VisitResult {
            self.events.push(format!("state {}", state.name));
            Ok(())
        }
        fn enter_binary_condition(&mut self, c: &BinaryCondition) -> VisitResult {
            self.events.push(c.operator.markup_tag().into());
            Ok(())
        }
        fn enter_terminal(&mut self, t: &Terminal) -> VisitResult {
            self.events.push(format!("terminal {}", t.value));
            Ok(())
        }
        fn enter_value_binding(&mut self, _: &ValueBinding) -> VisitResult {
            self.events.push("assign".into());
            Ok(())
        }
    }

    #[test]
    fn walks_children_in_stored_order() {
        let gear = Rc::new(Symbol::new("gear", "/gear"));
        let mut state = State::new("DOWN");
        state.condition = Some(Condition::new(ConditionNode::Binary(BinaryCondition::new(
            Operator::Equals,
            ConditionNode::Terminal(Terminal::new(Value::Symbol(Rc::clone(&gear)))),
            ConditionNode::Terminal(Terminal::new(Value::Int(1))),
        ))));
        state.bindings.push(Binding::Value(ValueBinding {
            symbol: gear,
            value: Value::Int(1),
            guard: None,
        }));

        let mut item = Item::new("Gear");
        item.marker = Some(Marker::new(0.0, 1.0, 2.0, 1.5));
        item.add_state(state);
        let item = Rc::new(item);

        let mut checklist = Checklist::new("Landing");
        checklist.add_check(Check::spacer());
        checklist.add_check(Check::new(
            Rc::clone(&item),
            item.state("DOWN").unwrap(),
            vec![],
        ));
        let tree = AbstractSyntaxTree {
            checklists: vec![checklist],
            ..AbstractSyntaxTree::default()
        };

        let mut recorder = Recorder::default();
        tree.accept(&mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "checklist Landing",
                "check",
                "/check",
                "check",
                "item Gear",
                "marker",
                "state DOWN",
                "equals",
                "terminal /gear",
                "terminal 1",
                "assign",
                "/check",
            ]
        );
    }

    #[test]
    fn hook_error_stops_the_walk() {
        struct Failing(usize);
        impl Visitor for Failing {
            fn enter_check(&mut self, _: &Check) -> VisitResult {
                self.0 += 1;
                Err(BackendError::malformed("stop"))
            }
        }

        let mut checklist = Checklist::new("A");
        checklist.add_check(Check::spacer());
        checklist.add_check(Check::spacer());
        let tree = AbstractSyntaxTree {
            checklists: vec![checklist],
            ..AbstractSyntaxTree::default()
        };
        let mut visitor = Failing(0);
        assert!(tree.accept(&mut visitor).is_err());
        assert_eq!(visitor.0, 1);
    }
}
