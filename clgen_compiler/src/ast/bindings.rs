//! Actions attached to a state, each with an optional guard condition

use crate::ast::conditions::Condition;
use crate::ast::value::Value;
use crate::symbols::Symbol;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(ValueBinding),
    Property(PropertyBinding),
    Command(CommandBinding),
}

impl Binding {
    pub fn guard(&self) -> Option<&Rc<Condition>> {
        match self {
            Self::Value(binding) => binding.guard.as_ref(),
            Self::Property(binding) => binding.guard.as_ref(),
            Self::Command(binding) => binding.guard.as_ref(),
        }
    }
}

/// Assign a literal to an alias
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBinding {
    pub symbol: Rc<Symbol>,
    pub value: Value,
    pub guard: Option<Rc<Condition>>,
}

/// Copy the value of one alias's property into another
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBinding {
    pub target: Rc<Symbol>,
    pub source: Rc<Symbol>,
    pub guard: Option<Rc<Condition>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandBinding {
    pub command: String,
    /// Parameters in source order
    pub params: Vec<(String, Value)>,
    pub guard: Option<Rc<Condition>>,
}

impl CommandBinding {
    pub fn new(command: impl Into<String>, guard: Option<Rc<Condition>>) -> Self {
        Self {
            command: command.into(),
            params: Vec::new(),
            guard,
        }
    }

    /// Add a parameter; a repeated name replaces the earlier value in place
    pub fn add_param(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_order_and_replace_duplicates() {
        let mut command = CommandBinding::new("dialog-show", None);
        command.add_param("dialog-name", Value::String("map".into()));
        command.add_param("x", Value::Int(1));
        command.add_param("dialog-name", Value::String("radios".into()));

        let names: Vec<&str> = command.params.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["dialog-name", "x"]);
        assert_eq!(
            command.param("dialog-name"),
            Some(&Value::String("radios".into()))
        );
        assert!(command.param("missing").is_none());
    }
}
