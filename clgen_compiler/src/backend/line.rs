//! Line-oriented checklist format for cockpit checklist plugins (`clist.txt`)

use crate::ast::{AbstractSyntaxTree, Check, CheckKind, Checklist, VisitResult, Visitor};
use crate::backend::{write_output, Generator, OutputContext};
use std::path::PathBuf;

pub const LINE_FILE: &str = "clist.txt";

pub struct LineBackend {
    context: OutputContext,
    text: String,
    first_checklist: bool,
    first_check: bool,
    written: Vec<PathBuf>,
}

impl LineBackend {
    pub fn new(context: OutputContext) -> Self {
        Self {
            context,
            text: String::new(),
            first_checklist: true,
            first_check: true,
            written: Vec::new(),
        }
    }

    fn void_line(&mut self, text: &str) {
        self.text.push_str(&format!("sw_itemvoid:{}\n", text));
    }
}

impl Generator for LineBackend {
    fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl Visitor for LineBackend {
    fn enter_tree(&mut self, tree: &AbstractSyntaxTree) -> VisitResult {
        self.text.push_str("sw_checklist:CHECKLIST\n");
        if let Some(project) = &tree.project {
            self.void_line(project);
        }
        Ok(())
    }

    fn exit_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        let path = self.context.path(LINE_FILE);
        self.written.push(write_output(&path, &self.text)?);
        Ok(())
    }

    fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        let title = &checklist.title;
        if !self.first_checklist {
            self.text.push_str(&format!("sw_continue:{}\n", title));
        }
        self.text.push_str(&format!("\n# {}\n", title));
        self.text.push_str(&format!("sw_checklist:{}:{}\n", title, title));
        self.void_line(&title.to_uppercase());
        self.first_checklist = false;
        self.first_check = true;
        Ok(())
    }

    fn enter_check(&mut self, check: &Check) -> VisitResult {
        match &check.kind {
            CheckKind::Spacer => {
                if !self.first_check {
                    self.void_line("");
                }
            }
            CheckKind::Subtitle(text) => {
                if !self.first_check {
                    self.void_line("");
                }
                self.void_line(text);
            }
            CheckKind::Normal { item, state } => {
                self.text.push_str(&format!("sw_item:{}|{}\n", item.name, state.name));
                for value in &check.additional_values {
                    self.void_line(value);
                }
            }
        }
        self.first_check = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Item, State, Visitable};
    use std::fs;
    use std::rc::Rc;

    fn normal(item: &str, state: &str, extras: &[&str]) -> Check {
        let mut owner = Item::new(item);
        owner.add_state(State::new(state));
        let owner = Rc::new(owner);
        let state = owner.state(state).unwrap();
        Check::new(owner, state, extras.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn writes_checklists_in_line_format() {
        let mut first = Checklist::new("Before Start");
        first.add_check(Check::spacer());
        first.add_check(normal("Brakes", "SET", &["Hold pedals"]));
        first.add_check(Check::subtitle("Engine"));
        let mut second = Checklist::new("Taxi");
        second.add_check(Check::subtitle("Ground"));
        second.add_check(Check::spacer());
        let tree = AbstractSyntaxTree {
            project: Some("Cessna 172P".into()),
            author: None,
            checklists: vec![first, second],
        };

        let dir = tempfile::tempdir().unwrap();
        let mut backend = LineBackend::new(OutputContext::new(dir.path(), "c172.clg"));
        tree.accept(&mut backend).unwrap();
        assert_eq!(backend.into_written(), vec![dir.path().join(LINE_FILE)]);

        let text = fs::read_to_string(dir.path().join(LINE_FILE)).unwrap();
        assert_eq!(
            text,
            concat!(
                "sw_checklist:CHECKLIST\n",
                "sw_itemvoid:Cessna 172P\n",
                "\n# Before Start\n",
                "sw_checklist:Before Start:Before Start\n",
                "sw_itemvoid:BEFORE START\n",
                "sw_item:Brakes|SET\n",
                "sw_itemvoid:Hold pedals\n",
                "sw_itemvoid:\n",
                "sw_itemvoid:Engine\n",
                "sw_continue:Taxi\n",
                "\n# Taxi\n",
                "sw_checklist:Taxi:Taxi\n",
                "sw_itemvoid:TAXI\n",
                "sw_itemvoid:Ground\n",
                "sw_itemvoid:\n",
            )
        );
    }
}
