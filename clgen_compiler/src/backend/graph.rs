//! Graphviz overview of all checklists (`checklists.dot`)
//!
//! Render with `dot -Tpng -o checklists.png checklists.dot`.

use crate::ast::{AbstractSyntaxTree, Check, CheckKind, Checklist, VisitResult, Visitor};
use crate::backend::{write_output, Generator, OutputContext};
use std::path::PathBuf;

pub const GRAPH_FILE: &str = "checklists.dot";

const HEADER: &str = concat!(
    "digraph G {\n",
    "    pad=0.5;\n",
    "    ranksep=0.35;\n",
    "    node [fontsize=12];\n",
    "    node [fontcolor=white,fontname=\"helvetica-bold\"];\n",
    "    node [shape=Mrecord,width=2.5,style=filled];\n",
);

const NOTE_STYLE: &str = concat!(
    "    node [color=\"#404040\",fontcolor=\"#404040\",fontname=\"helvetica\"];\n",
    "    node [shape=note,width=2.25,style=\"\"];\n",
);

pub struct GraphBackend {
    context: OutputContext,
    dot: String,
    nodes: String,
    edges: String,
    index: usize,
    hue: f64,
    hue_step: f64,
    written: Vec<PathBuf>,
}

impl GraphBackend {
    pub fn new(context: OutputContext) -> Self {
        Self {
            context,
            dot: String::new(),
            nodes: String::new(),
            edges: String::new(),
            index: 0,
            hue: 0.0,
            hue_step: 0.0,
            written: Vec::new(),
        }
    }
}

impl Generator for GraphBackend {
    fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

impl Visitor for GraphBackend {
    fn enter_tree(&mut self, tree: &AbstractSyntaxTree) -> VisitResult {
        self.hue_step = if tree.checklists.is_empty() {
            0.0
        } else {
            1.0 / tree.checklists.len() as f64
        };
        self.dot.push_str(HEADER);
        Ok(())
    }

    fn exit_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        self.dot.push_str(NOTE_STYLE);
        self.dot.push_str(&self.nodes);
        self.dot.push_str(&self.edges);
        self.dot.push_str("}\n");

        let path = self.context.path(GRAPH_FILE);
        self.written.push(write_output(&path, &self.dot)?);
        Ok(())
    }

    fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        let title = quote(&checklist.title);
        self.dot.push_str(&format!("    node [color=\"{:.4},0.6,0.6\"]; {};\n", self.hue, title));

        let nodes = checklist.checks().filter(|check| !check.is_spacer()).count();
        self.edges.push_str("    ");
        self.edges.push_str(&title);
        for i in self.index..self.index + nodes {
            self.edges.push_str(&format!(" -> {}", i));
        }
        self.edges.push_str(";\n");
        Ok(())
    }

    fn exit_checklist(&mut self, _checklist: &Checklist) -> VisitResult {
        self.hue += self.hue_step;
        Ok(())
    }

    fn enter_check(&mut self, check: &Check) -> VisitResult {
        let mut label = match &check.kind {
            CheckKind::Spacer => return Ok(()),
            CheckKind::Subtitle(text) => text.replace('"', "\\\""),
            CheckKind::Normal { item, state } => {
                format!("{} {}", item.name, state.name).replace('"', "\\\"")
            }
        };
        for value in &check.additional_values {
            label.push_str("&#92;n");
            label.push_str(&value.replace('"', "\\\""));
        }
        self.nodes.push_str(&format!("    {} [label=\"{}\"];\n", self.index, label));
        self.index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Item, State, Visitable};
    use std::fs;
    use std::rc::Rc;

    fn check(item: &str, state: &str, extras: &[&str]) -> Check {
        let mut owner = Item::new(item);
        owner.add_state(State::new(state));
        let owner = Rc::new(owner);
        let state = owner.state(state).unwrap();
        Check::new(owner, state, extras.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn renders_nodes_and_edge_chains() {
        let mut first = Checklist::new("Before Start");
        first.add_check(check("Brakes", "SET", &["Hold \"firmly\""]));
        first.add_check(Check::spacer());
        first.add_check(Check::subtitle("Engine"));
        let mut second = Checklist::new("Taxi");
        second.add_check(check("Beacon", "ON", &[]));
        let tree = AbstractSyntaxTree {
            checklists: vec![first, second],
            ..AbstractSyntaxTree::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let mut backend = GraphBackend::new(OutputContext::new(dir.path(), "test.clg"));
        tree.accept(&mut backend).unwrap();
        assert_eq!(backend.into_written(), vec![dir.path().join(GRAPH_FILE)]);

        let dot = fs::read_to_string(dir.path().join(GRAPH_FILE)).unwrap();
        let expected = [
            HEADER,
            "    node [color=\"0.0000,0.6,0.6\"]; \"Before Start\";\n",
            "    node [color=\"0.5000,0.6,0.6\"]; \"Taxi\";\n",
            NOTE_STYLE,
            "    0 [label=\"Brakes SET&#92;nHold \\\"firmly\\\"\"];\n",
            "    1 [label=\"Engine\"];\n",
            "    2 [label=\"Beacon ON\"];\n",
            "    \"Before Start\" -> 0 -> 1;\n",
            "    \"Taxi\" -> 2;\n",
            "}\n",
        ]
        .concat();
        assert_eq!(dot, expected);
    }
}
