//! Second pass: project metadata, checklists, pages and checks

use crate::ast::{AbstractSyntaxTree, Check, Checklist, Item, ItemTable, Page, State};
use crate::logging::codes;
use crate::passes::diagnostics::DiagnosticSink;
use crate::passes::error::{PassError, SemanticError};
use crate::passes::support::string_child;
use crate::syntax::{ParseListener, ParseNode, ParseTree, ParseTreeWalker, Rule};
use crate::log_success;
use std::rc::Rc;

/// Child index of the first additional value in a `check(...)`
const FIRST_ADDITIONAL_VALUE: usize = 6;

pub struct ChecklistPass<'a> {
    sink: &'a mut DiagnosticSink,
    items: &'a ItemTable,
    ast: AbstractSyntaxTree,
    checklist: Option<Checklist>,
    page: Option<Page>,
}

impl<'a> ChecklistPass<'a> {
    pub fn new(items: &'a ItemTable, sink: &'a mut DiagnosticSink) -> Self {
        Self {
            sink,
            items,
            ast: AbstractSyntaxTree::new(),
            checklist: None,
            page: None,
        }
    }

    /// Build the checklist tree, resolving checks against `items`
    pub fn run(
        tree: &ParseTree,
        items: &ItemTable,
        sink: &mut DiagnosticSink,
    ) -> Result<AbstractSyntaxTree, PassError> {
        let mut pass = ChecklistPass::new(items, sink);
        ParseTreeWalker::walk(&mut pass, tree)?;

        let stats = pass.ast.statistics();
        log_success!(
            codes::success::CHECKLIST_PASS_COMPLETE,
            "Checklist pass completed",
            "checklists" => stats.checklists,
            "pages" => stats.pages,
            "checks" => stats.checks,
            "errors" => pass.sink.error_count()
        );

        Ok(pass.ast)
    }

    fn add_check(&mut self, check: Check) {
        if let Some(page) = self.page.as_mut() {
            page.checks.push(check);
        } else if let Some(checklist) = self.checklist.as_mut() {
            checklist.add_check(check);
        }
    }

    /// Resolve a `check(...)` against the item table
    ///
    /// With no items defined at all, bare items and states are synthesized
    /// so that layout-only sources still compile.
    fn normal_check(&mut self, node: &ParseNode) -> Result<(), PassError> {
        let item_name = string_child(node, 2)?;
        let state_name = string_child(node, 4)?;

        let (item, state) = if self.items.is_empty() {
            (
                Rc::new(Item::new(item_name)),
                Rc::new(State::new(state_name)),
            )
        } else {
            let Some(item) = self.items.get(&item_name) else {
                let checklist = self
                    .checklist
                    .as_ref()
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                self.sink.report(SemanticError::UndefinedItem {
                    item: item_name,
                    checklist,
                    span: node.span_of(2),
                });
                return Ok(());
            };
            let Some(state) = item.state(&state_name) else {
                self.sink.report(SemanticError::UndefinedState {
                    state: state_name,
                    item: item_name,
                    span: node.span_of(4),
                });
                return Ok(());
            };
            (item, state)
        };

        let mut additional_values = Vec::new();
        let mut index = FIRST_ADDITIONAL_VALUE;
        while node.string_at(index).is_some() {
            additional_values.push(string_child(node, index)?);
            index += 2;
        }

        self.add_check(Check::new(item, state, additional_values));
        Ok(())
    }

    fn finish_checklist(&mut self, node: &ParseNode) {
        let Some(checklist) = self.checklist.take() else {
            return;
        };
        if self.ast.checklist(&checklist.title).is_some() {
            self.sink.report(SemanticError::DuplicateChecklist {
                title: checklist.title,
                span: node.span_of(0),
            });
        } else {
            self.ast.checklists.push(checklist);
        }
    }
}

impl ParseListener for ChecklistPass<'_> {
    type Error = PassError;

    fn enter(&mut self, node: &ParseNode) -> Result<(), PassError> {
        match node.rule {
            Rule::Project if self.ast.project.is_none() => {
                self.ast.project = Some(string_child(node, 2)?);
            }
            Rule::Author if self.ast.author.is_none() => {
                self.ast.author = Some(string_child(node, 2)?);
            }
            Rule::Checklist => self.checklist = Some(Checklist::new(string_child(node, 2)?)),
            Rule::Page => self.page = Some(Page::new()),
            Rule::NormalCheck => self.normal_check(node)?,
            Rule::Spacer => self.add_check(Check::spacer()),
            Rule::Subtitle => self.add_check(Check::subtitle(string_child(node, 2)?)),
            _ => {}
        }
        Ok(())
    }

    fn exit(&mut self, node: &ParseNode) -> Result<(), PassError> {
        match node.rule {
            Rule::Page => {
                if let (Some(page), Some(checklist)) = (self.page.take(), self.checklist.as_mut()) {
                    checklist.add_page(page);
                }
            }
            Rule::Checklist => self.finish_checklist(node),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CheckKind;
    use crate::passes::item_pass::ItemPass;
    use crate::syntax::parse_source;
    use assert_matches::assert_matches;

    const ITEMS: &str = r#"
        item("Parking Brake") { state("SET"); state("RELEASED"); }
        item("Beacon") { state("ON"); }
    "#;

    fn run(source: &str) -> (AbstractSyntaxTree, DiagnosticSink) {
        let tree = parse_source(source).unwrap();
        let mut sink = DiagnosticSink::new();
        let items = ItemPass::run(&tree, &mut sink).unwrap().items;
        let ast = ChecklistPass::run(&tree, &items, &mut sink).unwrap();
        (ast, sink)
    }

    #[test]
    fn resolves_checks_with_additional_values() {
        let source = format!(
            r#"{}
            project("Cessna 172P");
            author("Someone");
            project("Ignored");
            checklist("Before Start") {{
                check("Parking Brake", "SET", "Check firmly", "Hold pedals");
                text();
                text("Lights");
                check("Beacon", "ON");
            }}"#,
            ITEMS
        );
        let (ast, sink) = run(&source);
        assert!(!sink.has_errors());
        assert_eq!(ast.project.as_deref(), Some("Cessna 172P"));
        assert_eq!(ast.author.as_deref(), Some("Someone"));

        let checklist = &ast.checklists[0];
        assert_eq!(checklist.pages.len(), 1);
        let checks: Vec<&Check> = checklist.checks().collect();
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[0].additional_values, vec!["Check firmly", "Hold pedals"]);
        assert_eq!(checks[0].item().unwrap().name, "Parking Brake");
        assert!(checks[1].is_spacer());
        assert_eq!(checks[2].kind, CheckKind::Subtitle("Lights".into()));
    }

    #[test]
    fn loose_checks_form_one_page_and_pages_stay_explicit() {
        let source = format!(
            r#"{}
            checklist("Taxi") {{
                check("Beacon", "ON");
                text();
                text("After");
            }}
            checklist("Shutdown") {{
                page {{ check("Parking Brake", "SET"); }}
                page {{ }}
            }}"#,
            ITEMS
        );
        let (ast, sink) = run(&source);
        assert!(!sink.has_errors());

        let loose = &ast.checklists[0].pages;
        assert_eq!(loose.len(), 1);
        assert!(loose[0].implicit);
        assert_eq!(loose[0].checks.len(), 3);

        let paged = &ast.checklists[1].pages;
        assert_eq!(paged.len(), 2);
        assert!(paged.iter().all(|page| !page.implicit));
        assert!(paged[1].checks.is_empty());
    }

    #[test]
    fn undefined_item_and_state_are_errors() {
        let source = format!(
            r#"{}
            checklist("Taxi") {{
                check("Flaps", "UP");
                check("Beacon", "OFF");
            }}"#,
            ITEMS
        );
        let (ast, sink) = run(&source);
        assert_eq!(sink.error_count(), 2);
        assert_eq!(
            sink.messages(),
            vec![
                "Undefined item 'Flaps' in checklist 'Taxi'",
                "State 'OFF' is not defined for item 'Beacon'",
            ]
        );
        assert_eq!(ast.checklists[0].checks().count(), 0);
    }

    #[test]
    fn checklist_titles_are_unique_ignoring_case() {
        let (ast, sink) = run(r#"
            checklist("Before Start") { text(); }
            checklist("BEFORE START") { text(); }
        "#);
        assert_eq!(
            sink.messages(),
            vec!["Duplicate definition of checklist with title 'BEFORE START' (ignoring case)"]
        );
        assert_eq!(ast.checklists.len(), 1);
        assert_eq!(sink.diagnostics()[0].line, 3);
    }

    #[test]
    fn empty_item_table_synthesizes_checks() {
        let (ast, sink) = run(r#"checklist("Memory Items") { check("Throttle", "IDLE"); }"#);
        assert!(!sink.has_errors());
        let check = ast.checklists[0].checks().next().unwrap();
        assert_matches!(&check.kind, CheckKind::Normal { item, state }
            if item.name == "Throttle" && state.name == "IDLE");
    }

    #[test]
    fn blank_names_become_layout_checks() {
        let (ast, _) = run(
            r#"checklist("Layout") { check("", "x"); check("Engine", ""); check("Gear", "   "); }"#,
        );
        let kinds: Vec<&CheckKind> = ast.checklists[0].checks().map(|c| &c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &CheckKind::Spacer,
                &CheckKind::Subtitle("Engine".into()),
                &CheckKind::Subtitle("Gear".into()),
            ]
        );
    }
}
