//! Reverse generation: rebuild checklist source from generated markup
//!
//! Reads the wrapper document, follows each `include`, and reconstructs
//! items, states, markers, pages and checks. Conditions and bindings are
//! not recovered.

pub mod emitter;
pub mod error;
pub mod reader;

pub use emitter::emit_source;
pub use error::{ReverseError, ReverseResult};
pub use reader::parse_document;

use crate::ast::{AbstractSyntaxTree, Check, Checklist, Item, ItemTable, Marker, Page, State};
use crate::backend::Element;
use crate::logging::codes;
use crate::{log_debug, log_success};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Title the markup backend writes when no project is set
const DEFAULT_TITLE: &str = "Checklists";

/// Rebuilt item table and checklist tree
#[derive(Debug)]
pub struct ReversedSource {
    pub items: ItemTable,
    pub tree: AbstractSyntaxTree,
}

impl ReversedSource {
    pub fn to_source(&self) -> String {
        emit_source(&self.items, &self.tree)
    }
}

#[derive(Debug)]
struct ItemDraft {
    name: String,
    states: Vec<String>,
    marker: Option<Marker>,
}

#[derive(Debug)]
enum CheckDraft {
    Normal {
        item: String,
        state: String,
        additional_values: Vec<String>,
    },
    Subtitle(String),
    Spacer,
}

#[derive(Debug)]
struct ChecklistDraft {
    title: String,
    pages: Vec<(Vec<CheckDraft>, bool)>,
}

/// Items in first-seen order, states merged across checklists
#[derive(Debug, Default)]
struct Drafts {
    items: Vec<ItemDraft>,
    index: HashMap<String, usize>,
    checklists: Vec<ChecklistDraft>,
}

impl Drafts {
    fn note_item(&mut self, name: &str, state: &str, marker: Option<Marker>) {
        let index = match self.index.get(name) {
            Some(&index) => index,
            None => {
                self.index.insert(name.to_string(), self.items.len());
                self.items.push(ItemDraft {
                    name: name.to_string(),
                    states: Vec::new(),
                    marker: None,
                });
                self.items.len() - 1
            }
        };
        let draft = &mut self.items[index];
        if !draft.states.iter().any(|s| s == state) {
            draft.states.push(state.to_string());
        }
        if draft.marker.is_none() {
            draft.marker = marker;
        }
    }

    fn finish(self, project: Option<String>) -> ReversedSource {
        let mut items = ItemTable::new();
        for draft in self.items {
            let mut item = Item::new(draft.name);
            item.marker = draft.marker;
            for state in draft.states {
                item.add_state(State::new(state));
            }
            items.insert(item);
        }

        let mut tree = AbstractSyntaxTree {
            project,
            ..AbstractSyntaxTree::default()
        };
        for draft in self.checklists {
            let mut checklist = Checklist::new(draft.title);
            for (checks, implicit) in draft.pages {
                let mut page = if implicit { Page::implicit() } else { Page::new() };
                page.checks = checks
                    .into_iter()
                    .filter_map(|check| resolve_check(&items, check))
                    .collect();
                checklist.add_page(page);
            }
            tree.checklists.push(checklist);
        }
        ReversedSource { items, tree }
    }
}

fn resolve_check(items: &ItemTable, draft: CheckDraft) -> Option<Check> {
    match draft {
        CheckDraft::Spacer => Some(Check::spacer()),
        CheckDraft::Subtitle(text) => Some(Check::subtitle(text)),
        CheckDraft::Normal {
            item,
            state,
            additional_values,
        } => {
            let item = items.get(&item)?;
            let state = item.state(&state)?;
            Some(Check::new(item, state, additional_values))
        }
    }
}

fn read_text(path: &Path) -> ReverseResult<String> {
    fs::read_to_string(path).map_err(|e| ReverseError::io(path, e))
}

fn property_list<'d>(root: &'d Element, path: &Path) -> ReverseResult<&'d Element> {
    if root.name != "PropertyList" {
        return Err(ReverseError::unexpected(path, &root.name, "<PropertyList>"));
    }
    Ok(root)
}

fn number(element: &Element, name: &str, path: &Path) -> ReverseResult<f64> {
    let text = element.child(name).map(Element::text).unwrap_or_default();
    text.trim()
        .parse()
        .map_err(|_| ReverseError::malformed(path, 0, format!("<{}> is not a number: '{}'", name, text)))
}

fn marker(item: &Element, path: &Path) -> ReverseResult<Option<Marker>> {
    let Some(marker) = item.child("marker") else {
        return Ok(None);
    };
    Ok(Some(Marker::new(
        number(marker, "x-m", path)?,
        number(marker, "y-m", path)?,
        number(marker, "z-m", path)?,
        number(marker, "scale", path)?,
    )))
}

fn check(drafts: &mut Drafts, item: &Element, path: &Path) -> ReverseResult<CheckDraft> {
    let name = item.child("name").map(Element::text).unwrap_or_default();
    let mut values = item.children_named("value").map(Element::text);

    if name.is_empty() {
        return Ok(CheckDraft::Spacer);
    }
    let Some(state) = values.next() else {
        return Ok(CheckDraft::Subtitle(name));
    };
    let additional_values = values.collect();
    drafts.note_item(&name, &state, marker(item, path)?);
    Ok(CheckDraft::Normal {
        item: name,
        state,
        additional_values,
    })
}

fn checks(drafts: &mut Drafts, container: &Element, path: &Path) -> ReverseResult<Vec<CheckDraft>> {
    container
        .children_named("item")
        .map(|item| check(drafts, item, path))
        .collect()
}

fn checklist(drafts: &mut Drafts, path: &Path) -> ReverseResult<()> {
    let document = parse_document(&read_text(path)?, path)?;
    let root = property_list(&document.root, path)?;
    let title = root
        .child("title")
        .map(Element::text)
        .ok_or_else(|| ReverseError::malformed(path, 0, "checklist has no <title>"))?;

    let mut pages = Vec::new();
    for element in root.elements() {
        match element.name.as_str() {
            "title" | "item" => {}
            "page" => pages.push((checks(drafts, element, path)?, false)),
            other => return Err(ReverseError::unexpected(path, other, "<title>, <page> or <item>")),
        }
    }
    if pages.is_empty() {
        pages.push((checks(drafts, root, path)?, true));
    }

    log_debug!("Checklist read", "title" => &title, "pages" => pages.len());
    drafts.checklists.push(ChecklistDraft { title, pages });
    Ok(())
}

/// Rebuild items and checklists from a wrapper document and its includes
pub fn reverse_markup(wrapper: &Path) -> ReverseResult<ReversedSource> {
    let document = parse_document(&read_text(wrapper)?, wrapper)?;
    let root = property_list(&document.root, wrapper)?;

    let project = root
        .child("title")
        .map(Element::text)
        .filter(|title| title != DEFAULT_TITLE);

    let base = wrapper.parent().unwrap_or_else(|| Path::new("."));
    let mut drafts = Drafts::default();
    for include in root.children_named("checklist") {
        let name = include.attribute("include").ok_or_else(|| {
            ReverseError::malformed(wrapper, 0, "<checklist> without an include attribute")
        })?;
        let path = base.join(name);
        if !path.is_file() {
            return Err(ReverseError::MissingInclude {
                wrapper: wrapper.to_path_buf(),
                include: name.to_string(),
            });
        }
        checklist(&mut drafts, &path)?;
    }

    let reversed = drafts.finish(project);
    log_success!(
        codes::success::REVERSE_COMPLETE,
        "Reverse generation completed",
        "items" => reversed.items.len(),
        "checklists" => reversed.tree.checklists.len()
    );
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CheckKind, Visitable};
    use crate::backend::{MarkupBackend, OutputContext, Generator};
    use crate::passes::{ChecklistPass, DiagnosticSink, ItemPass};
    use crate::syntax::parse_source;
    use assert_matches::assert_matches;

    fn compile(source: &str) -> (ItemTable, AbstractSyntaxTree) {
        let tree = parse_source(source).unwrap();
        let mut sink = DiagnosticSink::new();
        let items = ItemPass::run(&tree, &mut sink).unwrap().items;
        let ast = ChecklistPass::run(&tree, &items, &mut sink).unwrap();
        assert!(!sink.has_errors(), "{:?}", sink.messages());
        (items, ast)
    }

    fn write_markup(source: &str, dir: &Path) -> std::path::PathBuf {
        let (_, ast) = compile(source);
        let mut backend = MarkupBackend::new(OutputContext::new(dir, "test.clg"));
        ast.accept(&mut backend).unwrap();
        backend.into_written().pop().unwrap()
    }

    #[test]
    fn round_trip_keeps_items_states_and_check_order() {
        let dir = tempfile::tempdir().unwrap();
        let wrapper = write_markup(
            r#"project("Cessna 172P");
            item("Landing Gear") {
                gear = "/controls/gear/gear-down";
                state("DOWN", gear);
                state("UP", !gear);
                marker(0.1, -0.2, 0.3, 1.5);
            }
            checklist("Approach") {
                check("Landing Gear", "UP", "Check speed");
                text("Final");
                check("Landing Gear", "DOWN");
                text();
            }"#,
            dir.path(),
        );

        let reversed = reverse_markup(&wrapper).unwrap();
        assert_eq!(reversed.tree.project.as_deref(), Some("Cessna 172P"));
        let gear = reversed.items.get("Landing Gear").unwrap();
        let states: Vec<&str> = gear.states().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(states, vec!["UP", "DOWN"]);
        assert_eq!(gear.marker, Some(Marker::new(0.1, -0.2, 0.3, 1.5)));

        let checks: Vec<&Check> = reversed.tree.checklists[0].checks().collect();
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[0].state().unwrap().name, "UP");
        assert_eq!(checks[0].additional_values, vec!["Check speed"]);
        assert_eq!(checks[1].kind, CheckKind::Subtitle("Final".into()));
        assert_eq!(checks[2].state().unwrap().name, "DOWN");
        assert!(checks[3].is_spacer());

        let (items, tree) = compile(&reversed.to_source());
        assert_eq!(items.len(), 1);
        assert_eq!(tree.statistics(), reversed.tree.statistics());
    }

    #[test]
    fn explicit_pages_are_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let wrapper = write_markup(
            r#"item("Beacon") { state("ON"); }
            checklist("Taxi") { page { check("Beacon", "ON"); } page { text("Two"); } }"#,
            dir.path(),
        );
        let reversed = reverse_markup(&wrapper).unwrap();
        let pages = &reversed.tree.checklists[0].pages;
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|page| !page.implicit));
        assert_eq!(reversed.tree.project, None);
    }

    #[test]
    fn missing_include_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let wrapper = write_markup(r#"checklist("Taxi") { text(); }"#, dir.path());
        fs::remove_file(dir.path().join("taxi.xml")).unwrap();
        assert_matches!(
            reverse_markup(&wrapper),
            Err(ReverseError::MissingInclude { include, .. }) if include == "taxi.xml"
        );
    }

    #[test]
    fn foreign_root_element_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.xml");
        fs::write(&path, "<html><body/></html>").unwrap();
        assert_matches!(
            reverse_markup(&path),
            Err(ReverseError::UnexpectedElement { name, .. }) if name == "html"
        );
    }
}
