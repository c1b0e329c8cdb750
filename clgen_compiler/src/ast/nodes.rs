//! Items, states, checks, pages and checklists

use crate::ast::bindings::Binding;
use crate::ast::conditions::Condition;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Tutorial overlay position and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub scale: f64,
}

impl Marker {
    pub fn new(x: f64, y: f64, z: f64, scale: f64) -> Self {
        Self {
            coordinate: Coordinate { x, y, z },
            scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub name: String,
    pub condition: Option<Condition>,
    pub bindings: Vec<Binding>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: None,
            bindings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub marker: Option<Marker>,
    states: Vec<Rc<State>>,
    index: HashMap<String, usize>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: None,
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Attach `state` unless one of that name exists; the original is kept
    pub fn add_state(&mut self, state: State) -> bool {
        if self.index.contains_key(&state.name) {
            return false;
        }
        self.index.insert(state.name.clone(), self.states.len());
        self.states.push(Rc::new(state));
        true
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn state(&self, name: &str) -> Option<Rc<State>> {
        self.index.get(name).map(|&i| Rc::clone(&self.states[i]))
    }

    /// States in declaration order
    pub fn states(&self) -> &[Rc<State>] {
        &self.states
    }
}

/// Items by name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: Vec<Rc<Item>>,
    index: HashMap<String, usize>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item`; returns false and keeps the first if the name exists
    pub fn insert(&mut self, item: Item) -> bool {
        if self.index.contains_key(&item.name) {
            return false;
        }
        self.index.insert(item.name.clone(), self.items.len());
        self.items.push(Rc::new(item));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Rc<Item>> {
        self.index.get(name).map(|&i| Rc::clone(&self.items[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Item>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    Normal { item: Rc<Item>, state: Rc<State> },
    /// Heading line carrying its text
    Subtitle(String),
    /// Blank line
    Spacer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub kind: CheckKind,
    pub additional_values: Vec<String>,
}

impl Check {
    /// A check on `state` of `item`; blank names degrade to layout checks
    pub fn new(item: Rc<Item>, state: Rc<State>, additional_values: Vec<String>) -> Self {
        let kind = if item.name.trim().is_empty() {
            CheckKind::Spacer
        } else if state.name.trim().is_empty() {
            CheckKind::Subtitle(item.name.clone())
        } else {
            CheckKind::Normal { item, state }
        };
        Self {
            kind,
            additional_values,
        }
    }

    pub fn spacer() -> Self {
        Self {
            kind: CheckKind::Spacer,
            additional_values: Vec::new(),
        }
    }

    pub fn subtitle(text: impl Into<String>) -> Self {
        Self {
            kind: CheckKind::Subtitle(text.into()),
            additional_values: Vec::new(),
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.kind, CheckKind::Spacer)
    }

    pub fn is_subtitle(&self) -> bool {
        matches!(self.kind, CheckKind::Subtitle(_))
    }

    pub fn item(&self) -> Option<&Rc<Item>> {
        match &self.kind {
            CheckKind::Normal { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<&Rc<State>> {
        match &self.kind {
            CheckKind::Normal { state, .. } => Some(state),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub checks: Vec<Check>,
    /// Opened for checks written outside any `page` block
    pub implicit: bool,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn implicit() -> Self {
        Self {
            checks: Vec::new(),
            implicit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Checklist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Append a check outside explicit paging
    ///
    /// Loose checks all land on the checklist's single implicit page.
    pub fn add_check(&mut self, check: Check) {
        match self.pages.iter_mut().find(|page| page.implicit) {
            Some(page) => page.checks.push(check),
            None => {
                let mut page = Page::implicit();
                page.checks.push(check);
                self.pages.push(page);
            }
        }
    }

    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.pages.iter().flat_map(|page| page.checks.iter())
    }

    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Output file name: lowercased title, spaces as hyphens
    pub fn file_stem(&self) -> String {
        self.title.to_lowercase().replace(' ', "-")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbstractSyntaxTree {
    pub project: Option<String>,
    pub author: Option<String>,
    pub checklists: Vec<Checklist>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    pub checklists: usize,
    pub pages: usize,
    pub checks: usize,
    pub spacers: usize,
    pub subtitles: usize,
}

impl AbstractSyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checklist(&self, title: &str) -> Option<&Checklist> {
        self.checklists.iter().find(|c| c.title_matches(title))
    }

    pub fn statistics(&self) -> TreeStatistics {
        let mut stats = TreeStatistics {
            checklists: self.checklists.len(),
            ..TreeStatistics::default()
        };
        for checklist in &self.checklists {
            stats.pages += checklist.pages.len();
            for check in checklist.checks() {
                match check.kind {
                    CheckKind::Normal { .. } => stats.checks += 1,
                    CheckKind::Subtitle(_) => stats.subtitles += 1,
                    CheckKind::Spacer => stats.spacers += 1,
                }
            }
        }
        stats
    }
}
