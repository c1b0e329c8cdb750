//! Printable plain-text checklists (`checklists.txt`)
//!
//! Fixed-width lines, fixed-length pages, each page closed by a centered
//! page number. Pages are separated by a form feed.

use crate::ast::{AbstractSyntaxTree, Check, CheckKind, Checklist, VisitResult, Visitor};
use crate::backend::{write_output, Generator, OutputContext};
use crate::config::compile_time::output::{DOCUMENT_LINE_WIDTH, DOCUMENT_PAGE_LENGTH};
use std::path::PathBuf;

pub const DOCUMENT_FILE: &str = "checklists.txt";

const FORM_FEED: char = '\x0c';

pub struct DocumentBackend {
    context: OutputContext,
    width: usize,
    page_length: usize,
    lines: Vec<String>,
    written: Vec<PathBuf>,
}

impl DocumentBackend {
    pub fn new(context: OutputContext) -> Self {
        Self::with_layout(context, DOCUMENT_LINE_WIDTH, DOCUMENT_PAGE_LENGTH)
    }

    /// Custom line width and page length; pages hold at least one body line
    pub fn with_layout(context: OutputContext, width: usize, page_length: usize) -> Self {
        Self {
            context,
            width,
            page_length: page_length.max(3),
            lines: Vec::new(),
            written: Vec::new(),
        }
    }

    fn centered(&self, text: &str) -> String {
        format!("{:^width$}", text, width = self.width)
            .trim_end()
            .to_string()
    }

    /// `item ...... state`, filled with dots to the full line width
    fn dotted(&self, item: &str, state: &str) -> String {
        let used = item.chars().count() + state.chars().count() + 2;
        let dots = ".".repeat(self.width.saturating_sub(used));
        format!("{} {} {}", item, dots, state)
    }

    /// Split the body into pages, each padded and closed by its number
    fn paginate(&self) -> String {
        let body = self.page_length - 2;
        let pages: Vec<String> = self
            .lines
            .chunks(body)
            .enumerate()
            .map(|(index, chunk)| {
                let mut page: Vec<String> = chunk.to_vec();
                page.resize(body, String::new());
                page.push(String::new());
                page.push(self.centered(&(index + 1).to_string()));
                let mut text = page.join("\n");
                text.push('\n');
                text
            })
            .collect();
        pages.join(&FORM_FEED.to_string())
    }
}

impl Generator for DocumentBackend {
    fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl Visitor for DocumentBackend {
    fn enter_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        let heading = self.centered("CHECKLIST");
        self.lines.push(heading);
        self.lines.push(String::new());
        Ok(())
    }

    fn exit_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        let text = self.paginate();
        let path = self.context.path(DOCUMENT_FILE);
        self.written.push(write_output(&path, &text)?);
        Ok(())
    }

    fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        self.lines.push(String::new());
        self.lines.push(checklist.title.to_uppercase());
        Ok(())
    }

    fn enter_check(&mut self, check: &Check) -> VisitResult {
        match &check.kind {
            CheckKind::Spacer => self.lines.push(String::new()),
            CheckKind::Subtitle(text) => self.lines.push(text.clone()),
            CheckKind::Normal { item, state } => {
                let line = self.dotted(&item.name, &state.name);
                self.lines.push(line);
                for value in &check.additional_values {
                    self.lines.push(format!("{:>width$}", value, width = self.width));
                }
            }
        }
        Ok(())
    }
}
