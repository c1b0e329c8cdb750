//! Output generation from a finished checklist tree
//!
//! Every backend is a [`Visitor`] that builds its output during the walk
//! and writes it from an `exit` hook. [`generate`] runs one backend and
//! returns the paths it wrote.

pub mod document;
pub mod element;
pub mod error;
pub mod graph;
pub mod line;
pub mod markup;
pub mod usage;

pub use document::DocumentBackend;
pub use element::{Document, Element, Node};
pub use error::{BackendError, BackendResult};
pub use graph::GraphBackend;
pub use line::LineBackend;
pub use markup::MarkupBackend;
pub use usage::UsageAnalyzer;

use crate::ast::{AbstractSyntaxTree, Visitable, Visitor};
use crate::logging::codes;
use crate::log_success;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Selectable output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Markup,
    Graph,
    Document,
    Line,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [Self::Markup, Self::Graph, Self::Document, Self::Line];

    /// Name used on the command line and in `CLGEN_BACKENDS`
    pub fn name(self) -> &'static str {
        match self {
            Self::Markup => "xml",
            Self::Graph => "dot",
            Self::Document => "document",
            Self::Line => "clist",
        }
    }

    /// Parse backend names, keeping order and dropping repeats
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> BackendResult<Vec<Self>> {
        let mut kinds = Vec::new();
        for name in names {
            let kind = name.as_ref().parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| BackendError::UnknownBackend {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where output goes and how generated files describe their source
#[derive(Debug, Clone)]
pub struct OutputContext {
    pub output_dir: PathBuf,
    /// File name of the compiled source, quoted in generated headers
    pub source_name: String,
}

impl OutputContext {
    pub fn new(output_dir: impl Into<PathBuf>, source_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            source_name: source_name.into(),
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// A backend that reports the files it wrote once its walk is complete
pub trait Generator: Visitor {
    fn into_written(self) -> Vec<PathBuf>;
}

/// Run the backend selected by `kind` over `tree`
pub fn generate(
    kind: BackendKind,
    tree: &AbstractSyntaxTree,
    context: &OutputContext,
) -> BackendResult<Vec<PathBuf>> {
    match kind {
        BackendKind::Markup => run(MarkupBackend::new(context.clone()), tree),
        BackendKind::Graph => run(GraphBackend::new(context.clone()), tree),
        BackendKind::Document => run(DocumentBackend::new(context.clone()), tree),
        BackendKind::Line => run(LineBackend::new(context.clone()), tree),
    }
}

fn run<G: Generator>(mut generator: G, tree: &AbstractSyntaxTree) -> BackendResult<Vec<PathBuf>> {
    tree.accept(&mut generator)?;
    Ok(generator.into_written())
}

/// Write one output file, failing with the path on any I/O error
pub(crate) fn write_output(path: &Path, contents: &str) -> BackendResult<PathBuf> {
    fs::write(path, contents).map_err(|e| BackendError::write_failed(path, e))?;
    log_success!(
        codes::success::OUTPUT_WRITTEN,
        "Output file written",
        "path" => path.display(),
        "bytes" => contents.len()
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("XML".parse::<BackendKind>().unwrap(), BackendKind::Markup);
        assert_eq!(" clist ".parse::<BackendKind>().unwrap(), BackendKind::Line);
        assert_matches!(
            "pdf".parse::<BackendKind>(),
            Err(BackendError::UnknownBackend { name }) if name == "pdf"
        );
    }

    #[test]
    fn backend_lists_drop_repeats() {
        let kinds = BackendKind::parse_list(&["dot", "xml", "dot"]).unwrap();
        assert_eq!(kinds, vec![BackendKind::Graph, BackendKind::Markup]);
    }

    #[test]
    fn write_failure_carries_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("checklists.dot");
        let error = write_output(&path, "digraph G {}").unwrap_err();
        assert_matches!(error, BackendError::WriteFailed { path: p, .. } if p == path);
    }
}
