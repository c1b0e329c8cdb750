//! End-to-end generation: file -> tokens -> parse tree -> items -> checklists
//! -> usage analysis -> backends
//!
//! Every semantic pass reports into its own [`DiagnosticSink`]; the
//! diagnostics are rendered once the pass completes and any error stops the
//! run before the next stage.

mod error;
mod result;

pub use error::PipelineError;
pub use result::{summary_line, PipelineResult};

use crate::ast::Visitable;
use crate::backend::{self, BackendError, BackendKind, OutputContext, UsageAnalyzer};
use crate::config::runtime::RuntimeConfig;
use crate::file_processor::{FileProcessingResult, FileProcessor};
use crate::logging::{self, codes, Code};
use crate::passes::{ChecklistPass, Diagnostic, DiagnosticSink, ItemPass, Severity};
use crate::reverse;
use crate::utils::{SourceMap, Span};
use crate::{log_error, log_info, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to generate and where
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Output directory; the input's directory when `None`
    pub output_dir: Option<PathBuf>,
    pub backends: Vec<BackendKind>,
    pub require_extension: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            backends: BackendKind::ALL.to_vec(),
            require_extension: false,
        }
    }
}

impl PipelineOptions {
    /// Options from runtime preferences; unknown backend names are errors
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            output_dir: config.output.output_dir.clone(),
            backends: BackendKind::parse_list(&config.output.backends)?,
            require_extension: config.file_processor.require_clg_extension,
        })
    }

    fn output_dir_for(&self, input: &Path) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

/// Fail a stage with a single positioned error
fn stage_failed(
    stage: &'static str,
    code: Code,
    span: Span,
    message: String,
    source: &SourceMap,
) -> PipelineError {
    let diagnostic = Diagnostic::new(Severity::Error, code, span, message);
    PipelineError::pass_failed(stage, 1, diagnostic.render(source))
}

/// Fail the run if `sink` holds errors; otherwise keep its warnings
fn finish_pass(
    stage: &'static str,
    sink: &DiagnosticSink,
    source: &SourceMap,
    warnings: &mut Vec<String>,
) -> Result<(), PipelineError> {
    if sink.has_errors() {
        log_error!(codes::semantic::PASS_FAILED, "Semantic pass failed",
            "stage" => stage,
            "errors" => sink.error_count()
        );
        return Err(PipelineError::pass_failed(
            stage,
            sink.error_count(),
            sink.render(source),
        ));
    }
    warnings.extend(sink.diagnostics().iter().map(|d| d.render(source)));
    Ok(())
}

/// Compile a loaded source and run the selected backends
pub fn process_source(
    file: &FileProcessingResult,
    options: &PipelineOptions,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let source = SourceMap::new(file.source.as_str());
    let mut warnings = Vec::new();

    let tokens = crate::lexical::tokenize_file_result(file).map_err(|e| {
        stage_failed("lexical", e.error_code(), e.span(), e.to_string(), &source)
    })?;
    let tree = crate::syntax::parse_token_stream(tokens).map_err(|e| {
        stage_failed("syntax", e.error_code(), e.span(), e.to_string(), &source)
    })?;

    let mut sink = DiagnosticSink::new();
    let items = ItemPass::run(&tree, &mut sink)?;
    finish_pass("item", &sink, &source, &mut warnings)?;

    let mut sink = DiagnosticSink::new();
    let ast = ChecklistPass::run(&tree, &items.items, &mut sink)?;
    finish_pass("checklist", &sink, &source, &mut warnings)?;

    let mut usage = UsageAnalyzer::new(&items.items);
    ast.accept(&mut usage)?;
    warnings.extend(usage.warnings().iter().map(|w| format!("warning: {}", w)));

    let context = OutputContext::new(
        options.output_dir_for(&file.metadata.path),
        file.metadata.file_name(),
    );
    let mut written = Vec::new();
    for kind in &options.backends {
        log_info!("Running backend", "backend" => kind);
        written.extend(backend::generate(*kind, &ast, &context)?);
    }

    let result = PipelineResult {
        file_metadata: file.metadata.clone(),
        statistics: ast.statistics(),
        item_count: items.items.len(),
        symbol_count: items.symbols.symbol_count(),
        warning_count: warnings.len(),
        warnings,
        written,
        processing_duration: start_time.elapsed(),
    };
    result.log_success();
    Ok(result)
}

/// Load, compile and generate output for one checklist source file
pub fn process_file(path: &Path, options: &PipelineOptions) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(path.to_path_buf(), 0, || {
        log_info!("Starting checklist generation", "file" => path.display());
        let file = FileProcessor::new()
            .with_extension_required(options.require_extension)
            .process_file(path)?;
        process_source(&file, options)
    })
}

/// Rebuild checklist source from a generated wrapper document
///
/// Writes `<wrapper stem>.clg` and returns its path.
pub fn process_reverse(wrapper: &Path, options: &PipelineOptions) -> Result<PathBuf, PipelineError> {
    logging::with_file_context(wrapper.to_path_buf(), 0, || {
        let reversed = reverse::reverse_markup(wrapper)?;
        let stem = wrapper
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "checklists".to_string());
        let path = options.output_dir_for(wrapper).join(format!("{}.clg", stem));
        fs::write(&path, reversed.to_source()).map_err(|e| BackendError::write_failed(&path, e))?;
        log_success!(codes::success::OUTPUT_WRITTEN, "Source written", "path" => path.display());
        Ok(path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    const SOURCE: &str = r#"project("Cessna 172P");
item("Landing Gear") {
    gear = "/controls/gear/gear-down";
    state("DOWN", gear) { gear = true; }
    state("UP", !gear) { gear = false; }
    state("TRANSIT");
}
item("Beacon") { state("ON"); }
checklist("Before Landing") {
    check("Landing Gear", "DOWN", "Three green");
    text();
}
"#;

    fn write_source(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("c172.clg");
        fs::write(&path, text).unwrap();
        path
    }

    fn options(dir: &TempDir) -> PipelineOptions {
        PipelineOptions {
            output_dir: Some(dir.path().to_path_buf()),
            ..PipelineOptions::default()
        }
    }

    #[test]
    fn generates_every_backend_and_reports_usage() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, SOURCE);
        let result = process_file(&path, &options(&dir)).unwrap();

        let names: Vec<String> = result
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["before-landing.xml", "checklists.xml", "checklists.dot", "checklists.txt", "clist.txt"]
        );
        assert_eq!(
            result.warnings,
            vec![
                "warning: item 'Beacon' is not used in any checklist",
                "warning: state 'TRANSIT' in item 'Landing Gear' is not used",
                "warning: state 'UP' in item 'Landing Gear' is not used",
            ]
        );
        assert_eq!(result.summary(), "Generation complete with 3 warnings.");
        assert_eq!(result.statistics.checks, 1);
        assert_eq!(result.item_count, 2);
    }

    #[test]
    fn selected_backends_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, SOURCE);
        let options = PipelineOptions {
            backends: vec![BackendKind::Line],
            ..options(&dir)
        };
        let result = process_file(&path, &options).unwrap();
        assert_eq!(result.written, vec![dir.path().join("clist.txt")]);
    }

    #[test]
    fn semantic_errors_stop_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            &dir,
            "item(\"Gear\") {\n    state(\"UP\");\n    state(\"UP\");\n}\n",
        );
        let error = process_file(&path, &options(&dir)).unwrap_err();
        assert_matches!(error, PipelineError::PassFailed { stage: "item", errors: 1, .. });
        assert_eq!(
            error.report(),
            Some("error at line 3: Duplicate definition of state 'UP' in item 'Gear'\n    state(\"UP\");\n          ^")
        );
        assert_eq!(summary_line(error.error_count(), 0), "Generation failed with 1 error.");
        assert!(!dir.path().join("checklists.xml").exists());
    }

    #[test]
    fn checklist_errors_are_counted_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            &dir,
            r#"item("Gear") { state("UP"); }
            checklist("A") { check("Flaps", "UP"); check("Gear", "DOWN"); }"#,
        );
        let error = process_file(&path, &options(&dir)).unwrap_err();
        assert_matches!(error, PipelineError::PassFailed { stage: "checklist", errors: 2, .. });
    }

    #[test]
    fn syntax_error_is_rendered_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "checklist(\"A\") {\n    check(\"x\");\n}\n");
        let error = process_file(&path, &options(&dir)).unwrap_err();
        assert_eq!(error.error_count(), 1);
        let report = error.report().unwrap();
        assert!(report.starts_with("error at line 2: expected"), "{}", report);
    }

    #[test]
    fn missing_file_is_a_file_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = process_file(&dir.path().join("none.clg"), &options(&dir)).unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
    }

    #[test]
    fn reverse_writes_source_next_to_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, SOURCE);
        let forward = PipelineOptions {
            backends: vec![BackendKind::Markup],
            ..options(&dir)
        };
        process_file(&path, &forward).unwrap();

        let out = tempfile::tempdir().unwrap();
        let written = process_reverse(&dir.path().join("checklists.xml"), &options(&out)).unwrap();
        assert_eq!(written, out.path().join("checklists.clg"));
        let text = fs::read_to_string(&written).unwrap();
        assert!(text.starts_with("project(\"Cessna 172P\");\n"));
        assert!(text.contains("    check(\"Landing Gear\", \"DOWN\", \"Three green\");\n    text();\n"));
    }

    #[test]
    fn unknown_backend_in_config_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.output.backends = vec!["xml".into(), "pdf".into()];
        assert_matches!(
            PipelineOptions::from_config(&config),
            Err(PipelineError::Backend(BackendError::UnknownBackend { .. }))
        );
    }
}
