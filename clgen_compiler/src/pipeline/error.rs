use crate::backend::BackendError;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::passes::{PassError, SemanticError};
use crate::reverse::ReverseError;
use crate::symbols::SymbolError;
use crate::syntax::SyntaxError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    #[error("Symbol table error: {0}")]
    Symbol(#[from] SymbolError),

    #[error("Semantic analysis failed: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Output generation failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Reverse generation failed: {0}")]
    Reverse(#[from] ReverseError),

    #[error("Internal error: {0}")]
    Internal(#[from] PassError),

    /// A stage finished with fatal diagnostics; `report` holds them rendered
    #[error("{stage} stage failed with {errors} error(s)")]
    PassFailed {
        stage: &'static str,
        errors: usize,
        report: String,
    },
}

impl PipelineError {
    pub fn pass_failed(stage: &'static str, errors: usize, report: String) -> Self {
        Self::PassFailed {
            stage,
            errors,
            report,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::SyntaxAnalysis(e) => e.error_code(),
            Self::Symbol(e) => e.error_code(),
            Self::Semantic(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
            Self::Reverse(e) => e.error_code(),
            Self::Internal(e) => e.error_code(),
            Self::PassFailed { .. } => codes::semantic::PASS_FAILED,
        }
    }

    /// Number of errors for the summary line
    pub fn error_count(&self) -> usize {
        match self {
            Self::PassFailed { errors, .. } => *errors,
            _ => 1,
        }
    }

    /// Rendered diagnostics with source context, when the stage produced any
    pub fn report(&self) -> Option<&str> {
        match self {
            Self::PassFailed { report, .. } if !report.is_empty() => Some(report),
            _ => None,
        }
    }
}
