// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to reject inputs without the .clg extension
    pub require_clg_extension: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_clg_extension: env::var(env_vars::REQUIRE_CLG_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPreferences {
    /// Directory receiving generated files; the input's directory when unset
    pub output_dir: Option<PathBuf>,

    /// Backend names to run, in order
    pub backends: Vec<String>,

    /// Whether to print each written path
    pub print_written_paths: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            output_dir: env::var(env_vars::OUTPUT_DIR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            backends: env::var(env_vars::BACKENDS)
                .ok()
                .map(|v| parse_backend_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(default_backends),
            print_written_paths: env::var(env_vars::PRINT_WRITTEN_PATHS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// All four generators, markup first
pub fn default_backends() -> Vec<String> {
    ["xml", "dot", "document", "clist"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Split a comma separated backend list, dropping blanks
pub fn parse_backend_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether log events are echoed to the console
    pub enable_console_logging: bool,

    /// Minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOG_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOG_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOG_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub output: OutputPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const REQUIRE_CLG_EXTENSION: &str = "CLGEN_REQUIRE_EXTENSION";

    pub const OUTPUT_DIR: &str = "CLGEN_OUTPUT_DIR";
    pub const BACKENDS: &str = "CLGEN_BACKENDS";
    pub const PRINT_WRITTEN_PATHS: &str = "CLGEN_PRINT_WRITTEN_PATHS";

    pub const LOG_STRUCTURED: &str = "CLGEN_LOG_STRUCTURED";
    pub const LOG_CONSOLE: &str = "CLGEN_LOG_CONSOLE";
    pub const LOG_LEVEL: &str = "CLGEN_LOG_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_levels_case_insensitively() {
        assert_eq!(parse_log_level("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn backend_list_is_trimmed_and_lowercased() {
        assert_eq!(parse_backend_list(" XML, dot ,,clist"), vec!["xml", "dot", "clist"]);
        assert!(parse_backend_list(" , ").is_empty());
    }

    #[test]
    fn default_backends_cover_every_generator() {
        assert_eq!(default_backends(), vec!["xml", "dot", "document", "clist"]);
    }
}
