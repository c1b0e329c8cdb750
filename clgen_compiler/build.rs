// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    symbols: SymbolLimits,
    output: OutputLayout,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    max_line_count: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_string_size: usize,
    max_identifier_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
}

#[derive(serde::Deserialize)]
struct SymbolLimits {
    max_symbols_per_scope: usize,
    max_scopes: usize,
}

#[derive(serde::Deserialize)]
struct OutputLayout {
    document_line_width: usize,
    document_page_length: usize,
    markup_indent_width: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CLGEN_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=CLGEN_CONFIG_DIR");

    let profile = env::var("CLGEN_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("CLGEN_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the clgen_compiler directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 100_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 1_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH {
        panic!("LIMITS: max_parse_depth exceeds absolute maximum");
    }

    if config.output.document_line_width < 20 {
        panic!("LAYOUT: document_line_width must be at least 20 columns");
    }

    if config.output.document_page_length < 10 {
        panic!("LAYOUT: document_page_length must be at least 10 lines");
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("LOGGING: max_log_events_per_file exceeds log_buffer_size");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const MAX_LINE_COUNT: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
    }}

    pub mod symbols {{
        pub const MAX_SYMBOLS_PER_SCOPE: usize = {};
        pub const MAX_SCOPES: usize = {};
    }}

    pub mod output {{
        pub const DOCUMENT_LINE_WIDTH: usize = {};
        pub const DOCUMENT_PAGE_LENGTH: usize = {};
        pub const MARKUP_INDENT_WIDTH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_ERROR_COLLECTION: usize = {};
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
    }}
}}
"#,
        profile,
        config.file_processing.max_file_size,
        config.file_processing.max_line_count,
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        config.syntax.max_parse_depth,
        config.symbols.max_symbols_per_scope,
        config.symbols.max_scopes,
        config.output.document_line_width,
        config.output.document_page_length,
        config.output.markup_indent_width,
        config.logging.max_error_collection,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
    );

    fs::write(output_path, constants_code).unwrap();
}
