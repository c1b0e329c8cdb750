//! Error codes and classification
//!
//! Single source of truth for every code the compiler logs, together with
//! the metadata used for severity, categorisation and help text.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONTRACT_VIOLATION: Code = Code::new("ERR004");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const INVALID_ESCAPE: Code = Code::new("E025");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_EOF: Code = Code::new("E040");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Symbol table and alias codes
pub mod symbols {
    use super::Code;

    pub const DUPLICATE_SYMBOL: Code = Code::new("E090");
    pub const DUPLICATE_ALIAS: Code = Code::new("E091");
    pub const UNDEFINED_ALIAS: Code = Code::new("E092");
    pub const TYPE_CONFLICT: Code = Code::new("W093");
    pub const SCOPE_LIMIT_EXCEEDED: Code = Code::new("E094");
}

/// Item and checklist semantic codes
pub mod semantic {
    use super::Code;

    pub const DUPLICATE_ITEM: Code = Code::new("E100");
    pub const DUPLICATE_STATE: Code = Code::new("E101");
    pub const DUPLICATE_CHECKLIST: Code = Code::new("E102");
    pub const UNDEFINED_ITEM: Code = Code::new("E110");
    pub const UNDEFINED_STATE: Code = Code::new("E111");
    pub const PASS_FAILED: Code = Code::new("E120");
}

/// Usage analysis warning codes
pub mod usage {
    use super::Code;

    pub const UNUSED_ITEM: Code = Code::new("W130");
    pub const UNUSED_STATE: Code = Code::new("W131");
}

/// Output generation error codes
pub mod backend {
    use super::Code;

    pub const OUTPUT_WRITE_FAILED: Code = Code::new("E150");
    pub const UNKNOWN_BACKEND: Code = Code::new("E151");
}

/// Markup reverse engineering error codes
pub mod reverse {
    use super::Code;

    pub const MALFORMED_MARKUP: Code = Code::new("E160");
    pub const MISSING_INCLUDE: Code = Code::new("E161");
    pub const UNEXPECTED_ELEMENT: Code = Code::new("E162");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_TREE_COMPLETE: Code = Code::new("I040");
    pub const ITEM_PASS_COMPLETE: Code = Code::new("I050");
    pub const CHECKLIST_PASS_COMPLETE: Code = Code::new("I060");
    pub const USAGE_ANALYSIS_COMPLETE: Code = Code::new("I070");
    pub const OUTPUT_WRITTEN: Code = Code::new("I080");
    pub const GENERATION_COMPLETE: Code = Code::new("I090");
    pub const REVERSE_COMPLETE: Code = Code::new("I091");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut add = |metadata: ErrorMetadata| {
            registry.insert(metadata.code, metadata);
        };

        // System
        add(ErrorMetadata::new(
            "ERR001",
            "System",
            Severity::Critical,
            false,
            true,
            "Critical internal compiler error",
            "File a bug report with the input that triggered it",
        ));
        add(ErrorMetadata::new(
            "ERR002",
            "System",
            Severity::Critical,
            false,
            true,
            "Compiler initialization failure",
            "Check the build configuration and environment variables",
        ));
        add(ErrorMetadata::new(
            "ERR004",
            "System",
            Severity::Critical,
            false,
            true,
            "Internal contract violated between lexer and semantic passes",
            "File a bug report with the input that triggered it",
        ));

        // File processing
        add(ErrorMetadata::new(
            "E005",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file not found",
            "Check the path and ensure the file exists",
        ));
        add(ErrorMetadata::new(
            "E006",
            "FileProcessing",
            Severity::Low,
            true,
            false,
            "Input file does not have the .clg extension",
            "Rename the file with a .clg extension",
        ));
        add(ErrorMetadata::new(
            "E007",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file exceeds the maximum size",
            "Split the checklists across several files",
        ));
        add(ErrorMetadata::new(
            "E008",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file is empty",
            "Provide a file with item and checklist definitions",
        ));
        add(ErrorMetadata::new(
            "E009",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Permission denied accessing file",
            "Check file permissions",
        ));
        add(ErrorMetadata::new(
            "E010",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file is not valid UTF-8",
            "Save the file with UTF-8 encoding",
        ));
        add(ErrorMetadata::new(
            "E011",
            "FileProcessing",
            Severity::High,
            false,
            true,
            "I/O error while reading input",
            "Check the file system and retry",
        ));
        add(ErrorMetadata::new(
            "E013",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file has too many lines",
            "Split the checklists across several files",
        ));

        // Lexical
        add(ErrorMetadata::new(
            "E020",
            "Lexical",
            Severity::High,
            false,
            true,
            "Invalid character in source",
            "Remove the character or place it inside a string literal",
        ));
        add(ErrorMetadata::new(
            "E021",
            "Lexical",
            Severity::High,
            false,
            true,
            "Unterminated string literal",
            "Add the closing double quote",
        ));
        add(ErrorMetadata::new(
            "E022",
            "Lexical",
            Severity::High,
            false,
            true,
            "Invalid numeric literal",
            "Use an integer like 42 or a decimal like 0.5",
        ));
        add(ErrorMetadata::new(
            "E023",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "Identifier exceeds maximum length",
            "Use a shorter alias name",
        ));
        add(ErrorMetadata::new(
            "E024",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "String literal exceeds maximum size",
            "Shorten the string literal",
        ));
        add(ErrorMetadata::new(
            "E025",
            "Lexical",
            Severity::High,
            false,
            true,
            "Unsupported escape sequence in string literal",
            "Only \\\" and \\\\ may be escaped",
        ));
        add(ErrorMetadata::new(
            "E026",
            "Lexical",
            Severity::High,
            false,
            true,
            "Unterminated block comment",
            "Close the comment with */",
        ));
        add(ErrorMetadata::new(
            "E027",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "Source produces too many tokens",
            "Split the checklists across several files",
        ));

        // Syntax
        add(ErrorMetadata::new(
            "E040",
            "Syntax",
            Severity::High,
            false,
            true,
            "Unexpected end of input",
            "Close every open block and parenthesis",
        ));
        add(ErrorMetadata::new(
            "E050",
            "Syntax",
            Severity::High,
            false,
            true,
            "Unexpected token",
            "Check the statement against the checklist grammar",
        ));
        add(ErrorMetadata::new(
            "E087",
            "Syntax",
            Severity::High,
            false,
            true,
            "Condition nesting exceeds maximum depth",
            "Simplify the condition",
        ));

        // Symbols
        add(ErrorMetadata::new(
            "E090",
            "Symbols",
            Severity::High,
            false,
            false,
            "Symbol already defined in scope",
            "Rename one of the definitions",
        ));
        add(ErrorMetadata::new(
            "E091",
            "Symbols",
            Severity::High,
            false,
            false,
            "Alias already defined in item",
            "Remove or rename the second alias declaration",
        ));
        add(ErrorMetadata::new(
            "E092",
            "Symbols",
            Severity::High,
            false,
            false,
            "Alias is not defined in item or global scope",
            "Declare the alias in the item or at the top level",
        ));
        add(ErrorMetadata::new(
            "W093",
            "Symbols",
            Severity::Low,
            true,
            false,
            "Alias used with incompatible types",
            "Check that the property is compared and assigned consistently",
        ));
        add(ErrorMetadata::new(
            "E094",
            "Symbols",
            Severity::Medium,
            false,
            false,
            "Symbol table scope limit exceeded",
            "Reduce the number of aliases or items",
        ));

        // Semantic
        add(ErrorMetadata::new(
            "E100",
            "Semantic",
            Severity::High,
            false,
            false,
            "Item defined more than once",
            "Remove or rename the second item definition",
        ));
        add(ErrorMetadata::new(
            "E101",
            "Semantic",
            Severity::High,
            false,
            false,
            "State defined more than once in item",
            "Remove or rename the second state definition",
        ));
        add(ErrorMetadata::new(
            "E102",
            "Semantic",
            Severity::High,
            false,
            false,
            "Checklist title defined more than once (ignoring case)",
            "Give each checklist a distinct title",
        ));
        add(ErrorMetadata::new(
            "E110",
            "Semantic",
            Severity::High,
            false,
            false,
            "Check refers to an undefined item",
            "Define the item or fix the item name in the check",
        ));
        add(ErrorMetadata::new(
            "E111",
            "Semantic",
            Severity::High,
            false,
            false,
            "Check refers to a state the item does not define",
            "Add the state to the item or fix the state name",
        ));
        add(ErrorMetadata::new(
            "E120",
            "Semantic",
            Severity::High,
            false,
            true,
            "Semantic pass reported errors",
            "Fix the reported errors and run again",
        ));

        // Usage
        add(ErrorMetadata::new(
            "W130",
            "Usage",
            Severity::Low,
            true,
            false,
            "Item is not used in any checklist",
            "Reference the item from a checklist or remove it",
        ));
        add(ErrorMetadata::new(
            "W131",
            "Usage",
            Severity::Low,
            true,
            false,
            "State is not used by any check",
            "Reference the state from a check or remove it",
        ));

        // Backend
        add(ErrorMetadata::new(
            "E150",
            "Backend",
            Severity::High,
            false,
            true,
            "Failed to write an output file",
            "Check that the output directory exists and is writable",
        ));
        add(ErrorMetadata::new(
            "E151",
            "Backend",
            Severity::Medium,
            false,
            true,
            "Unknown output backend requested",
            "Use one of: xml, dot, document, clist",
        ));

        // Reverse
        add(ErrorMetadata::new(
            "E160",
            "Reverse",
            Severity::High,
            false,
            true,
            "Markup document is malformed",
            "Check that the file was produced by the compiler",
        ));
        add(ErrorMetadata::new(
            "E161",
            "Reverse",
            Severity::High,
            false,
            true,
            "Wrapper references a checklist file that cannot be read",
            "Keep checklist files next to the wrapper document",
        ));
        add(ErrorMetadata::new(
            "E162",
            "Reverse",
            Severity::Medium,
            false,
            true,
            "Unexpected element in markup document",
            "Check that the file was produced by the compiler",
        ));

        // Success
        for (code, description) in [
            ("I004", "Logging system initialized"),
            ("I006", "Input file loaded"),
            ("I020", "Tokenization completed"),
            ("I040", "Parse tree constructed"),
            ("I050", "Item pass completed"),
            ("I060", "Checklist pass completed"),
            ("I070", "Usage analysis completed"),
            ("I080", "Output file written"),
            ("I090", "Generation completed"),
            ("I091", "Source regenerated from markup"),
        ] {
            add(ErrorMetadata::new(
                code,
                "Success",
                Severity::Low,
                true,
                false,
                description,
                "No action required",
            ));
        }

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Metadata for a code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Severity for a code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Whether an error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Whether an error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_errors_do_not_halt_the_pass() {
        // Duplicate and undefined errors accumulate until the pass ends
        for code in [
            semantic::DUPLICATE_ITEM,
            semantic::DUPLICATE_STATE,
            semantic::UNDEFINED_STATE,
            symbols::UNDEFINED_ALIAS,
        ] {
            assert!(!requires_halt(code.as_str()), "{} should not halt", code);
        }
        assert!(requires_halt(semantic::PASS_FAILED.as_str()));
    }

    #[test]
    fn type_conflict_is_recoverable() {
        assert!(is_recoverable(symbols::TYPE_CONFLICT.as_str()));
        assert_eq!(get_category(symbols::TYPE_CONFLICT.as_str()), "Symbols");
        assert_eq!(get_severity(symbols::TYPE_CONFLICT.as_str()), Severity::Low);
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_action("Z999"), "No specific action available");
        assert_eq!(get_category("Z999"), "Unknown");
        assert!(get_error_metadata("Z999").is_none());
    }

    #[test]
    fn success_codes_are_registered() {
        assert_eq!(
            get_description(success::GENERATION_COMPLETE.as_str()),
            "Generation completed"
        );
        assert_eq!(get_category(success::OUTPUT_WRITTEN.as_str()), "Success");
    }
}
