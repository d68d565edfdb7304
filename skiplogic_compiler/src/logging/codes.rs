//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
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

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Response value validation codes
pub mod response {
    use super::Code;

    pub const INVALID_INTEGER: Code = Code::new("E300");
    pub const INVALID_DECIMAL: Code = Code::new("E301");
    pub const INVALID_DATE: Code = Code::new("E302");
    pub const UNKNOWN_CHOICE: Code = Code::new("E303");
    pub const CHOICE_LIST_UNAVAILABLE: Code = Code::new("E304");
}

/// Criterion state transition codes
pub mod criterion {
    use super::Code;

    pub const QUESTION_NOT_FOUND: Code = Code::new("E320");
    pub const OPERATOR_NOT_ALLOWED: Code = Code::new("E321");
    pub const NO_QUESTION_SELECTED: Code = Code::new("E322");
    pub const QUESTION_HAS_NO_OPERATORS: Code = Code::new("E323");
}

/// Expression parser codes
pub mod parser {
    use super::Code;

    pub const EMPTY_EXPRESSION: Code = Code::new("E340");
    pub const UNRECOGNIZED_CRITERION: Code = Code::new("E341");
    pub const MIXED_DELIMITERS: Code = Code::new("E342");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E343");
    pub const TOO_MANY_CRITERIA: Code = Code::new("E344");
}

/// Rule builder codes
pub mod builder {
    use super::Code;

    pub const UNKNOWN_QUESTION_NAME: Code = Code::new("E360");
    pub const NO_MATCHING_OPERATOR: Code = Code::new("E361");
    pub const UNKNOWN_CHOICE_NAME: Code = Code::new("E362");
    pub const CRITERION_REJECTED: Code = Code::new("E363");
}

/// Configuration codes
pub mod config {
    use super::Code;

    pub const INVALID_CONFIG: Code = Code::new("E380");
    pub const CONFIG_FILE_UNREADABLE: Code = Code::new("E381");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CRITERION_SERIALIZED: Code = Code::new("I310");
    pub const RULE_SERIALIZED: Code = Code::new("I311");
    pub const EXPRESSION_PARSED: Code = Code::new("I340");
    pub const RULE_BUILT: Code = Code::new("I360");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const METADATA: &[ErrorMetadata] = &[
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "Logging system initialization failed",
        "Initialize logging once per process",
    ),
    ErrorMetadata::new(
        "E300",
        "Response",
        Severity::Low,
        true,
        "Response value is not a whole number",
        "Enter digits with an optional leading minus sign",
    ),
    ErrorMetadata::new(
        "E301",
        "Response",
        Severity::Low,
        true,
        "Response value is not a decimal number",
        "Enter a number using '.' or ',' as decimal separator",
    ),
    ErrorMetadata::new(
        "E302",
        "Response",
        Severity::Low,
        true,
        "Response value is not a calendar date",
        "Enter the date as YYYY-MM-DD",
    ),
    ErrorMetadata::new(
        "E303",
        "Response",
        Severity::Low,
        true,
        "Selected choice is not in the question's choice list",
        "Pick a choice from the current list",
    ),
    ErrorMetadata::new(
        "E304",
        "Response",
        Severity::Medium,
        true,
        "Question has no resolvable choice list",
        "Wait for the choice list to load or attach one to the question",
    ),
    ErrorMetadata::new(
        "E320",
        "Criterion",
        Severity::Medium,
        true,
        "Referenced question does not exist in the survey",
        "Select an existing question",
    ),
    ErrorMetadata::new(
        "E321",
        "Criterion",
        Severity::Low,
        true,
        "Operator is not allowed for the question type",
        "Select one of the question type's operators",
    ),
    ErrorMetadata::new(
        "E322",
        "Criterion",
        Severity::Low,
        true,
        "No question selected for the criterion",
        "Select a question before choosing an operator or value",
    ),
    ErrorMetadata::new(
        "E323",
        "Criterion",
        Severity::High,
        true,
        "Question type exposes no operators",
        "Check the question type profile table",
    ),
    ErrorMetadata::new(
        "E340",
        "Parser",
        Severity::Low,
        true,
        "Expression is empty",
        "Provide a relevance expression",
    ),
    ErrorMetadata::new(
        "E341",
        "Parser",
        Severity::Medium,
        true,
        "Expression contains a criterion outside the supported shapes",
        "Edit the expression as hand-coded logic",
    ),
    ErrorMetadata::new(
        "E342",
        "Parser",
        Severity::Medium,
        true,
        "Expression mixes 'and' and 'or'",
        "Edit the expression as hand-coded logic",
    ),
    ErrorMetadata::new(
        "E343",
        "Parser",
        Severity::High,
        true,
        "Expression exceeds maximum length",
        "Shorten the expression",
    ),
    ErrorMetadata::new(
        "E344",
        "Parser",
        Severity::High,
        true,
        "Expression contains too many criteria",
        "Split the rule into smaller rules",
    ),
    ErrorMetadata::new(
        "E360",
        "Builder",
        Severity::Medium,
        true,
        "Expression references a question name not in the survey",
        "Rename the reference or add the question",
    ),
    ErrorMetadata::new(
        "E361",
        "Builder",
        Severity::Medium,
        true,
        "No registry operator matches the parsed comparator",
        "Edit the expression as hand-coded logic",
    ),
    ErrorMetadata::new(
        "E362",
        "Builder",
        Severity::Medium,
        true,
        "Expression references a choice name not in the choice list",
        "Select an existing choice",
    ),
    ErrorMetadata::new(
        "E363",
        "Builder",
        Severity::Medium,
        true,
        "Criterion rejected the parsed operator or value",
        "Edit the expression as hand-coded logic",
    ),
    ErrorMetadata::new(
        "E380",
        "Config",
        Severity::High,
        true,
        "Configuration document is invalid",
        "Fix the TOML syntax or value types",
    ),
    ErrorMetadata::new(
        "E381",
        "Config",
        Severity::High,
        true,
        "Configuration file could not be read",
        "Check the configuration path and permissions",
    ),
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I310",
        "Criterion",
        Severity::Low,
        true,
        "Criterion serialized",
        "None",
    ),
    ErrorMetadata::new("I311", "Rule", Severity::Low, true, "Rule serialized", "None"),
    ErrorMetadata::new(
        "I340",
        "Parser",
        Severity::Low,
        true,
        "Expression parsed",
        "None",
    ),
    ErrorMetadata::new(
        "I360",
        "Builder",
        Severity::Low,
        true,
        "Rule rebuilt from expression",
        "None",
    ),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
