//! Diagnostic codes and structured diagnostics
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Parsing
    /// Source text is not valid in the dialect it was parsed as
    SyntaxError,

    // Binding
    /// General binding failure
    BindError,

    /// Reference to a variable that is not declared
    MissingVariable,

    /// Resource provider could not be resolved
    MissingProvider,

    /// Required resource property was not set
    MissingProperty,

    /// Comments could not be extracted from the source
    MissingComment,

    /// Resource inputs failed to typecheck
    TypecheckError,

    // Generation
    /// Target generator reported a failure
    GeneratorError,

    /// Requested target language is not known
    UnsupportedTarget,

    /// Construct cannot be expressed in the target language
    UnsupportedFeature,

    // General
    /// General warning message
    Warning,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::BindError => "BIND_ERROR",
            Self::MissingVariable => "MISSING_VARIABLE",
            Self::MissingProvider => "MISSING_PROVIDER",
            Self::MissingProperty => "MISSING_PROPERTY",
            Self::MissingComment => "MISSING_COMMENT",
            Self::TypecheckError => "TYPECHECK_ERROR",
            Self::GeneratorError => "GENERATOR_ERROR",
            Self::UnsupportedTarget => "UNSUPPORTED_TARGET",
            Self::UnsupportedFeature => "UNSUPPORTED_FEATURE",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - conversion continues
    Warn,

    /// Error - no further stage runs
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A position in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed, in characters)
    pub column: usize,

    /// Byte offset into the file (0-indexed)
    pub byte: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize, byte: usize) -> Self {
        Self { line, column, byte }
    }
}

/// A range of source text in a named file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// File name as recorded on the owning `SourceFile`
    pub file: String,

    /// Start of the range (inclusive)
    pub start: Pos,

    /// End of the range (exclusive)
    pub end: Pos,
}

impl SourceRange {
    /// Create a range between two positions
    pub fn new(file: impl Into<String>, start: Pos, end: Pos) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    /// Create a range covering a single line span
    pub fn on_line(file: impl Into<String>, line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            file: file.into(),
            start: Pos::new(line, start_column, 0),
            end: Pos::new(line, end_column, 0),
        }
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{},{}", self.file, self.start.line, self.start.column)
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Short, single-line description
    pub summary: String,

    /// Longer explanation, wrapped when rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Source range the diagnostic refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            summary: summary.into(),
            detail: None,
            range: None,
        }
    }

    pub fn error(code: DiagnosticCode, summary: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, summary)
    }

    pub fn warning(code: DiagnosticCode, summary: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, summary)
    }

    /// Set the detail text
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the source range
    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}: {}: {}", range, self.severity, self.summary),
            None => write!(f, "{}: {}", self.severity, self.summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::SyntaxError.as_str(), "SYNTAX_ERROR");
        assert_eq!(DiagnosticCode::UnsupportedTarget.as_str(), "UNSUPPORTED_TARGET");
        assert_eq!(DiagnosticCode::MissingVariable.to_string(), "MISSING_VARIABLE");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::error(DiagnosticCode::MissingVariable, "undefined variable \"region\"")
            .with_range(SourceRange::on_line("main.tf", 4, 12, 22));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("MISSING_VARIABLE"));
        assert!(json.contains("\"error\""));
        assert!(!json.contains("detail"));

        let parsed: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diag);
    }

    #[test]
    fn display_includes_location() {
        let diag = Diagnostic::warning(DiagnosticCode::Warning, "deprecated interpolation")
            .with_range(SourceRange::on_line("vars.tf", 7, 3, 9));

        assert_eq!(diag.to_string(), "vars.tf:7,3: warning: deprecated interpolation");
        assert!(!diag.is_error());
    }
}
