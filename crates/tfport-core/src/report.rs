//! Conversion report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::Diagnostics;
use crate::source::GeneratedFiles;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// How a conversion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutcome {
    /// Output files were produced
    Generated,

    /// Stopped on diagnosed errors
    Diagnosed,

    /// Stopped on an infrastructure failure
    Fatal,
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of diagnostics
    pub total: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of generated files
    pub files_generated: usize,
}

/// Conversion report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Outcome
    pub outcome: ReportOutcome,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// Names of generated files, sorted
    pub files: Vec<String>,

    /// Fatal error message, if the conversion could not proceed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
}

impl ConversionReport {
    fn build(
        outcome: ReportOutcome,
        diagnostics: Vec<Diagnostic>,
        files: Vec<String>,
        fatal: Option<String>,
    ) -> Self {
        let summary = ReportSummary {
            total: diagnostics.len(),
            errors: diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
            warnings: diagnostics.iter().filter(|d| d.severity == Severity::Warn).count(),
            files_generated: files.len(),
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            outcome,
            summary,
            diagnostics,
            files,
            fatal,
        }
    }

    /// Report for a successful conversion
    pub fn generated(files: &GeneratedFiles, diagnostics: &Diagnostics) -> Self {
        Self::build(
            ReportOutcome::Generated,
            diagnostics.entries().to_vec(),
            files.keys().cloned().collect(),
            None,
        )
    }

    /// Report for a conversion stopped by diagnosed errors
    pub fn diagnosed(diagnostics: &Diagnostics) -> Self {
        Self::build(ReportOutcome::Diagnosed, diagnostics.entries().to_vec(), Vec::new(), None)
    }

    /// Report for a conversion stopped by a fatal error
    pub fn fatal(error: &dyn std::error::Error) -> Self {
        Self::build(ReportOutcome::Fatal, Vec::new(), Vec::new(), Some(error.to_string()))
    }

    /// Check if the conversion failed
    pub fn has_errors(&self) -> bool {
        self.outcome != ReportOutcome::Generated
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;

    #[test]
    fn generated_report() {
        let mut files = GeneratedFiles::new();
        files.insert("index.ts".to_string(), b"export {}".to_vec());
        let diagnostics: Diagnostics = vec![
            Diagnostic::warning(DiagnosticCode::Warning, "unused output"),
        ]
        .into_iter()
        .collect();

        let report = ConversionReport::generated(&files, &diagnostics);
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.files_generated, 1);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.files, vec!["index.ts".to_string()]);
        assert!(!report.has_errors());
    }

    #[test]
    fn diagnosed_report() {
        let diagnostics: Diagnostics = vec![
            Diagnostic::error(DiagnosticCode::SyntaxError, "unexpected '}'"),
            Diagnostic::warning(DiagnosticCode::Warning, "deprecated"),
        ]
        .into_iter()
        .collect();

        let report = ConversionReport::diagnosed(&diagnostics);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.errors, 1);
        assert!(report.files.is_empty());
        assert!(report.has_errors());
    }

    #[test]
    fn fatal_report_serialization() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let report = ConversionReport::fatal(&error);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"outcome\": \"fatal\""));
        assert!(json.contains("no such directory"));
        assert_eq!(report.summary.total, 0);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let diagnostics: Diagnostics = vec![
            Diagnostic::error(DiagnosticCode::MissingVariable, "undeclared variable \"region\""),
        ]
        .into_iter()
        .collect();
        let report = ConversionReport::diagnosed(&diagnostics);
        report.save_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: ConversionReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.outcome, ReportOutcome::Diagnosed);
    }
}
