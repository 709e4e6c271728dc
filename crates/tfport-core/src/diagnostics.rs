//! Diagnostics aggregation across conversion stages
//!
//! Every stage (parse, bind, generate) contributes entries to a single ordered
//! sequence. Source files are collected alongside so a renderer can always map
//! a diagnostic's range back to the original text, even when the pipeline stops
//! early.

use crate::diagnostic::{Diagnostic, Severity};
use crate::render::DiagnosticWriter;
use crate::source::SourceFile;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered diagnostics plus the source files they may refer to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    files: BTreeMap<String, Arc<SourceFile>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of entries with no files attached
    pub fn from_entries(entries: Vec<Diagnostic>) -> Self {
        Self {
            entries,
            files: BTreeMap::new(),
        }
    }

    /// Append a single diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Append a stage's diagnostics, preserving their order
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.entries.extend(diagnostics);
    }

    /// Record source files for rendering.
    ///
    /// A later file with the same name replaces the earlier one: downstream
    /// stages produce the text that downstream diagnostics point into.
    pub fn record_files<'a>(&mut self, files: impl IntoIterator<Item = &'a Arc<SourceFile>>) {
        for file in files {
            self.files.insert(file.name.clone(), Arc::clone(file));
        }
    }

    /// Merge another aggregate into this one (entries appended, files unioned)
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
        self.files.extend(other.files);
    }

    /// Whether any entry has error severity.
    ///
    /// This is the only gate used to decide whether the pipeline advances.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warn)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Source files retained for rendering, sorted by name
    pub fn files(&self) -> impl Iterator<Item = &Arc<SourceFile>> {
        self.files.values()
    }

    /// Look up a retained source file by name
    pub fn file(&self, name: &str) -> Option<&Arc<SourceFile>> {
        self.files.get(name)
    }

    /// Create a writer that renders these diagnostics with source context
    pub fn writer(&self, width: usize, color: bool) -> DiagnosticWriter<'_> {
        DiagnosticWriter::new(self, width, color)
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn warnings_do_not_gate() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning(DiagnosticCode::Warning, "unused variable"));

        assert!(!diags.has_errors());
        assert_eq!(diags.warning_count(), 1);

        diags.push(Diagnostic::error(DiagnosticCode::BindError, "unknown resource type"));
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn merge_preserves_order_and_unions_files() {
        let main = Arc::new(SourceFile::new("main.tf", "a = 1"));
        let vars = Arc::new(SourceFile::new("vars.tf", "b = 2"));

        let mut parse = Diagnostics::new();
        parse.push(Diagnostic::warning(DiagnosticCode::Warning, "first"));
        parse.record_files([&main]);

        let mut bind = Diagnostics::new();
        bind.push(Diagnostic::warning(DiagnosticCode::Warning, "second"));
        bind.record_files([&vars]);

        parse.merge(bind);

        let summaries: Vec<_> = parse.entries().iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, vec!["first", "second"]);

        let names: Vec<_> = parse.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["main.tf", "vars.tf"]);
    }

    #[test]
    fn later_file_with_same_name_wins() {
        let original = Arc::new(SourceFile::new("main.tf", "old"));
        let normalized = Arc::new(SourceFile::new("main.tf", "new"));

        let mut diags = Diagnostics::new();
        diags.record_files([&original]);
        diags.record_files([&normalized]);

        let kept = diags.file("main.tf").unwrap();
        assert!(Arc::ptr_eq(kept, &normalized));
    }

    #[test]
    fn collect_from_iterator() {
        let diags: Diagnostics = vec![
            Diagnostic::error(DiagnosticCode::SyntaxError, "unexpected token"),
        ]
        .into_iter()
        .collect();

        assert!(diags.has_errors());
        assert_eq!(diags.files().count(), 0);
    }
}
