//! Scripted collaborators for testing
//!
//! These stand in for the real legacy converter, parser, binder and
//! generators without pulling in a configuration-language toolchain.
//! They're useful for:
//! - Unit testing dialect selection and dispatch
//! - Integration testing the full conversion pipeline
//! - Simulating parser faults and binding failures
//!
//! The modern dialect understood by [`LineParser`] is one `key = value`
//! attribute per line, with `#` comments. A value of the form `var.NAME`
//! references the attribute `NAME`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tfport_engine::mock::{self, MockLegacy};
//! use tfport_core::{ConvertOptions, MemoryFs};
//!
//! let (converter, counters) = mock::converter(MockLegacy::unsupported("not legacy"));
//! let options = ConvertOptions::default()
//!     .with_target("python")
//!     .with_root(MemoryFs::new().with_file("main.tf", "region = \"us-east-1\""));
//! let conversion = converter.convert(&options)?;
//! assert_eq!(counters.python.load(Ordering::SeqCst), 1);
//! ```

use crate::collaborator::{
    Binder, Binding, GeneratorOutput, LegacyConverter, LegacyOutcome, ParsedFile, ParserFault,
    ProgramGenerator, SyntaxFile, SyntaxParser,
};
use crate::context::ConvertContext;
use crate::convert::Converter;
use crate::dispatch::Generators;
use crate::error::ConvertError;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tfport_core::{Diagnostic, DiagnosticCode, GeneratedFiles, Pos, Severity, SourceFile, SourceRange};

/// Build a `GeneratedFiles` map from string pairs
pub fn generated_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> GeneratedFiles {
    files
        .into_iter()
        .map(|(name, contents)| (name.to_string(), contents.as_bytes().to_vec()))
        .collect()
}

/// What [`MockLegacy`] reports on every call
#[derive(Debug, Clone)]
pub enum LegacyScript {
    Complete(GeneratedFiles),
    Failed(String),
    Translated(GeneratedFiles),
    Unsupported(String),
}

/// Legacy converter that replays a fixed outcome
#[derive(Debug)]
pub struct MockLegacy {
    script: LegacyScript,
    calls: Arc<AtomicUsize>,
}

impl MockLegacy {
    pub fn new(script: LegacyScript) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn complete(files: GeneratedFiles) -> Self {
        Self::new(LegacyScript::Complete(files))
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(LegacyScript::Failed(message.into()))
    }

    pub fn translated(files: GeneratedFiles) -> Self {
        Self::new(LegacyScript::Translated(files))
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(LegacyScript::Unsupported(message.into()))
    }

    /// Number of conversions performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared call counter, still readable after the converter is boxed
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl LegacyConverter for MockLegacy {
    fn convert(&self, _ctx: &ConvertContext) -> LegacyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.script {
            LegacyScript::Complete(files) => LegacyOutcome::Complete(files.clone()),
            LegacyScript::Failed(message) => LegacyOutcome::Failed(ConvertError::Legacy(message.clone())),
            LegacyScript::Translated(files) => LegacyOutcome::Translated(files.clone()),
            LegacyScript::Unsupported(message) => {
                LegacyOutcome::Unsupported(ConvertError::Legacy(message.clone()))
            }
        }
    }
}

/// A parsed `key = value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub file: String,
    pub line: usize,

    /// Column where the value starts (1-indexed)
    pub value_column: usize,
}

/// Parser for the line-oriented test dialect
#[derive(Debug, Default)]
pub struct LineParser {
    faults: HashSet<String>,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a [`ParserFault`] whenever `file` is parsed
    pub fn with_fault_on(mut self, file: impl Into<String>) -> Self {
        self.faults.insert(file.into());
        self
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl SyntaxParser<Vec<Attribute>> for LineParser {
    fn parse_file(&self, name: &str, contents: &[u8]) -> Result<ParsedFile<Vec<Attribute>>, ParserFault> {
        if self.faults.contains(name) {
            return Err(ParserFault::new(name, "injected reader failure"));
        }

        let text = std::str::from_utf8(contents)
            .map_err(|e| ParserFault::new(name, format!("file is not valid UTF-8: {}", e)))?;

        let mut attributes = Vec::new();
        let mut diagnostics = Vec::new();
        let mut offset = 0;

        for (index, raw) in text.split('\n').enumerate() {
            let line_number = index + 1;
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();
            let line_start = offset;
            offset += raw.len() + 1;

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = line.len() - line.trim_start().len();
            let parsed = trimmed.split_once('=').and_then(|(key, value)| {
                let key = key.trim();
                let value = value.trim();
                (is_identifier(key) && !value.is_empty()).then_some((key, value))
            });

            match parsed {
                Some((key, value)) => {
                    let eq = line.find('=').unwrap_or(indent);
                    let after = &line[eq + 1..];
                    let value_offset = eq + 1 + (after.len() - after.trim_start().len());
                    attributes.push(Attribute {
                        key: key.to_string(),
                        value: value.to_string(),
                        file: name.to_string(),
                        line: line_number,
                        value_column: line[..value_offset].chars().count() + 1,
                    });
                }
                None => {
                    let start_column = line[..indent].chars().count() + 1;
                    let end_column = line.chars().count() + 1;
                    diagnostics.push(
                        Diagnostic::error(DiagnosticCode::SyntaxError, "Invalid attribute definition")
                            .with_detail("Expected an attribute of the form `name = value`.")
                            .with_range(SourceRange::new(
                                name,
                                Pos::new(line_number, start_column, line_start + indent),
                                Pos::new(line_number, end_column, line_start + line.len()),
                            )),
                    );
                }
            }
        }

        Ok(ParsedFile {
            file: SyntaxFile::new(Arc::new(SourceFile::new(name, contents.to_vec())), attributes),
            diagnostics,
        })
    }
}

/// Program produced by [`MockBinder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProgram {
    pub attributes: Vec<Attribute>,
    pub annotate: bool,
}

/// Binder for the line-oriented test dialect
#[derive(Debug, Default)]
pub struct MockBinder {
    failure: Option<String>,
    warnings: Vec<String>,
}

impl MockBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail binding with a fatal error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Emit a warning on every bind
    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }
}

impl Binder<Vec<Attribute>, MockProgram> for MockBinder {
    fn bind(
        &self,
        files: Vec<SyntaxFile<Vec<Attribute>>>,
        ctx: &ConvertContext,
    ) -> Result<Binding<Vec<Attribute>, MockProgram>, ConvertError> {
        if let Some(message) = &self.failure {
            return Err(ConvertError::Bind(message.clone()));
        }

        let options = ctx.options();
        let declared: BTreeSet<&str> = files
            .iter()
            .flat_map(|f| f.syntax.iter().map(|a| a.key.as_str()))
            .collect();

        let mut diagnostics: Vec<Diagnostic> = self
            .warnings
            .iter()
            .map(|w| Diagnostic::warning(DiagnosticCode::Warning, w.clone()))
            .collect();

        for attribute in files.iter().flat_map(|f| f.syntax.iter()) {
            let Some(variable) = attribute.value.strip_prefix("var.") else {
                continue;
            };
            if declared.contains(variable) {
                continue;
            }

            let severity = if options.allow_missing_variables {
                Severity::Warn
            } else {
                Severity::Error
            };
            let end_column = attribute.value_column + attribute.value.chars().count();
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::MissingVariable,
                    severity,
                    format!("Undefined variable \"{}\"", variable),
                )
                .with_range(SourceRange::on_line(
                    attribute.file.clone(),
                    attribute.line,
                    attribute.value_column,
                    end_column,
                )),
            );
        }

        let attributes = files
            .iter()
            .flat_map(|f| f.syntax.iter())
            .filter(|a| !(options.filter_resource_names && a.key == options.resource_name_property))
            .cloned()
            .collect();

        Ok(Binding {
            files,
            program: MockProgram {
                attributes,
                annotate: options.annotate_nodes_with_locations,
            },
            diagnostics,
        })
    }
}

/// Generator that renders attributes as assignments in one output file
pub struct MockGenerator {
    file_name: &'static str,
    statement: fn(&str, &str) -> String,
    comment: &'static str,
    diagnostics: Vec<Diagnostic>,
    fault: Option<String>,
    calls: Arc<AtomicUsize>,
    target_options: Arc<Mutex<Option<serde_json::Value>>>,
}

impl MockGenerator {
    fn new(file_name: &'static str, comment: &'static str, statement: fn(&str, &str) -> String) -> Self {
        Self {
            file_name,
            statement,
            comment,
            diagnostics: Vec::new(),
            fault: None,
            calls: Arc::new(AtomicUsize::new(0)),
            target_options: Arc::new(Mutex::new(None)),
        }
    }

    pub fn typescript() -> Self {
        Self::new("index.ts", "//", |k, v| format!("export const {} = {};", k, v))
    }

    pub fn python() -> Self {
        Self::new("__main__.py", "#", |k, v| format!("{} = {}", k, v))
    }

    pub fn csharp() -> Self {
        Self::new("Program.cs", "//", |k, v| format!("var {} = {};", k, v))
    }

    pub fn go() -> Self {
        Self::new("main.go", "//", |k, v| format!("{} := {}", k, v))
    }

    /// Report a diagnostic alongside the output
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Fail generation with a fatal error
    pub fn with_fault(mut self, message: impl Into<String>) -> Self {
        self.fault = Some(message.into());
        self
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Target options seen by the most recent call
    pub fn target_options(&self) -> Arc<Mutex<Option<serde_json::Value>>> {
        Arc::clone(&self.target_options)
    }
}

impl ProgramGenerator<MockProgram> for MockGenerator {
    fn generate(&self, program: MockProgram, ctx: &ConvertContext) -> Result<GeneratorOutput, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.target_options.lock() {
            *seen = ctx.target_options().cloned();
        }

        if let Some(message) = &self.fault {
            return Err(ConvertError::Generator {
                target: self.file_name.to_string(),
                message: message.clone(),
            });
        }

        let mut source = String::new();
        for attribute in &program.attributes {
            if program.annotate {
                source.push_str(&format!(
                    "{} {}:{}\n",
                    self.comment, attribute.file, attribute.line
                ));
            }
            source.push_str(&(self.statement)(&attribute.key, &attribute.value));
            source.push('\n');
        }

        let mut files = GeneratedFiles::new();
        files.insert(self.file_name.to_string(), source.into_bytes());

        Ok(GeneratorOutput {
            files,
            diagnostics: self.diagnostics.clone(),
        })
    }
}

/// Invocation counters for the generators built by [`converter`]
#[derive(Debug, Clone)]
pub struct Counters {
    pub legacy: Arc<AtomicUsize>,
    pub typescript: Arc<AtomicUsize>,
    pub python: Arc<AtomicUsize>,
    pub csharp: Arc<AtomicUsize>,
    pub go: Arc<AtomicUsize>,
}

impl Counters {
    /// Total generator invocations across all targets
    pub fn generator_calls(&self) -> usize {
        [&self.typescript, &self.python, &self.csharp, &self.go]
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

/// Converter wired with mock collaborators and default generators
pub fn converter(legacy: MockLegacy) -> (Converter<Vec<Attribute>, MockProgram>, Counters) {
    converter_with(legacy, LineParser::new(), MockBinder::new())
}

/// Converter wired with the given mock parser and binder
pub fn converter_with(
    legacy: MockLegacy,
    parser: LineParser,
    binder: MockBinder,
) -> (Converter<Vec<Attribute>, MockProgram>, Counters) {
    let typescript = MockGenerator::typescript();
    let python = MockGenerator::python();
    let csharp = MockGenerator::csharp();
    let go = MockGenerator::go();

    let counters = Counters {
        legacy: legacy.counter(),
        typescript: typescript.counter(),
        python: python.counter(),
        csharp: csharp.counter(),
        go: go.counter(),
    };

    let converter = Converter::new(
        legacy,
        parser,
        binder,
        Generators::new(typescript, python, csharp, go),
    );

    (converter, counters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tfport_core::{ConvertOptions, MemoryFs};

    fn ctx(options: ConvertOptions) -> ConvertContext {
        ConvertContext::resolve(&options.with_root(MemoryFs::new()), None).unwrap()
    }

    fn parse(text: &str) -> ParsedFile<Vec<Attribute>> {
        LineParser::new().parse_file("main.tf", text.as_bytes()).unwrap()
    }

    #[test]
    fn parser_reads_attributes() {
        let parsed = parse("# comment\nregion = \"us-east-1\"\n\n  size = var.region\n");

        assert!(parsed.diagnostics.is_empty());
        let attrs = &parsed.file.syntax;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].key, "region");
        assert_eq!(attrs[0].value, "\"us-east-1\"");
        assert_eq!(attrs[0].line, 2);
        assert_eq!(attrs[1].key, "size");
        assert_eq!(attrs[1].line, 4);
        assert_eq!(attrs[1].value_column, 10);
    }

    #[test]
    fn parser_reports_invalid_lines() {
        let parsed = parse("a = 1\n  oops\n");

        assert_eq!(parsed.diagnostics.len(), 1);
        let range = parsed.diagnostics[0].range.clone().unwrap();
        assert_eq!(range.start, Pos::new(2, 3, 8));
        assert_eq!(range.end, Pos::new(2, 7, 12));
        assert_eq!(parsed.file.syntax.len(), 1);
    }

    #[test]
    fn parser_faults_on_invalid_utf8() {
        let err = LineParser::new().parse_file("bin.tf", &[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.file, "bin.tf");
    }

    #[test]
    fn binder_flags_missing_variables() {
        let parsed = parse("size = var.missing\n");
        let binding = MockBinder::new()
            .bind(vec![parsed.file.clone()], &ctx(ConvertOptions::default()))
            .unwrap();
        assert_eq!(binding.diagnostics.len(), 1);
        assert_eq!(binding.diagnostics[0].code, DiagnosticCode::MissingVariable);
        assert!(binding.diagnostics[0].is_error());

        let mut options = ConvertOptions::default();
        options.allow_missing_variables = true;
        let binding = MockBinder::new().bind(vec![parsed.file], &ctx(options)).unwrap();
        assert_eq!(binding.diagnostics[0].severity, Severity::Warn);
    }

    #[test]
    fn binder_filters_resource_names() {
        let parsed = parse("name = \"web\"\nsize = 2\n");
        let mut options = ConvertOptions::default();
        options.filter_resource_names = true;

        let binding = MockBinder::new().bind(vec![parsed.file], &ctx(options)).unwrap();
        let keys: Vec<_> = binding.program.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["size"]);
        assert_eq!(binding.files.len(), 1);
    }

    #[test]
    fn generator_annotates_locations() {
        let parsed = parse("size = 2\n");
        let program = MockProgram {
            attributes: parsed.file.syntax,
            annotate: true,
        };

        let output = MockGenerator::python()
            .generate(program, &ctx(ConvertOptions::default()))
            .unwrap();
        assert_eq!(
            String::from_utf8(output.files["__main__.py"].clone()).unwrap(),
            "# main.tf:1\nsize = 2\n"
        );
    }
}
