//! Interfaces of the stages the converter drives
//!
//! The legacy converter, the modern parser, the binder and the per-language
//! generators are supplied by the caller. `S` is the parser's syntax tree type
//! and `P` the bound program type; the converter never looks inside either.

use crate::context::ConvertContext;
use crate::error::ConvertError;
use std::sync::Arc;
use tfport_core::{Diagnostic, DiagnosticCode, GeneratedFiles, SourceFile, SourceRange};

/// What the legacy converter made of the module
#[derive(Debug)]
pub enum LegacyOutcome {
    /// Legacy semantics apply; these files are the final output
    Complete(GeneratedFiles),

    /// Legacy semantics apply, but conversion failed
    Failed(ConvertError),

    /// Modern processing is required; these files are equivalent modern-dialect text
    Translated(GeneratedFiles),

    /// Modern processing is required and the legacy converter could not translate the module
    Unsupported(ConvertError),
}

impl LegacyOutcome {
    /// Whether the module must go through the modern parser
    pub fn requires_modern(&self) -> bool {
        matches!(self, Self::Translated(_) | Self::Unsupported(_))
    }
}

/// Converts legacy-dialect modules
pub trait LegacyConverter: Send + Sync {
    /// Convert the module under `ctx.root()`
    fn convert(&self, ctx: &ConvertContext) -> LegacyOutcome;
}

/// The parser could not process a file at all (as opposed to finding syntax errors in it)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}: {message}")]
pub struct ParserFault {
    pub file: String,
    pub message: String,
}

impl ParserFault {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Convert to a diagnostic for user-supplied input
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(DiagnosticCode::SyntaxError, format!("Failed to parse {}", self.file))
            .with_detail(self.message.clone())
            .with_range(SourceRange::on_line(self.file.clone(), 1, 1, 1))
    }
}

/// A source file together with its parsed syntax
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxFile<S> {
    pub source: Arc<SourceFile>,
    pub syntax: S,
}

impl<S> SyntaxFile<S> {
    pub fn new(source: Arc<SourceFile>, syntax: S) -> Self {
        Self { source, syntax }
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.source.bytes
    }
}

/// Result of parsing one file
#[derive(Debug, Clone)]
pub struct ParsedFile<S> {
    pub file: SyntaxFile<S>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses modern-dialect source text
pub trait SyntaxParser<S>: Send + Sync {
    /// Parse a single file.
    ///
    /// Syntax errors belong in `ParsedFile::diagnostics`; `Err` is reserved
    /// for failures to process the input at all.
    fn parse_file(&self, name: &str, contents: &[u8]) -> Result<ParsedFile<S>, ParserFault>;

    /// Whether a file in the module root is modern-dialect source
    fn is_source_file(&self, name: &str) -> bool {
        name.ends_with(".tf")
    }
}

/// Output of binding
#[derive(Debug)]
pub struct Binding<S, P> {
    /// The canonical syntax files the program was bound from
    pub files: Vec<SyntaxFile<S>>,

    pub program: P,

    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves references and types over syntax files
pub trait Binder<S, P>: Send + Sync {
    /// Bind `files` into a program.
    ///
    /// The allow-missing, filtering, annotation and typecheck flags are read
    /// from `ctx.options()`.
    fn bind(&self, files: Vec<SyntaxFile<S>>, ctx: &ConvertContext) -> Result<Binding<S, P>, ConvertError>;
}

/// Output of a generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorOutput {
    pub files: GeneratedFiles,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns a bound program into source files for one target language
pub trait ProgramGenerator<P>: Send + Sync {
    /// Generate output; the program is consumed
    fn generate(&self, program: P, ctx: &ConvertContext) -> Result<GeneratorOutput, ConvertError>;
}
