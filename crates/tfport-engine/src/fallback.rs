//! Dialect selection
//!
//! Decides which dialect a module is written in and produces exactly one set of
//! modern-dialect syntax files for the rest of the pipeline.
//!
//! ```text
//! Start ──legacy complete──────────────▶ LegacyOnly
//!   │   ──legacy failed────────────────▶ fatal
//!   │   ──translated──▶ Reparse ──ok───▶ Modern
//!   │                      │   ──errors▶ Diagnosed
//!   │                      └───fault──▶ fatal (internal)
//!   └──unsupported──▶ ParseDirect ──ok──────────────────▶ Modern
//!                          └──errors──▶ pinned to a modern version? Diagnosed
//!                                       otherwise the legacy error, fatal
//! ```

use crate::collaborator::{LegacyConverter, LegacyOutcome, SyntaxFile, SyntaxParser};
use crate::context::ConvertContext;
use crate::error::ConvertError;
use std::sync::Arc;
use tfport_core::{Diagnostics, GeneratedFiles, SourceFile};

/// Non-terminal states of dialect selection
#[derive(Debug)]
pub enum DialectState {
    /// Nothing attempted yet
    Start,

    /// Legacy converter produced modern text that must be parsed again
    Reparse { generated: GeneratedFiles },

    /// Legacy converter failed; try the module as modern source
    ParseDirect { legacy_error: ConvertError },
}

impl DialectState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Reparse { .. } => "reparse",
            Self::ParseDirect { .. } => "parse-direct",
        }
    }
}

/// Terminal, non-fatal outcome of dialect selection
#[derive(Debug)]
pub enum Selection<S> {
    /// Legacy output is final; no binding or target generation happens
    LegacyOnly(GeneratedFiles),

    /// Canonical modern syntax files, with any non-error diagnostics so far
    Modern {
        files: Vec<SyntaxFile<S>>,
        diagnostics: Diagnostics,
    },

    /// Parsing produced errors
    Diagnosed(Diagnostics),
}

/// Result of a single transition
#[derive(Debug)]
pub enum Step<S> {
    Next(DialectState),
    Done(Result<Selection<S>, ConvertError>),
}

/// Drives [`DialectState`] transitions
pub struct FallbackController<'a, S> {
    legacy: &'a dyn LegacyConverter,
    parser: &'a dyn SyntaxParser<S>,
    ctx: &'a ConvertContext,
}

impl<'a, S> FallbackController<'a, S> {
    pub fn new(
        legacy: &'a dyn LegacyConverter,
        parser: &'a dyn SyntaxParser<S>,
        ctx: &'a ConvertContext,
    ) -> Self {
        Self { legacy, parser, ctx }
    }

    /// Run from `Start` until a terminal outcome
    pub fn run(&self) -> Result<Selection<S>, ConvertError> {
        let mut state = DialectState::Start;
        loop {
            tracing::debug!(state = state.name(), "dialect selection");
            match self.step(state) {
                Step::Next(next) => state = next,
                Step::Done(result) => return result,
            }
        }
    }

    /// Perform one transition
    pub fn step(&self, state: DialectState) -> Step<S> {
        match state {
            DialectState::Start => self.start(),
            DialectState::Reparse { generated } => Step::Done(self.reparse(generated)),
            DialectState::ParseDirect { legacy_error } => Step::Done(self.parse_direct(legacy_error)),
        }
    }

    fn start(&self) -> Step<S> {
        match self.legacy.convert(self.ctx) {
            LegacyOutcome::Complete(files) => Step::Done(Ok(Selection::LegacyOnly(files))),
            LegacyOutcome::Failed(err) => Step::Done(Err(err)),
            LegacyOutcome::Translated(generated) => Step::Next(DialectState::Reparse { generated }),
            LegacyOutcome::Unsupported(legacy_error) => {
                Step::Next(DialectState::ParseDirect { legacy_error })
            }
        }
    }

    /// Parse text the legacy converter generated.
    ///
    /// The text is ours, so a parser fault is a defect in the translation and
    /// aborts as an internal fault. Syntax errors are still surfaced as
    /// diagnostics.
    fn reparse(&self, generated: GeneratedFiles) -> Result<Selection<S>, ConvertError> {
        let mut files = Vec::with_capacity(generated.len());
        let mut diagnostics = Diagnostics::new();

        for (name, contents) in &generated {
            tracing::trace!(file = %name, "parsing translated file");
            let parsed = self
                .parser
                .parse_file(name, contents)
                .map_err(|fault| ConvertError::InternalFault {
                    file: name.clone(),
                    message: fault.message,
                })?;

            diagnostics.record_files([&parsed.file.source]);
            diagnostics.extend(parsed.diagnostics);
            files.push(parsed.file);
        }

        if diagnostics.has_errors() {
            return Ok(Selection::Diagnosed(diagnostics));
        }

        Ok(Selection::Modern { files, diagnostics })
    }

    /// Parse the module as modern source after the legacy converter gave up
    fn parse_direct(&self, legacy_error: ConvertError) -> Result<Selection<S>, ConvertError> {
        let (files, diagnostics) = self.parse_module()?;

        if !diagnostics.has_errors() {
            tracing::warn!(error = %legacy_error, "discarding legacy failure after clean modern parse");
            return Ok(Selection::Modern { files, diagnostics });
        }

        if self.ctx.options().pins_modern_dialect() {
            tracing::debug!(
                version = ?self.ctx.options().terraform_version,
                "modern dialect pinned; reporting modern parse diagnostics"
            );
            return Ok(Selection::Diagnosed(diagnostics));
        }

        Err(legacy_error)
    }

    /// Read and parse every source file in the module root, in name order
    fn parse_module(&self) -> Result<(Vec<SyntaxFile<S>>, Diagnostics), ConvertError> {
        let root = self.ctx.root();
        let names = root.list_files().map_err(|e| ConvertError::io(".", e))?;

        let mut files = Vec::new();
        let mut diagnostics = Diagnostics::new();

        for name in names.into_iter().filter(|name| self.parser.is_source_file(name)) {
            let contents = root.read_file(&name).map_err(|e| ConvertError::io(&name, e))?;
            tracing::trace!(file = %name, bytes = contents.len(), "parsing module file");

            match self.parser.parse_file(&name, &contents) {
                Ok(parsed) => {
                    diagnostics.record_files([&parsed.file.source]);
                    diagnostics.extend(parsed.diagnostics);
                    files.push(parsed.file);
                }
                Err(fault) => {
                    let source = Arc::new(SourceFile::new(name, contents));
                    diagnostics.record_files([&source]);
                    diagnostics.push(fault.to_diagnostic());
                }
            }
        }

        Ok((files, diagnostics))
    }
}
