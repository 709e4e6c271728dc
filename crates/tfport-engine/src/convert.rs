//! Conversion entry point
//!
//! Selects a dialect, binds the canonical syntax files, and dispatches the
//! bound program to the requested target. Diagnostics from every stage are
//! gathered into one [`Diagnostics`] value; the first stage that leaves an
//! error in it stops the pipeline.

use crate::collaborator::{Binder, Binding, LegacyConverter, SyntaxParser};
use crate::context::ConvertContext;
use crate::dispatch::{Generators, TargetLanguage};
use crate::error::ConvertError;
use crate::fallback::{FallbackController, Selection};
use tfport_core::{ConversionReport, ConvertOptions, Diagnostics, GeneratedFiles, Handle};

/// Non-fatal result of a conversion
///
/// Generated output and error diagnostics are never returned together.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Output was produced; `diagnostics` holds warnings only
    Generated {
        files: GeneratedFiles,
        diagnostics: Diagnostics,
    },

    /// A stage reported errors; no output is surfaced
    Diagnosed { diagnostics: Diagnostics },
}

impl Conversion {
    /// Generated files, if the conversion succeeded
    pub fn files(&self) -> Option<&GeneratedFiles> {
        match self {
            Self::Generated { files, .. } => Some(files),
            Self::Diagnosed { .. } => None,
        }
    }

    pub fn into_files(self) -> Option<GeneratedFiles> {
        match self {
            Self::Generated { files, .. } => Some(files),
            Self::Diagnosed { .. } => None,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Self::Generated { diagnostics, .. } | Self::Diagnosed { diagnostics } => diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        matches!(self, Self::Diagnosed { .. })
    }

    /// Build a JSON-serializable report
    pub fn report(&self) -> ConversionReport {
        match self {
            Self::Generated { files, diagnostics } => ConversionReport::generated(files, diagnostics),
            Self::Diagnosed { diagnostics } => ConversionReport::diagnosed(diagnostics),
        }
    }
}

/// Build a report for any conversion result, fatal errors included
pub fn report_for(result: &Result<Conversion, ConvertError>) -> ConversionReport {
    match result {
        Ok(conversion) => conversion.report(),
        Err(err) => ConversionReport::fatal(err),
    }
}

/// Converts configuration modules using a fixed set of collaborators
///
/// A `Converter` holds no per-call state; concurrent calls are safe as long as
/// each supplies its own options.
pub struct Converter<S, P> {
    legacy: Box<dyn LegacyConverter>,
    parser: Box<dyn SyntaxParser<S>>,
    binder: Box<dyn Binder<S, P>>,
    generators: Generators<P>,
    default_provider_info: Option<Handle>,
}

impl<S, P> Converter<S, P> {
    pub fn new(
        legacy: impl LegacyConverter + 'static,
        parser: impl SyntaxParser<S> + 'static,
        binder: impl Binder<S, P> + 'static,
        generators: Generators<P>,
    ) -> Self {
        Self {
            legacy: Box::new(legacy),
            parser: Box::new(parser),
            binder: Box::new(binder),
            generators,
            default_provider_info: None,
        }
    }

    /// Provider information source used when options don't supply one
    pub fn with_default_provider_info(mut self, source: Handle) -> Self {
        self.default_provider_info = Some(source);
        self
    }

    /// Convert the module described by `options`.
    ///
    /// `Err` is reserved for failures of the tool or its environment;
    /// problems with the input come back as [`Conversion::Diagnosed`].
    pub fn convert(&self, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
        match &options.logger {
            Some(logger) => tracing::dispatcher::with_default(logger, || self.resolve_and_run(options)),
            None => self.resolve_and_run(options),
        }
    }

    fn resolve_and_run(&self, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
        let ctx = ConvertContext::resolve(options, self.default_provider_info.as_ref())?;
        self.run(&ctx)
    }

    fn run(&self, ctx: &ConvertContext) -> Result<Conversion, ConvertError> {
        let _span = tracing::debug_span!("convert", language = %ctx.options().target_language).entered();

        let controller = FallbackController::new(self.legacy.as_ref(), self.parser.as_ref(), ctx);
        let (files, mut diagnostics) = match controller.run()? {
            Selection::LegacyOnly(files) => {
                tracing::debug!(files = files.len(), "legacy conversion is final; skipping target generation");
                return Ok(Conversion::Generated {
                    files,
                    diagnostics: Diagnostics::new(),
                });
            }
            Selection::Diagnosed(diagnostics) => {
                tracing::debug!(errors = diagnostics.error_count(), "parsing failed");
                return Ok(Conversion::Diagnosed { diagnostics });
            }
            Selection::Modern { files, diagnostics } => (files, diagnostics),
        };

        let Binding {
            files,
            program,
            diagnostics: bind_diagnostics,
        } = self.binder.bind(files, ctx)?;
        diagnostics.record_files(files.iter().map(|f| &f.source));
        diagnostics.extend(bind_diagnostics);
        if diagnostics.has_errors() {
            tracing::debug!(errors = diagnostics.error_count(), "binding failed");
            return Ok(Conversion::Diagnosed { diagnostics });
        }

        let target = match ctx.options().target_language.parse::<TargetLanguage>() {
            Ok(target) => target,
            Err(unsupported) => {
                diagnostics.push(unsupported.to_diagnostic());
                return Ok(Conversion::Diagnosed { diagnostics });
            }
        };

        let output = self.generators.dispatch(target, program, &files, ctx)?;
        diagnostics.extend(output.diagnostics);
        if diagnostics.has_errors() {
            tracing::debug!(errors = diagnostics.error_count(), language = %target, "generation failed");
            return Ok(Conversion::Diagnosed { diagnostics });
        }

        tracing::debug!(files = output.files.len(), warnings = diagnostics.warning_count(), "conversion complete");
        Ok(Conversion::Generated {
            files: output.files,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, generated_files, MockLegacy};
    use tfport_core::{Diagnostic, DiagnosticCode, MemoryFs, ReportOutcome};

    #[test]
    fn conversion_accessors() {
        let generated = Conversion::Generated {
            files: generated_files([("index.ts", "x")]),
            diagnostics: Diagnostics::new(),
        };
        assert!(!generated.has_errors());
        assert_eq!(generated.files().unwrap().len(), 1);
        assert_eq!(generated.report().outcome, ReportOutcome::Generated);

        let diagnosed = Conversion::Diagnosed {
            diagnostics: vec![Diagnostic::error(DiagnosticCode::BindError, "x")].into_iter().collect(),
        };
        assert!(diagnosed.has_errors());
        assert!(diagnosed.files().is_none());
        assert!(diagnosed.clone().into_files().is_none());
        assert_eq!(diagnosed.report().summary.errors, 1);
    }

    #[test]
    fn fatal_report() {
        let result: Result<Conversion, ConvertError> = Err(ConvertError::Legacy("boom".to_string()));
        let report = report_for(&result);
        assert_eq!(report.outcome, ReportOutcome::Fatal);
        assert!(report.fatal.unwrap().contains("boom"));
    }

    #[test]
    fn unknown_target_is_diagnosed_after_binding() {
        let (converter, counters) = mock::converter(MockLegacy::unsupported("not legacy"));
        let options = ConvertOptions::default()
            .with_target("cobol")
            .with_root(MemoryFs::new().with_file("main.tf", "a = 1"));

        let conversion = converter.convert(&options).unwrap();
        let diags = conversion.diagnostics();
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.entries()[0].code, DiagnosticCode::UnsupportedTarget);
        assert!(diags.file("main.tf").is_some());
        assert_eq!(counters.generator_calls(), 0);
    }

    #[test]
    fn default_provider_info_is_used() {
        let (converter, _) = mock::converter(MockLegacy::complete(GeneratedFiles::new()));
        let converter = converter.with_default_provider_info(Handle::new("plugins"));
        let options = ConvertOptions::default().with_root(MemoryFs::new());

        assert!(converter.convert(&options).is_ok());
    }
}
