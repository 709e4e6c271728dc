//! Target language dispatch
//!
//! Maps a target identifier to the capability that produces output for it.
//! Adding a target means adding a `TargetLanguage` variant and one arm in
//! [`Generators::dispatch`].

use crate::collaborator::{GeneratorOutput, ProgramGenerator, SyntaxFile};
use crate::context::ConvertContext;
use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tfport_core::{Diagnostic, DiagnosticCode, GeneratedFiles};

/// Output language of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    TypeScript,

    /// The normalized configuration itself, not translated program source
    Pulumi,

    Python,

    CSharp,

    Go,
}

impl TargetLanguage {
    /// Every valid target
    pub const ALL: [TargetLanguage; 5] = [
        Self::TypeScript,
        Self::Pulumi,
        Self::Python,
        Self::CSharp,
        Self::Go,
    ];

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Pulumi => "pulumi",
            Self::Python => "python",
            Self::CSharp => "csharp",
            Self::Go => "go",
        }
    }

    /// Whether output is the canonical syntax files rather than generated code
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Pulumi)
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = UnsupportedTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| UnsupportedTarget { name: s.to_string() })
    }
}

/// A target identifier that names no known language
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported target language \"{name}\"")]
pub struct UnsupportedTarget {
    pub name: String,
}

impl UnsupportedTarget {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let valid: Vec<&str> = TargetLanguage::ALL.iter().map(TargetLanguage::as_str).collect();

        Diagnostic::error(
            DiagnosticCode::UnsupportedTarget,
            format!("Unsupported target language \"{}\"", self.name),
        )
        .with_detail(format!("Valid target languages are: {}.", valid.join(", ")))
    }
}

/// One generator per code-producing target
pub struct Generators<P> {
    typescript: Box<dyn ProgramGenerator<P>>,
    python: Box<dyn ProgramGenerator<P>>,
    csharp: Box<dyn ProgramGenerator<P>>,
    go: Box<dyn ProgramGenerator<P>>,
}

impl<P> Generators<P> {
    pub fn new(
        typescript: impl ProgramGenerator<P> + 'static,
        python: impl ProgramGenerator<P> + 'static,
        csharp: impl ProgramGenerator<P> + 'static,
        go: impl ProgramGenerator<P> + 'static,
    ) -> Self {
        Self {
            typescript: Box::new(typescript),
            python: Box::new(python),
            csharp: Box::new(csharp),
            go: Box::new(go),
        }
    }

    /// Produce output for `target`.
    ///
    /// `files` are the canonical syntax files the program was bound from; the
    /// passthrough target returns them verbatim and drops the program.
    pub fn dispatch<S>(
        &self,
        target: TargetLanguage,
        program: P,
        files: &[SyntaxFile<S>],
        ctx: &ConvertContext,
    ) -> Result<GeneratorOutput, ConvertError> {
        tracing::debug!(language = %target, "dispatching to generator");

        let generator = match target {
            TargetLanguage::Pulumi => return Ok(passthrough(files)),
            TargetLanguage::TypeScript => &self.typescript,
            TargetLanguage::Python => &self.python,
            TargetLanguage::CSharp => &self.csharp,
            TargetLanguage::Go => &self.go,
        };

        generator.generate(program, ctx)
    }
}

/// Serialize syntax files as-is
pub fn passthrough<S>(files: &[SyntaxFile<S>]) -> GeneratorOutput {
    let files: GeneratedFiles = files
        .iter()
        .map(|file| (file.name().to_string(), file.bytes().to_vec()))
        .collect();

    GeneratorOutput {
        files,
        diagnostics: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tfport_core::SourceFile;

    #[test]
    fn identifiers_are_stable() {
        let names: Vec<_> = TargetLanguage::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["typescript", "pulumi", "python", "csharp", "go"]);

        for target in TargetLanguage::ALL {
            assert_eq!(target.as_str().parse::<TargetLanguage>().unwrap(), target);
        }
    }

    #[test]
    fn serde_uses_identifiers() {
        assert_eq!(serde_json::to_string(&TargetLanguage::CSharp).unwrap(), "\"csharp\"");
        let parsed: TargetLanguage = serde_json::from_str("\"typescript\"").unwrap();
        assert_eq!(parsed, TargetLanguage::TypeScript);
    }

    #[test]
    fn unknown_identifier_is_diagnosed() {
        let err = "rust".parse::<TargetLanguage>().unwrap_err();
        assert_eq!(err.name, "rust");

        let diag = err.to_diagnostic();
        assert_eq!(diag.code, DiagnosticCode::UnsupportedTarget);
        assert!(diag.is_error());
        assert!(diag.detail.unwrap().contains("typescript, pulumi, python, csharp, go"));
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        assert!("TypeScript".parse::<TargetLanguage>().is_err());
        assert!("".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn passthrough_copies_name_and_bytes() {
        let files = vec![
            SyntaxFile::new(Arc::new(SourceFile::new("main.tf", "a = 1\n")), ()),
            SyntaxFile::new(Arc::new(SourceFile::new("vars.tf", "b = 2\n")), ()),
        ];

        let output = passthrough(&files);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.files.len(), 2);
        assert_eq!(output.files["main.tf"], b"a = 1\n".to_vec());
        assert_eq!(output.files["vars.tf"], b"b = 2\n".to_vec());
        assert!(TargetLanguage::Pulumi.is_passthrough());
    }
}
