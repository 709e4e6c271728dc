//! tfport core
//!
//! Core domain model shared by every conversion stage.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod diagnostics;
pub mod source;
pub mod render;
pub mod fs;
pub mod config;
pub mod report;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Pos, SourceRange};
pub use diagnostics::Diagnostics;
pub use source::{SourceFile, GeneratedFiles};
pub use render::DiagnosticWriter;
pub use fs::{FileSystem, BasePathFs, MemoryFs};
pub use config::{ConvertOptions, ConfigError, Handle, LEGACY_DIALECT_VERSION};
pub use report::{ConversionReport, ReportOutcome, ReportVersion};
