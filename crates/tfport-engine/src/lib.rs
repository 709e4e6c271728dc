//! tfport engine - conversion orchestration
//!
//! This crate turns a configuration module written in either the legacy or
//! the modern dialect into program source for a target language:
//! - Dialect selection with legacy-to-modern fallback
//! - Binding of the canonical syntax files
//! - Dispatch to the target language generator
//! - Diagnostics gating between every stage

pub mod collaborator;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod mock;

pub use collaborator::{
    Binder, Binding, GeneratorOutput, LegacyConverter, LegacyOutcome, ParsedFile, ParserFault,
    ProgramGenerator, SyntaxFile, SyntaxParser,
};
pub use context::ConvertContext;
pub use convert::{report_for, Conversion, Converter};
pub use dispatch::{Generators, TargetLanguage, UnsupportedTarget};
pub use error::ConvertError;
pub use fallback::{DialectState, FallbackController, Selection, Step};
