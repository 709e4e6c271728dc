//! Fatal conversion errors
//!
//! These never carry source context. They mean the tool cannot proceed, not
//! that the input is malformed; malformed input is reported through
//! diagnostics instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot resolve working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("legacy conversion failed: {0}")]
    Legacy(String),

    /// Text produced by the legacy converter failed to re-parse
    #[error("internal fault: generated file {file} could not be parsed: {message}")]
    InternalFault { file: String, message: String },

    #[error("binding failed: {0}")]
    Bind(String),

    #[error("{target} generator failed: {message}")]
    Generator { target: String, message: String },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error signals a defect in the tool rather than in its input or environment
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Self::InternalFault { .. })
    }
}
