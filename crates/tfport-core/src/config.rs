//! Conversion options (tfport.toml)
//!
//! Plain settings load from TOML. Injected collaborators (file system, caches,
//! plugin host, logger) are attached in code and never serialized.

use crate::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Dialect version string that selects legacy semantics
pub const LEGACY_DIALECT_VERSION: &str = "11";

/// Opaque collaborator handed through to the binder
///
/// The core never looks inside; binders downcast to the concrete type they
/// expect.
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same collaborator
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handle(..)")
    }
}

/// Settings for a single conversion call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Allow binding to continue when required resource properties are missing
    pub allow_missing_properties: bool,

    /// Allow binding to continue when resource providers cannot be resolved
    pub allow_missing_providers: bool,

    /// Allow binding to continue when the configuration references undeclared variables
    pub allow_missing_variables: bool,

    /// Allow binding to continue when comments cannot be extracted
    pub allow_missing_comments: bool,

    /// Annotate top-level nodes in generated code with their source locations
    pub annotate_nodes_with_locations: bool,

    /// Remove `resource_name_property` from every resource before generation
    pub filter_resource_names: bool,

    /// Property removed when `filter_resource_names` is set
    pub resource_name_property: String,

    /// Continue even when resource inputs fail to typecheck
    pub skip_resource_typechecking: bool,

    /// Target language identifier (see `TargetLanguage` in the engine)
    pub target_language: String,

    /// Target SDK version
    pub target_sdk_version: String,

    /// Dialect version the input targets; `None` lets the legacy converter decide
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,

    /// Module root; defaults to the current working directory
    #[serde(skip)]
    pub root: Option<Arc<dyn FileSystem>>,

    /// Optional package cache
    #[serde(skip)]
    pub package_cache: Option<Handle>,

    /// Optional plugin host
    #[serde(skip)]
    pub plugin_host: Option<Handle>,

    /// Optional schema loader
    #[serde(skip)]
    pub loader: Option<Handle>,

    /// Optional source for provider schema information
    #[serde(skip)]
    pub provider_info_source: Option<Handle>,

    /// Optional logger; conversion events are dispatched here instead of the global subscriber
    #[serde(skip)]
    pub logger: Option<tracing::Dispatch>,

    /// Target-specific options, passed through to the generator untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_options: Option<serde_json::Value>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            allow_missing_properties: false,
            allow_missing_providers: false,
            allow_missing_variables: false,
            allow_missing_comments: false,
            annotate_nodes_with_locations: false,
            filter_resource_names: false,
            resource_name_property: "name".to_string(),
            skip_resource_typechecking: false,
            target_language: "typescript".to_string(),
            target_sdk_version: String::new(),
            terraform_version: None,
            root: None,
            package_cache: None,
            plugin_host: None,
            loader: None,
            provider_info_source: None,
            logger: None,
            target_options: None,
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load options from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save options to a TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Set the module root (builder style)
    pub fn with_root(mut self, root: impl FileSystem + 'static) -> Self {
        self.root = Some(Arc::new(root));
        self
    }

    /// Set the target language (builder style)
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_language = target.into();
        self
    }

    /// Pin the input dialect version (builder style)
    pub fn with_terraform_version(mut self, version: impl Into<String>) -> Self {
        self.terraform_version = Some(version.into());
        self
    }

    /// Whether the caller pinned a dialect version other than the legacy one
    ///
    /// A blank version counts as unpinned.
    pub fn pins_modern_dialect(&self) -> bool {
        matches!(
            self.terraform_version.as_deref().map(str::trim),
            Some(v) if !v.is_empty() && v != LEGACY_DIALECT_VERSION
        )
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
