//! Per-call conversion context
//!
//! Defaults that would otherwise be looked up lazily (module root, provider
//! information source) are resolved once here. Nothing downstream mutates the
//! context.

use crate::error::ConvertError;
use std::sync::Arc;
use tfport_core::{BasePathFs, ConvertOptions, FileSystem, Handle};

/// Fully resolved, immutable settings for one conversion
#[derive(Debug, Clone)]
pub struct ConvertContext {
    options: ConvertOptions,
    root: Arc<dyn FileSystem>,
    provider_info: Option<Handle>,
}

impl ConvertContext {
    /// Resolve defaults for `options`.
    ///
    /// Fails only when no root was given and the working directory cannot be
    /// determined.
    pub fn resolve(
        options: &ConvertOptions,
        default_provider_info: Option<&Handle>,
    ) -> Result<Self, ConvertError> {
        let root = match &options.root {
            Some(root) => Arc::clone(root),
            None => {
                let fs = BasePathFs::current_dir().map_err(ConvertError::WorkingDirectory)?;
                tracing::debug!(root = %fs.root().display(), "defaulting module root to working directory");
                Arc::new(fs) as Arc<dyn FileSystem>
            }
        };

        let provider_info = options
            .provider_info_source
            .clone()
            .or_else(|| default_provider_info.cloned());

        Ok(Self {
            options: options.clone(),
            root,
            provider_info,
        })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// File system the module is read from
    pub fn root(&self) -> &dyn FileSystem {
        self.root.as_ref()
    }

    /// Provider schema source, after falling back to the converter default
    pub fn provider_info(&self) -> Option<&Handle> {
        self.provider_info.as_ref()
    }

    /// Opaque options for the selected generator
    pub fn target_options(&self) -> Option<&serde_json::Value> {
        self.options.target_options.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfport_core::MemoryFs;

    #[test]
    fn explicit_root_is_kept() {
        let options = ConvertOptions::default().with_root(MemoryFs::new().with_file("main.tf", "a = 1"));
        let ctx = ConvertContext::resolve(&options, None).unwrap();

        assert_eq!(ctx.root().list_files().unwrap(), vec!["main.tf".to_string()]);
    }

    #[test]
    fn missing_root_defaults_to_working_directory() {
        let ctx = ConvertContext::resolve(&ConvertOptions::default(), None).unwrap();
        // The crate directory is the working directory under cargo test.
        let files = ctx.root().list_files().unwrap();
        assert!(files.iter().any(|f| f == "Cargo.toml"));
    }

    #[test]
    fn provider_info_falls_back_to_default() {
        let default = Handle::new("builtin");
        let ctx = ConvertContext::resolve(&ConvertOptions::default().with_root(MemoryFs::new()), Some(&default))
            .unwrap();
        assert!(ctx.provider_info().unwrap().ptr_eq(&default));

        let mut options = ConvertOptions::default().with_root(MemoryFs::new());
        let explicit = Handle::new("explicit");
        options.provider_info_source = Some(explicit.clone());
        let ctx = ConvertContext::resolve(&options, Some(&default)).unwrap();
        assert!(ctx.provider_info().unwrap().ptr_eq(&explicit));
    }
}
