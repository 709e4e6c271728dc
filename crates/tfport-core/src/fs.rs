//! Pluggable file system access
//!
//! Conversion never touches the disk directly. Every read goes through a
//! [`FileSystem`] handle supplied on the options, so callers can sandbox a
//! conversion or run several concurrently against different roots.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Read-only view of a module directory
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Names of the regular files directly under the root, sorted
    fn list_files(&self) -> io::Result<Vec<String>>;

    /// Read a file by its name relative to the root
    fn read_file(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// File system confined to a directory on disk
#[derive(Debug, Clone)]
pub struct BasePathFs {
    root: PathBuf,
}

impl BasePathFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root at the process's current working directory
    pub fn current_dir() -> io::Result<Self> {
        std::env::current_dir().map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let path = Path::new(name);
        let confined = path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if !confined || name.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path escapes module root: {}", name),
            ));
        }

        Ok(self.root.join(path))
    }
}

impl FileSystem for BasePathFs {
    fn list_files(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }

    fn read_file(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(name)?;
        tracing::trace!(path = %path.display(), "reading module file");
        std::fs::read(path)
    }
}

/// In-memory file system
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder style)
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), contents.into());
    }
}

impl FileSystem for MemoryFs {
    fn list_files(&self) -> io::Result<Vec<String>> {
        Ok(self
            .files
            .keys()
            .filter(|name| !name.contains('/'))
            .cloned()
            .collect())
    }

    fn read_file(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_path_lists_root_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tf"), "a = 1").unwrap();
        std::fs::write(dir.path().join("b.tf"), "b = 2").unwrap();
        std::fs::create_dir(dir.path().join("modules")).unwrap();
        std::fs::write(dir.path().join("modules/nested.tf"), "c = 3").unwrap();

        let fs = BasePathFs::new(dir.path());
        assert_eq!(fs.list_files().unwrap(), vec!["b.tf".to_string(), "main.tf".to_string()]);
        assert_eq!(fs.read_file("main.tf").unwrap(), b"a = 1".to_vec());
        assert_eq!(fs.read_file("./modules/nested.tf").unwrap(), b"c = 3".to_vec());
    }

    #[test]
    fn base_path_rejects_escape() {
        let dir = tempfile::tempdir().unwrap();
        let fs = BasePathFs::new(dir.path());

        let err = fs.read_file("../secret.tf").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(fs.read_file("/etc/passwd").is_err());
    }

    #[test]
    fn base_path_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = BasePathFs::new(dir.path().join("does-not-exist"));
        assert!(fs.list_files().is_err());
    }

    #[test]
    fn memory_fs_roundtrip() {
        let fs = MemoryFs::new()
            .with_file("main.tf", "x = 1")
            .with_file("nested/skip.tf", "y = 2");

        assert_eq!(fs.list_files().unwrap(), vec!["main.tf".to_string()]);
        assert_eq!(fs.read_file("main.tf").unwrap(), b"x = 1".to_vec());
        assert_eq!(fs.read_file("other.tf").unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
