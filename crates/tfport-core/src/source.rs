//! Source files and generated output

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generated output: file name to contents.
///
/// Keys are unique. Callers must not rely on iteration order, but a sorted map
/// keeps repeated conversions of the same module byte-for-byte identical.
pub type GeneratedFiles = BTreeMap<String, Vec<u8>>;

/// A named source file as produced by a parser stage
///
/// Shared between stages behind an `Arc`; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name, relative to the module root
    pub name: String,

    /// Raw contents
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Contents as text, replacing invalid UTF-8
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Get a single line (1-indexed) without its line terminator
    pub fn line(&self, number: usize) -> Option<String> {
        if number == 0 {
            return None;
        }

        self.text()
            .lines()
            .nth(number - 1)
            .map(|line| line.trim_end_matches('\r').to_string())
    }

    /// Number of lines in the file
    pub fn line_count(&self) -> usize {
        self.text().lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lookup() {
        let file = SourceFile::new("main.tf", "a = 1\r\nb = 2\nc = 3");

        assert_eq!(file.line(1).as_deref(), Some("a = 1"));
        assert_eq!(file.line(3).as_deref(), Some("c = 3"));
        assert_eq!(file.line(0), None);
        assert_eq!(file.line(4), None);
        assert_eq!(file.line_count(), 3);
    }

    #[test]
    fn lossy_text() {
        let file = SourceFile::new("bad.tf", vec![b'x', 0xff, b'y']);
        assert_eq!(file.text(), "x\u{fffd}y");
    }
}
