//! Human-readable diagnostic rendering
//!
//! Renders each diagnostic with a severity header, the offending source line
//! taken from the retained file set, and the detail text wrapped to a width.

use crate::diagnostic::{Diagnostic, Severity, SourceRange};
use crate::diagnostics::Diagnostics;
use colored::Colorize;
use std::io::{self, Write};

/// Writes diagnostics with source context
pub struct DiagnosticWriter<'a> {
    diagnostics: &'a Diagnostics,
    width: usize,
    color: bool,
}

impl<'a> DiagnosticWriter<'a> {
    /// Create a writer; a `width` of zero disables wrapping
    pub fn new(diagnostics: &'a Diagnostics, width: usize, color: bool) -> Self {
        Self {
            diagnostics,
            width,
            color,
        }
    }

    /// Write every diagnostic to `out`
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in self.diagnostics.entries() {
            self.write_diagnostic(out, diagnostic)?;
        }
        Ok(())
    }

    /// Render every diagnostic into a string
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        self.write(&mut buf).ok();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_diagnostic<W: Write>(&self, out: &mut W, diagnostic: &Diagnostic) -> io::Result<()> {
        let label = match diagnostic.severity {
            Severity::Error => "Error",
            Severity::Warn => "Warning",
        };
        let label = if self.color {
            match diagnostic.severity {
                Severity::Error => label.red().bold().to_string(),
                Severity::Warn => label.yellow().bold().to_string(),
            }
        } else {
            label.to_string()
        };
        let summary = if self.color {
            diagnostic.summary.bold().to_string()
        } else {
            diagnostic.summary.clone()
        };

        writeln!(out, "{}: {}", label, summary)?;
        writeln!(out)?;

        if let Some(range) = &diagnostic.range {
            self.write_snippet(out, range)?;
        }

        if let Some(detail) = &diagnostic.detail {
            for line in wrap(detail, self.width) {
                writeln!(out, "{}", line)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn write_snippet<W: Write>(&self, out: &mut W, range: &SourceRange) -> io::Result<()> {
        writeln!(out, "  on {} line {}:", range.file, range.start.line)?;

        let Some(line) = self
            .diagnostics
            .file(&range.file)
            .and_then(|file| file.line(range.start.line))
        else {
            writeln!(out)?;
            return Ok(());
        };

        let gutter = format!("{:>4}: ", range.start.line);
        writeln!(out, "{}{}", gutter, line)?;

        let line_len = line.chars().count();
        let start = range.start.column.max(1).min(line_len + 1);
        let end = if range.end.line == range.start.line && range.end.column > start {
            range.end.column.min(line_len + 1)
        } else {
            line_len + 1
        };
        let marker = "^".repeat(end.saturating_sub(start).max(1));
        let marker = if self.color {
            marker.red().to_string()
        } else {
            marker
        };

        writeln!(out, "{}{}", " ".repeat(gutter.len() + start - 1), marker)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
