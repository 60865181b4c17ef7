//! Output buffer and writer
//!
//! The conversion pass appends to an ordered log of output records. Each
//! record carries the rendered text plus a back-reference to the classified
//! line that produced it, so later lines can inspect emitted (already
//! deindented) context instead of re-parsing raw input.

use crate::line::{self, ClassifiedLine};
use std::fs;
use std::io;
use std::path::Path;

/// One emitted output line. `text` carries no trailing newline; the writer
/// appends line endings. Synthesized lines (underlines, injected headers,
/// blank separators) have no originating line.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub text: String,
    pub line: Option<ClassifiedLine>,
}

impl OutputRecord {
    pub fn is_blank(&self) -> bool {
        line::is_blank(&self.text)
    }
}

/// Append-only sequence of output records for one document conversion.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    records: Vec<OutputRecord>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer::default()
    }

    pub fn push(&mut self, text: impl Into<String>, line: Option<ClassifiedLine>) {
        self.records.push(OutputRecord {
            text: text.into(),
            line,
        });
    }

    pub fn push_blank(&mut self) {
        self.push("", None);
    }

    /// Insert a single blank separator unless the buffer already ends with
    /// one. Headings always render with a blank line above.
    pub fn ensure_blank_separator(&mut self) {
        match self.records.last() {
            Some(record) if !record.is_blank() => self.push_blank(),
            _ => {}
        }
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&OutputRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rewrite a finalized record in place. Used only by the reference
    /// back-link pass, which runs after the forward pass completes.
    pub fn replace_text(&mut self, index: usize, text: String) {
        self.records[index].text = text;
    }

    /// Serialize the buffer to its final textual form, one line per record.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.text);
            out.push('\n');
        }
        out
    }
}

/// Write fully rendered output to the destination in one operation, so a
/// failed conversion never leaves a partially written document behind.
pub fn write_document(path: impl AsRef<Path>, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_appends_line_endings() {
        let mut buffer = OutputBuffer::new();
        buffer.push("one", None);
        buffer.push_blank();
        buffer.push("two", None);
        assert_eq!(buffer.render(), "one\n\ntwo\n");
    }

    #[test]
    fn blank_separator_is_not_duplicated() {
        let mut buffer = OutputBuffer::new();
        buffer.push("text", None);
        buffer.ensure_blank_separator();
        buffer.ensure_blank_separator();
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn blank_separator_is_skipped_on_empty_buffer() {
        let mut buffer = OutputBuffer::new();
        buffer.ensure_blank_separator();
        assert!(buffer.is_empty());
    }
}
