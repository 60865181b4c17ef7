//! Conversion driver
//!
//! Single forward pass over the source lines, producing an ordered output
//! buffer, followed by the reference back-link pass. The pass walks a small
//! state machine: header line (copied verbatim), body, references sub-mode,
//! and the terminal local-vars block.
//!
//! Per non-first line the orchestration order is fixed: contextual flags are
//! frozen first (from the emitted output), then the content-type declaration
//! is checked and repaired, then heading detection, then the local-vars
//! marker, then references or plain-paragraph handling.

use crate::context;
use crate::error::ConvertError;
use crate::heading;
use crate::inline::{self, LiteralTokens};
use crate::line::{self, ClassifiedLine, SourceLine};
use crate::local_vars;
use crate::output::OutputBuffer;
use crate::references::{self, ReferenceTable};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Normalized content-type declaration for converted documents.
pub const RST_CONTENT_TYPE: &str = "Content-Type: text/x-rst";

const REFERENCES_HEADING: &str = "References";

/// Options for one conversion run. The literal-token table is loaded once at
/// startup and shared read-only across documents.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub literal_tokens: LiteralTokens,
}

/// Successful conversion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedDocument {
    pub name: String,
    /// Finalized reStructuredText output.
    pub text: String,
    pub has_references: bool,
    pub has_local_vars: bool,
}

impl ConvertedDocument {
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            name: self.name.clone(),
            lines: self.text.lines().count(),
            has_references: self.has_references,
            has_local_vars: self.has_local_vars,
        }
    }
}

/// Compact per-document result for batch reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub name: String,
    pub lines: usize,
    pub has_references: bool,
    pub has_local_vars: bool,
}

#[derive(Debug, Default)]
struct ConversionState {
    inside_references: bool,
    has_references: bool,
    has_local_vars: bool,
    /// Output-buffer index of the References heading text, recorded when the
    /// heading is emitted and consumed by the back-link pass.
    references_heading_index: Option<usize>,
}

/// Content-type sniff used by callers to decide whether a document still
/// needs conversion: a declared plain-text content type, or no content-type
/// header at all.
pub fn needs_conversion(source: &str) -> bool {
    let mut has_content_type = false;
    let mut plain_text = false;
    for text in source.lines() {
        if line::is_content_type_header(text) {
            has_content_type = true;
            if text.contains("text/plain") {
                plain_text = true;
            }
        }
    }
    plain_text || !has_content_type
}

/// Convert one in-memory document.
pub fn convert_document(
    name: &str,
    source: &str,
    options: &ConvertOptions,
) -> Result<ConvertedDocument, ConvertError> {
    if source
        .lines()
        .any(|text| line::is_content_type_header(text) && text.contains("text/x-rst"))
    {
        return Err(ConvertError::ConversionNotRequired(name.to_string()));
    }

    let lines = source
        .lines()
        .enumerate()
        .map(|(index, text)| SourceLine::new(text, index))
        .collect();

    Converter {
        name,
        lines,
        tokens: &options.literal_tokens,
        output: OutputBuffer::new(),
        state: ConversionState::default(),
        references: ReferenceTable::new(),
    }
    .run()
}

/// Read and convert a document from disk. An unreadable source maps to
/// [`ConvertError::NotFound`].
pub fn convert_file(
    path: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConvertedDocument, ConvertError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|_| ConvertError::NotFound(name.clone()))?;
    convert_document(&name, &source, options)
}

struct Converter<'a> {
    name: &'a str,
    lines: Vec<SourceLine>,
    tokens: &'a LiteralTokens,
    output: OutputBuffer,
    state: ConversionState,
    references: ReferenceTable,
}

impl Converter<'_> {
    fn run(mut self) -> Result<ConvertedDocument, ConvertError> {
        self.forward_pass()?;
        self.link_references();
        Ok(ConvertedDocument {
            name: self.name.to_string(),
            text: self.output.render(),
            has_references: self.state.has_references,
            has_local_vars: self.state.has_local_vars,
        })
    }

    fn forward_pass(&mut self) -> Result<(), ConvertError> {
        for index in 0..self.lines.len() {
            let current = self.lines[index].clone();

            // The first line is the `PEP: NNNN` header, copied verbatim.
            if index == 0 {
                let classified = self.classify(current.clone());
                self.output.push(current.trimmed(), Some(classified));
                continue;
            }

            let prev = self.lines[index - 1].text.clone();
            let next = self.lines.get(index + 1).map(|l| l.text.clone());

            // Contextual flags are frozen before any other handling.
            let classified = self.classify(current);

            // Content-type repair runs on every line, independent of the
            // heading and reference handling below.
            if line::is_content_type_header(classified.text()) {
                self.output.push(RST_CONTENT_TYPE, Some(classified));
                continue;
            }
            if line::is_type_header(&prev) {
                // Type: header not followed by a content-type declaration.
                self.output.push(RST_CONTENT_TYPE, None);
            }

            if heading::is_section_heading(classified.text(), &prev, next.as_deref()) {
                self.emit_heading(classified);
                continue;
            }

            if line::is_local_vars_marker(classified.text()) {
                self.state.has_local_vars = true;
                let remainder = self.lines[index..].to_vec();
                local_vars::append_block(&mut self.output, &remainder);
                return Ok(());
            }

            if self.state.inside_references {
                let rendered = references::process_line(classified.text(), &mut self.references)
                    .map_err(|cause| ConvertError::Failed {
                        name: self.name.to_string(),
                        line: classified.source.text.clone(),
                        cause,
                    })?;
                self.output.push(rendered, Some(classified));
                continue;
            }

            self.handle_paragraph(classified);
        }
        Ok(())
    }

    fn classify(&self, source: SourceLine) -> ClassifiedLine {
        let is_code_block = context::in_code_block(&self.output, &source);
        let continuation = context::list_continuation(&self.output, &source);
        ClassifiedLine {
            source,
            is_code_block,
            is_list_continuation: continuation.is_some(),
            continuation_prefix: continuation.unwrap_or(0),
        }
    }

    fn emit_heading(&mut self, classified: ClassifiedLine) {
        let text = heading::heading_text(classified.text()).to_string();
        let underline = heading::underline(classified.text());

        self.output.ensure_blank_separator();
        let heading_index = self.output.len();
        self.output.push(text.clone(), Some(classified));
        self.output.push(underline, None);

        if text.eq_ignore_ascii_case(REFERENCES_HEADING) {
            self.state.inside_references = true;
            self.state.has_references = true;
            self.state.references_heading_index = Some(heading_index);
        } else if self.state.inside_references {
            // Moved past the references section.
            self.state.inside_references = false;
            self.references.reset_last();
        }
    }

    fn handle_paragraph(&mut self, classified: ClassifiedLine) {
        if classified.is_blank() {
            self.output.push("", Some(classified));
            return;
        }

        let text = classified.text().to_string();

        if line::is_indented(&text) {
            let rendered = if classified.is_list_continuation {
                let content = inline::rewrite(text.trim(), self.tokens);
                format!(
                    "{}{}",
                    " ".repeat(classified.continuation_prefix),
                    content
                )
            } else if classified.is_code_block {
                // Code keeps its internal relative indentation: drop one
                // nesting level with a four-space step, no inline rewriting.
                deindent(&text, 4)
            } else {
                let mut content = inline::rewrite(text.trim(), self.tokens);
                if line::ends_with_colon(&text) && !line::is_pep_header(text.trim()) {
                    // Double the colon: explicit literal-block marker.
                    content.push(':');
                }
                reindent(&text, 3, &content)
            };
            self.output.push(rendered, Some(classified));
            return;
        }

        // Non-indented lines: the header block passes through untouched,
        // everything else gets the inline rewrite.
        if line::is_pep_header(&text) {
            self.output.push(text, Some(classified));
            return;
        }

        let mut rendered = inline::rewrite(&text, self.tokens);
        if line::ends_with_colon(&text) && !classified.is_code_block {
            rendered.push(':');
            self.output.push(rendered, Some(classified));
            // A block-introducing line is followed by a blank line.
            self.output.push_blank();
        } else {
            self.output.push(rendered, Some(classified));
        }
    }

    /// Rewrite `[id]` occurrences before the References heading into the
    /// `[id]_` link form. Runs on the finalized buffer because the heading's
    /// position is only known once the whole document has been scanned.
    fn link_references(&mut self) {
        if self.references.is_empty() {
            return;
        }
        let Some(heading_index) = self.state.references_heading_index else {
            return;
        };

        let mut seen = HashSet::new();
        let ids: Vec<&String> = self
            .references
            .ids()
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .collect();

        for index in 0..heading_index {
            let text = &self.output.records()[index].text;
            let mut updated = text.clone();
            let mut changed = false;
            for id in &ids {
                let link = format!("[{id}]");
                if updated.contains(&link) {
                    updated = updated.replace(&link, &format!("{link}_"));
                    changed = true;
                }
            }
            if changed {
                self.output.replace_text(index, updated);
            }
        }
    }
}

/// Remove one nesting level: re-indent the trimmed content at
/// `step * (level - 1)`. Lines below one full level keep their original
/// indentation.
fn deindent(text: &str, step: usize) -> String {
    reindent(text, step, text.trim())
}

fn reindent(text: &str, step: usize, content: &str) -> String {
    let level = line::indentation_level(text);
    let width = if level >= 1 {
        step * (level - 1)
    } else {
        line::indentation(text)
    };
    format!("{}{}", " ".repeat(width), content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(source: &str) -> ConvertedDocument {
        convert_document("test", source, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn first_line_is_copied_verbatim() {
        let doc = convert("PEP: 9999\n");
        assert_eq!(doc.text, "PEP: 9999\n");
    }

    #[test]
    fn declared_rst_content_type_skips_conversion() {
        let err = convert_document(
            "pep-0287.txt",
            "PEP: 287\nContent-Type: text/x-rst\n",
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConvertError::ConversionNotRequired("pep-0287.txt".to_string())
        );
    }

    #[test]
    fn plain_content_type_is_normalized() {
        let doc = convert("PEP: 1\nContent-Type: text/plain\n");
        assert_eq!(doc.text, "PEP: 1\nContent-Type: text/x-rst\n");
    }

    #[test]
    fn missing_content_type_is_injected_after_type_header() {
        let doc = convert("PEP: 1\nType: Informational\nStatus: Draft\n");
        assert_eq!(
            doc.text,
            "PEP: 1\nType: Informational\nContent-Type: text/x-rst\nStatus: Draft\n"
        );
    }

    #[test]
    fn headings_get_underlines() {
        let doc = convert("PEP: 1\n\nAbstract\n\nBody text here.\n");
        assert_eq!(
            doc.text,
            "PEP: 1\n\nAbstract\n========\n\nBody text here.\n"
        );
    }

    #[test]
    fn heading_trailing_colon_is_stripped_from_text_and_underline() {
        let doc = convert("PEP: 1\n\nRationale:\n\nBody.\n");
        assert!(doc.text.contains("Rationale\n=========\n"));
        assert!(!doc.text.contains("Rationale:"));
    }

    #[test]
    fn indented_body_is_deindented_by_three_space_step() {
        let doc = convert("PEP: 1\n\nAbstract\n\n    This is body text.\n\n");
        assert!(doc.text.contains("\nThis is body text.\n"));
    }

    #[test]
    fn nested_body_keeps_one_level_less() {
        let doc = convert("PEP: 1\n\nAbstract\n\n        Deep text.\n\n");
        assert!(doc.text.contains("\n   Deep text.\n"));
    }

    #[test]
    fn list_continuation_inherits_bullet_prefix() {
        // The classic shape: an item and its wrapped second line.
        let doc = convert("- one\n  two\n");
        assert_eq!(doc.text, "- one\n  two\n");
    }

    #[test]
    fn code_block_lines_are_deindented_by_four_space_step() {
        let doc = convert(
            "PEP: 1\n\nAbstract\n\n    An example follows:\n\n        print(1)\n            print(2)\n",
        );
        // Intro drops to level zero with the literal-block marker.
        assert!(doc.text.contains("\nAn example follows::\n"));
        // Code drops one level with a four-space step, keeping its internal
        // relative indentation at that granularity.
        assert!(doc.text.contains("\n    print(1)\n"));
        assert!(doc.text.contains("\n        print(2)\n"));
    }

    #[test]
    fn blank_surrounded_colon_line_anchors_a_code_block() {
        // The colon line renders as a heading, yet the indented line below
        // still classifies as code: a four-space deindent step, not three.
        let doc = convert("A\n\nfoo:\n\n    bar\n");
        assert_eq!(doc.text, "A\n\nfoo\n===\n\nbar\n");
    }

    #[test]
    fn code_under_a_colon_heading_keeps_its_text_verbatim() {
        // No inline escaping inside code: the stray `*` survives as-is.
        let doc = convert("A\n\nfoo:\n\n        import *\n");
        assert_eq!(doc.text, "A\n\nfoo\n===\n\n    import *\n");
    }

    #[test]
    fn colon_paragraph_gets_marker_and_blank_line() {
        let doc = convert("PEP: 1\n\nAbstract\n\nbody text\nThe following:\n    code\n");
        assert!(doc.text.contains("The following::\n\n"));
    }

    #[test]
    fn references_section_is_reshaped() {
        let source = "PEP: 1\n\nIntro\n\n    See [1] for details.\n\nReferences\n\n    [1] https://example.org\n        continued\n";
        let doc = convert(source);
        assert!(doc.has_references);
        assert!(doc.text.contains("See [1]_ for details.\n"));
        assert!(doc.text.contains("\nReferences\n==========\n"));
        assert!(doc.text.contains("\n.. [1] https://example.org\n"));
        // Continuation aligned at 6 + len("1") spaces.
        assert!(doc.text.contains("\n       continued\n"));
    }

    #[test]
    fn back_links_are_not_rewritten_after_the_heading() {
        let source = "PEP: 1\n\nReferences\n\n    [1] https://example.org\n";
        let doc = convert(source);
        assert!(doc.text.contains(".. [1] https://example.org"));
        assert!(!doc.text.contains("[1]_"));
    }

    #[test]
    fn leaving_references_section_stops_reshaping() {
        let source = "PEP: 1\n\nReferences\n\n    [1] https://example.org\n\nCopyright\n\n    Public domain.\n";
        let doc = convert(source);
        assert!(doc.text.contains("\nCopyright\n=========\n"));
        assert!(doc.text.contains("\nPublic domain.\n"));
    }

    #[test]
    fn local_vars_block_truncates_conversion() {
        let source = "PEP: 1\n\nBody.\n\nLocal Variables:\nmode: indented-text\nEnd:\n";
        let doc = convert(source);
        assert!(doc.has_local_vars);
        assert!(doc.text.ends_with(
            "..\n  Local Variables:\n  mode: indented-text\n  End:\n"
        ));
        // Nothing after the marker is classified as body content.
        assert!(!doc.text.contains("\nmode: indented-text\n"));
    }

    #[test]
    fn unterminated_reference_reports_the_offending_line() {
        let source = "PEP: 1\n\nReferences\n\n    [broken https://example.org\n";
        let err =
            convert_document("pep-broken.txt", source, &ConvertOptions::default()).unwrap_err();
        match err {
            ConvertError::Failed { name, line, cause } => {
                assert_eq!(name, "pep-broken.txt");
                assert!(line.contains("[broken"));
                assert!(cause.contains("unterminated"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn literal_tokens_are_wrapped_in_body_but_not_headers() {
        let options = ConvertOptions {
            literal_tokens: LiteralTokens::new(vec!["__init__".to_string()]),
        };
        let source = "PEP: 1\nTitle: About __init__\nContent-Type: text/plain\n\nUse __init__ carefully.\n";
        let doc = convert_document("test", source, &options).unwrap();
        assert!(doc.text.contains("Title: About __init__\n"));
        assert!(doc.text.contains("Use ``__init__`` carefully.\n"));
    }

    #[test]
    fn crlf_source_is_normalized_to_lf() {
        let source = "PEP: 1\r\n\r\nIntro\r\n\r\n    Body text.\r\n\r\nLocal Variables:\r\nmode: text\r\nEnd:\r\n";
        let doc = convert(source);
        assert!(doc.has_local_vars);
        assert!(!doc.text.contains('\r'));
        assert!(doc
            .text
            .ends_with("..\n  Local Variables:\n  mode: text\n  End:\n"));
    }

    #[test]
    fn sniff_detects_documents_needing_conversion() {
        assert!(needs_conversion("PEP: 1\nContent-Type: text/plain\n"));
        assert!(needs_conversion("PEP: 1\nTitle: No content type\n"));
        assert!(!needs_conversion("PEP: 1\nContent-Type: text/x-rst\n"));
    }
}
