//! Line classification
//!
//! Pure predicates and derived values over a single raw text line. Anything
//! that needs context from neighbouring lines or from already-emitted output
//! lives in the `context` and `heading` modules instead.

/// Recognized PEP header field names (the text before the first colon in the
/// top-of-document header block).
pub const PEP_HEADER_NAMES: &[&str] = &[
    "PEP",
    "Title",
    "Version",
    "Last-Modified",
    "Author",
    "Author-Email",
    "Discussions-To",
    "Status",
    "Type",
    "Content-Type",
    "Requires",
    "Created",
    "Python-Version",
    "Post-History",
    "Replaces",
    "Superseded-By",
    "Resolution",
    "BDFL-Delegate",
];

/// Marker line that opens the trailing editor-metadata block.
pub const LOCAL_VARS_MARKER: &str = "Local Variables:";

/// Count of leading whitespace characters.
pub fn indentation(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

/// Coarse nesting depth. Source documents are assumed space-indented in
/// multiples of four, so this is `indentation / 4` truncated.
pub fn indentation_level(text: &str) -> usize {
    indentation(text) / 4
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub fn is_indented(text: &str) -> bool {
    !is_blank(text) && indentation(text) > 0
}

/// True when the line, after trimming trailing whitespace, ends with a colon.
pub fn ends_with_colon(text: &str) -> bool {
    text.trim_end().ends_with(':')
}

/// True when the text before the first colon exactly matches one of the
/// recognized PEP header field names.
pub fn is_pep_header(text: &str) -> bool {
    match text.split_once(':') {
        Some((name, _)) => PEP_HEADER_NAMES.contains(&name),
        None => false,
    }
}

pub fn is_content_type_header(text: &str) -> bool {
    starts_with_ignore_case(text, "Content-Type:")
}

pub fn is_type_header(text: &str) -> bool {
    starts_with_ignore_case(text, "Type:")
}

pub fn is_local_vars_marker(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(LOCAL_VARS_MARKER)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// If the line opens a list item, returns the width of its marker prefix:
/// 2 for `- ` / `* ` bullets, or the full matched prefix length for numbered
/// items (digits, dot, spaces). Continuation lines align under this width.
pub fn list_item_prefix_width(text: &str) -> Option<usize> {
    let trimmed = text.trim_start();
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return Some(2);
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    if !rest.starts_with('.') {
        return None;
    }
    let spaces = rest[1..].chars().take_while(|c| *c == ' ').count();
    if spaces == 0 {
        return None;
    }
    Some(digits + 1 + spaces)
}

pub fn is_list_item(text: &str) -> bool {
    list_item_prefix_width(text).is_some()
}

/// One raw input line. Immutable once read; the trailing line ending (LF or
/// CRLF) is stripped at read time and an LF is re-added on output.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub text: String,
    pub index: usize,
}

impl SourceLine {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        SourceLine {
            text: text.into(),
            index,
        }
    }

    /// The line with trailing whitespace removed, which is what all
    /// classification and rendering operate on. The raw `text` is kept for
    /// the verbatim local-vars block.
    pub fn trimmed(&self) -> &str {
        self.text.trim_end()
    }
}

/// A source line plus the two contextual flags the per-line predicates cannot
/// know. The flags are assigned exactly once by the context tracker, before
/// any heading/reference/paragraph handling, and never revised.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub source: SourceLine,
    pub is_code_block: bool,
    pub is_list_continuation: bool,
    /// Marker width inherited from the list item above, meaningful only when
    /// `is_list_continuation` is set.
    pub continuation_prefix: usize,
}

impl ClassifiedLine {
    pub fn text(&self) -> &str {
        self.source.trimmed()
    }

    pub fn is_blank(&self) -> bool {
        is_blank(self.text())
    }

    pub fn is_list_item(&self) -> bool {
        is_list_item(self.text())
    }
}
