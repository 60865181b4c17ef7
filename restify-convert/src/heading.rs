//! Section heading detection
//!
//! A top-level heading is a non-blank, non-indented line with a blank line on
//! both sides. The last line of a document can never be a heading, since the
//! rule requires a following line to exist.

use crate::line;

/// Decide from the three-line window whether `current` is a section heading.
pub fn is_section_heading(current: &str, prev: &str, next: Option<&str>) -> bool {
    !line::is_blank(current)
        && line::indentation(current) == 0
        && line::is_blank(prev)
        && matches!(next, Some(text) if line::is_blank(text))
}

/// Heading text as rendered: trailing colons stripped.
pub fn heading_text(current: &str) -> &str {
    current.trim_end().trim_end_matches(':')
}

/// Underline for a heading, sized to the stripped heading text. The character
/// follows the heading's indentation level: `=` at the top level, `-` one
/// level in, `'` below that.
pub fn underline(current: &str) -> String {
    let ch = match line::indentation_level(current) {
        0 => '=',
        1 => '-',
        _ => '\'',
    };
    ch.to_string().repeat(heading_text(current).chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_surrounded_line_is_a_heading() {
        assert!(is_section_heading("Abstract", "", Some("")));
    }

    #[test]
    fn indented_line_is_not_a_heading() {
        assert!(!is_section_heading("    Abstract", "", Some("")));
    }

    #[test]
    fn heading_needs_blank_neighbours() {
        assert!(!is_section_heading("Abstract", "text above", Some("")));
        assert!(!is_section_heading("Abstract", "", Some("text below")));
    }

    #[test]
    fn last_line_is_never_a_heading() {
        assert!(!is_section_heading("Abstract", "", None));
    }

    #[test]
    fn trailing_colons_are_stripped() {
        assert_eq!(heading_text("References:"), "References");
        assert_eq!(heading_text("References"), "References");
    }

    #[test]
    fn underline_matches_stripped_text_length() {
        assert_eq!(underline("Abstract:"), "========");
        assert_eq!(underline("Motivation"), "==========");
    }
}
