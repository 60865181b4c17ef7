//! Contextual line classification
//!
//! Two facts about a line cannot be read off the line itself: whether it sits
//! inside a code block, and whether it continues a list item. Both are
//! decided by scanning the already-emitted output, because deindentation
//! changes indentation levels line by line and only the emitted form is
//! authoritative.

use crate::line::{self, SourceLine};
use crate::output::OutputBuffer;

/// Decide whether `current` is inside a code block.
///
/// Scan the emitted output backward: skip to the first blank output line
/// (the gap before the current paragraph), then keep scanning past it until
/// a non-blank line with an indentation level strictly below the current
/// line's. If that anchor's originating source line ends with a colon, the
/// current line is code. The colon-terminated line / blank line /
/// more-indented content pattern is the idiomatic way a literal block is
/// introduced. The colon must be read off the source line because rendering
/// strips it from headings, and a blank-surrounded `foo:` renders as a
/// heading while still anchoring the code block below it.
pub fn in_code_block(output: &OutputBuffer, current: &SourceLine) -> bool {
    let text = current.trimmed();
    if line::is_blank(text) {
        return false;
    }
    let level = line::indentation_level(text);

    let mut records = output.records().iter().rev();

    // Phase one: find the blank gap before the current paragraph.
    let mut found_gap = false;
    for record in records.by_ref() {
        if record.is_blank() {
            found_gap = true;
            break;
        }
    }
    if !found_gap {
        return false;
    }

    // Phase two: the anchor is the first less-indented non-blank line above
    // the gap. Synthesized records (underlines, injected headers) have no
    // originating line and can never anchor a code block.
    for record in records {
        if record.is_blank() {
            continue;
        }
        let Some(classified) = record.line.as_ref() else {
            continue;
        };
        if line::indentation_level(&record.text) < level {
            return line::ends_with_colon(classified.text());
        }
    }
    false
}

/// Decide whether `current` continues the list item above it.
///
/// A line continues a list when the immediately preceding emitted record came
/// from a list item (or from a continuation of one) and the line does not
/// open a new item itself. The inherited prefix width aligns the continuation
/// under the item's text. A blank line resets continuation state; it does not
/// survive a paragraph break.
pub fn list_continuation(output: &OutputBuffer, current: &SourceLine) -> Option<usize> {
    let text = current.trimmed();
    if line::is_blank(text) || line::is_list_item(text) {
        return None;
    }

    let previous = output.last()?;
    if previous.is_blank() {
        return None;
    }
    let classified = previous.line.as_ref()?;

    if classified.is_list_item() {
        line::list_item_prefix_width(classified.text())
    } else if classified.is_list_continuation {
        Some(classified.continuation_prefix)
    } else {
        None
    }
}
