//! Trailing editor-metadata block
//!
//! PEPs often end with an Emacs `Local Variables:` block. Once the marker is
//! seen the main conversion halts, and the remainder of the original document
//! is wrapped as an opaque reST comment: a `..` opener followed by every
//! original line indented by two spaces. Content is preserved verbatim;
//! line endings are normalized to LF like the rest of the output.

use crate::line::SourceLine;
use crate::output::OutputBuffer;

pub fn append_block(output: &mut OutputBuffer, remainder: &[SourceLine]) {
    output.push("..", None);
    for line in remainder {
        output.push(format!("  {}", line.text), None);
    }
}
