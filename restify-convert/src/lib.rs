//! Plain-text PEP to reStructuredText conversion
//!
//!     This crate converts the old plain-text PEP layout (fixed header block,
//!     indented prose body, References section, trailing Local Variables
//!     block) into reStructuredText with explicit section underlines, literal
//!     block markers and reference links.
//!
//! Architecture
//!
//!     The engine is line-oriented and single-pass. Each input line is
//!     classified (./line.rs), given its two contextual flags by scanning the
//!     already-emitted output (./context.rs), and dispatched by the driver
//!     (./convert.rs) to heading, reference, local-vars or plain-paragraph
//!     handling. The output is an append-only log of records (./output.rs)
//!     that carries a back-reference from each rendered line to its source
//!     line, so later lines can consult both the emitted, already deindented
//!     form and the source line that produced it (rendering strips detail,
//!     like a heading's trailing colon, that classification still needs).
//!
//!     Classification is deliberately not local: whether a line sits in a
//!     code block depends on the colon-terminated anchor above the blank gap
//!     in the *emitted* buffer, and whether it continues a list item depends
//!     on the record emitted immediately before it. The unit of correctness
//!     is the (line, accumulated output) pair, not the line.
//!
//!     Reference links need a second pass: `[id]` occurrences before the
//!     References heading become `[id]_`, and the heading's position is only
//!     known once the whole document has been scanned (./references.rs and
//!     the back-link pass in ./convert.rs).
//!
//!     This is a pure lib: it powers the restify CLI but is shell agnostic.
//!     No code here prints, reads env vars or assumes a terminal.
//!
//! Failure semantics
//!
//!     A document that already declares `text/x-rst` is a skip, not an error.
//!     An unreadable source is `NotFound`. Anything that fails during
//!     classification or rendering is surfaced with the offending raw line
//!     attached, and a failed conversion never leaves a partially written
//!     destination (./error.rs, ./output.rs).

pub mod context;
pub mod convert;
pub mod error;
pub mod heading;
pub mod inline;
pub mod line;
pub mod local_vars;
pub mod output;
pub mod references;

pub use convert::{
    convert_document, convert_file, needs_conversion, ConversionSummary, ConvertOptions,
    ConvertedDocument, RST_CONTENT_TYPE,
};
pub use error::ConvertError;
pub use inline::LiteralTokens;
