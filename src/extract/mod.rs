//! PDF text extraction.
//!
//! Produces ordered, positioned text runs from a PDF file, delegating glyph
//! and encoding decoding to lopdf.

mod reader;
mod runs;

pub use reader::{PageText, PdfReader, RawDocument};
pub use runs::{group_runs_into_lines, FontStatistics, TextLine, TextRun};
