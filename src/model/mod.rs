//! Document model for extracted contracts.
//!
//! The model is the immutable intermediate representation between
//! segmentation and JSON rendering. Ordering of sections, and of clauses and
//! tables within a section, mirrors the reading order of the source PDF.

mod document;
mod section;
mod table;

pub use document::Document;
pub use section::{Clause, Section, SectionItem};
pub use table::{Table, TableRow};
