//! # contrex
//!
//! Contract PDF extraction library for Rust.
//!
//! This library extracts metadata, sections, clauses, and tables from PDF
//! contract documents into structured JSON, preserving reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use contrex::{parse_file, render, JsonFormat};
//!
//! fn main() -> contrex::Result<()> {
//!     // Parse a contract PDF
//!     let document = parse_file("lease.pdf")?;
//!
//!     // Serialize to JSON
//!     let json = render::to_json(&document, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Metadata extraction**: title, contract type, effective date
//! - **Structure preservation**: sections, labeled clauses, tables
//! - **Reading order**: tables interleave with text where they appear
//! - **Text normalization**: quotes, dashes, ligatures, whitespace
//! - **Batch processing**: uses Rayon across input files

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{Clause, Document, Section, SectionItem, Table, TableRow};
pub use normalize::Normalizer;
pub use render::JsonFormat;
pub use segment::{SegmentOptions, Segmenter, TableDetectorConfig};

use std::path::{Path, PathBuf};

use extract::PdfReader;
use rayon::prelude::*;

/// Parse a contract PDF file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use contrex::parse_file;
///
/// let document = parse_file("lease.pdf").unwrap();
/// println!("Sections: {}", document.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, SegmentOptions::default())
}

/// Parse a contract PDF file with custom segmentation options.
///
/// # Example
///
/// ```no_run
/// use contrex::{parse_file_with_options, SegmentOptions};
///
/// let options = SegmentOptions::default().with_heading_size_delta(2.0);
/// let document = parse_file_with_options("lease.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: SegmentOptions,
) -> Result<Document> {
    let reader = PdfReader::open(path)?;
    let raw = reader.extract()?;
    Ok(Segmenter::with_options(options).segment(&raw))
}

/// Parse a contract PDF from bytes.
///
/// # Example
///
/// ```no_run
/// use contrex::parse_bytes;
///
/// let data = std::fs::read("lease.pdf").unwrap();
/// let document = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    parse_bytes_with_options(data, SegmentOptions::default())
}

/// Parse a contract PDF from bytes with custom segmentation options.
pub fn parse_bytes_with_options(data: &[u8], options: SegmentOptions) -> Result<Document> {
    let reader = PdfReader::from_bytes(data.to_vec())?;
    let raw = reader.extract()?;
    Ok(Segmenter::with_options(options).segment(&raw))
}

/// Extract plain text from a contract PDF file.
///
/// # Example
///
/// ```no_run
/// use contrex::extract_text;
///
/// let text = extract_text("lease.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let document = parse_file(path)?;
    Ok(document.plain_text())
}

/// Convert a contract PDF to JSON.
///
/// # Example
///
/// ```no_run
/// use contrex::{to_json, JsonFormat};
///
/// let json = to_json("lease.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("lease.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let document = parse_file(path)?;
    render::to_json(&document, format)
}

/// Parse many contract PDFs in parallel.
///
/// Files are independent, so parallelism is per file. Each entry in the
/// result pairs the input path with its outcome; one bad file does not
/// fail the batch.
pub fn parse_files<P: AsRef<Path> + Sync>(paths: &[P]) -> Vec<(PathBuf, Result<Document>)> {
    paths
        .par_iter()
        .map(|path| (path.as_ref().to_path_buf(), parse_file(path)))
        .collect()
}

/// Builder for parsing and serializing contract documents.
///
/// # Example
///
/// ```no_run
/// use contrex::{Contrex, JsonFormat};
///
/// let json = Contrex::new()
///     .with_heading_size_delta(2.0)
///     .parse("lease.pdf")?
///     .to_json(JsonFormat::Pretty)?;
/// # Ok::<(), contrex::Error>(())
/// ```
pub struct Contrex {
    options: SegmentOptions,
}

impl Contrex {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: SegmentOptions::default(),
        }
    }

    /// Set the minimum font size difference for heading detection.
    pub fn with_heading_size_delta(mut self, delta: f32) -> Self {
        self.options = self.options.with_heading_size_delta(delta);
        self
    }

    /// Set the fraction of the first page searched for the title.
    pub fn with_title_region_fraction(mut self, fraction: f32) -> Self {
        self.options = self.options.with_title_region_fraction(fraction);
        self
    }

    /// Set the footer height in points.
    pub fn with_footer_height(mut self, height: f32) -> Self {
        self.options = self.options.with_footer_height(height);
        self
    }

    /// Set the table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.options = self.options.with_table_config(config);
        self
    }

    /// Replace all segmentation options at once.
    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a contract PDF file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ContrexResult> {
        let document = parse_file_with_options(path, self.options)?;
        Ok(ContrexResult { document })
    }

    /// Parse a contract PDF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<ContrexResult> {
        let document = parse_bytes_with_options(data, self.options)?;
        Ok(ContrexResult { document })
    }
}

impl Default for Contrex {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a contract document.
pub struct ContrexResult {
    /// The parsed document
    pub document: Document,
}

impl ContrexResult {
    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document's plain text.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
