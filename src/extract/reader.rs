//! PDF text extraction using lopdf.
//!
//! Walks each page's content stream and interprets the text-positioning and
//! text-showing operators, yielding [`TextRun`]s in document order. Glyph and
//! encoding decoding is delegated to lopdf; when a document yields no text at
//! all (broken encodings, exotic producers), a flat-text pass with the
//! pdf-extract crate is tried before giving up.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

use super::runs::TextRun;

/// Default page size (US Letter) used when a page has no usable MediaBox.
const DEFAULT_PAGE_WIDTH: f32 = 612.0;
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Extracted text of one page.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Text runs in content-stream order
    pub runs: Vec<TextRun>,
}

/// Raw extraction result for a whole document, before normalization.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Pages in document order
    pub pages: Vec<PageText>,
    /// Title from the PDF Info dictionary, if present
    pub info_title: Option<String>,
}

impl RawDocument {
    /// Total number of text runs across all pages.
    pub fn run_count(&self) -> usize {
        self.pages.iter().map(|p| p.runs.len()).sum()
    }
}

/// PDF reader producing positioned text runs.
pub struct PdfReader {
    doc: LopdfDocument,
    /// Original bytes, kept for the pdf-extract fallback pass
    raw: Vec<u8>,
}

impl PdfReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read(path)?;
        Self::from_bytes(raw)
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
        detect_format_from_bytes(&raw)?;

        let doc = LopdfDocument::load_mem(&raw).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self { doc, raw })
    }

    /// Extract all pages as positioned text runs.
    ///
    /// Falls back to flat-text extraction when the content streams yield
    /// nothing; returns `Error::NoExtractableText` if both passes come up
    /// empty (e.g. a scanned, image-only document).
    pub fn extract(&self) -> Result<RawDocument> {
        let page_ids = self.doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        for (page_num, page_id) in page_ids.iter() {
            let (width, height) = self.page_dimensions(*page_id);
            let runs = match self.extract_page_runs(*page_num, *page_id) {
                Ok(runs) => runs,
                Err(e) => {
                    log::warn!("failed to extract text from page {}: {}", page_num, e);
                    Vec::new()
                }
            };
            pages.push(PageText {
                number: *page_num,
                width,
                height,
                runs,
            });
        }

        let mut raw_doc = RawDocument {
            pages,
            info_title: self.info_title(),
        };

        if raw_doc.run_count() == 0 {
            log::warn!("content streams yielded no text, trying flat-text fallback");
            raw_doc.pages = self.extract_flat_text()?;
            if raw_doc.run_count() == 0 {
                return Err(Error::NoExtractableText);
            }
        }

        Ok(raw_doc)
    }

    /// Title from the document Info dictionary.
    fn info_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let dict = self.doc.get_dictionary(info_ref).ok()?;
        let title = dict.get(b"Title").ok()?.as_str().ok()?;
        let title = decode_text_simple(title);
        let title = title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    /// Page dimensions from the MediaBox, with Letter-size fallback.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(DEFAULT_PAGE_WIDTH);
                        let height = array[3].as_float().unwrap_or(DEFAULT_PAGE_HEIGHT);
                        return (width, height);
                    }
                }
            }
        }
        (DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT)
    }

    /// Extract positioned runs from one page.
    fn extract_page_runs(&self, page_num: u32, page_id: ObjectId) -> Result<Vec<TextRun>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // Resource name -> base font name, for bold detection
        let mut font_names = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            font_names.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        self.interpret_content(page_num, &content, &font_names, &lopdf_fonts)
    }

    /// Concatenated, decompressed content stream for a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Interpret the text operators of a content stream.
    fn interpret_content(
        &self,
        page_num: u32,
        content: &[u8],
        font_names: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextRun>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut runs = Vec::new();
        let mut current_font = String::new();
        let mut current_font_key: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_key = font_name.clone();
                            current_font = font_names
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(font_name.as_slice()).to_string()
                                });
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.leading = -ty;
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text_block {
                        continue;
                    }
                    let encoding = lopdf_fonts
                        .get(&current_font_key)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());

                    let text = if op.operator == "TJ" {
                        decode_tj_array(op.operands.first(), &encoding)
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_string(bytes, &encoding)
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        let effective_size = current_font_size * matrix.scale();
                        runs.push(TextRun::new(
                            text,
                            page_num,
                            x,
                            y,
                            effective_size,
                            current_font.clone(),
                        ));
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = lopdf_fonts
                            .get(&current_font_key)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                        let text = decode_string(bytes, &encoding);

                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            let effective_size = current_font_size * matrix.scale();
                            runs.push(TextRun::new(
                                text,
                                page_num,
                                x,
                                y,
                                effective_size,
                                current_font.clone(),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(runs)
    }

    /// Flat-text fallback via pdf-extract: one synthetic page, runs laid out
    /// one per line with descending Y so downstream line grouping still works.
    fn extract_flat_text(&self) -> Result<Vec<PageText>> {
        let text = pdf_extract::extract_text_from_mem(&self.raw)?;
        let mut runs = Vec::new();
        let mut y = DEFAULT_PAGE_HEIGHT - 72.0;

        for line in text.lines() {
            if !line.trim().is_empty() {
                runs.push(TextRun::new(
                    line.trim().to_string(),
                    1,
                    72.0,
                    y,
                    12.0,
                    "Unknown".to_string(),
                ));
            }
            y -= 14.0;
        }

        Ok(vec![PageText {
            number: 1,
            width: DEFAULT_PAGE_WIDTH,
            height: (DEFAULT_PAGE_HEIGHT).max(72.0 + 14.0 * runs.len() as f32),
            runs,
        }])
    }
}

/// Text matrix tracking for position decoding.
///
/// This is a simplification of the full PDF text state: it tracks the line
/// matrix origin and leading well enough to recover baseline positions and
/// the effective font scale.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    line_x: f32,
    line_y: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            line_x: 0.0,
            line_y: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.line_x = e;
        self.line_y = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_x += tx * self.a + ty * self.c;
        self.line_y += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.line_x, self.line_y)
    }

    fn scale(&self) -> f32 {
        let s = (self.b * self.b + self.d * self.d).sqrt();
        if s > 0.0 {
            s
        } else {
            1.0
        }
    }
}

/// Decode a TJ operand array: strings interleaved with kerning adjustments.
/// Large negative adjustments (in 1/1000 text-space units) read as word gaps.
fn decode_tj_array(
    operand: Option<&Object>,
    encoding: &Option<lopdf::Encoding<'_>>,
) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    let space_threshold = 200.0;
    let mut combined = String::new();

    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_string(bytes, encoding));
            }
            Object::Integer(n) => {
                if -(*n as f32) > space_threshold && !combined.is_empty() && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > space_threshold && !combined.is_empty() && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }

    combined
}

/// Decode a PDF string with the font encoding when available.
fn decode_string(bytes: &[u8], encoding: &Option<lopdf::Encoding<'_>>) -> String {
    match encoding {
        Some(enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
        None => decode_text_simple(bytes),
    }
}

/// Best-effort decoding without font encoding: UTF-16BE when the BOM is
/// present, Latin-1 otherwise.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Extract a numeric operand.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(n) => Some(*n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matrix_translate() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 700.0);
        assert_eq!(m.position(), (72.0, 700.0));
        m.translate(0.0, -14.0);
        assert_eq!(m.position(), (72.0, 686.0));
    }

    #[test]
    fn test_text_matrix_next_line_uses_leading() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 100.0, 500.0);
        m.leading = 16.0;
        m.next_line();
        assert_eq!(m.position(), (100.0, 484.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert!((m.scale() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        assert_eq!(decode_text_simple(b"Agreement"), "Agreement");
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_text_simple(&bytes), "AB");
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = PdfReader::from_bytes(b"not a pdf at all".to_vec());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_from_bytes_rejects_truncated_pdf() {
        let result = PdfReader::from_bytes(b"%PDF-1.4\ngarbage".to_vec());
        assert!(result.is_err());
    }
}
