//! Line classification.
//!
//! Each extracted line gets a single class that drives the segmenter's
//! state machine. Classification is pure: all page and font context comes
//! in through [`LineContext`].

use crate::extract::{FontStatistics, TextLine};

use super::options::SegmentOptions;

/// The role a line plays in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Document title (first page, top region, largest font)
    Title,
    /// A line containing a recognizable effective date
    Date,
    /// Section heading (numbered, divider, or typographic)
    Heading,
    /// Part of a detected table
    TableRow,
    /// Ordinary body text
    Body,
}

/// Page and font context for classifying one line.
pub struct LineContext<'a> {
    /// Segmentation options (regexes and thresholds)
    pub options: &'a SegmentOptions,
    /// Font statistics for the whole document
    pub stats: &'a FontStatistics,
    /// Whether the line is on the first page
    pub on_first_page: bool,
    /// Whether the line falls in the title region of the first page
    pub in_title_region: bool,
    /// Whether the line belongs to a detected table
    pub is_table_row: bool,
}

/// Classify a line given its context.
pub fn classify(line: &TextLine, text: &str, ctx: &LineContext) -> LineClass {
    if ctx.is_table_row {
        return LineClass::TableRow;
    }
    if text.is_empty() {
        return LineClass::Body;
    }

    if ctx.on_first_page && ctx.in_title_region && is_title_candidate(line, text, ctx) {
        return LineClass::Title;
    }

    if is_heading(line, text, ctx) {
        return LineClass::Heading;
    }

    if ctx.on_first_page && ctx.options.date_re.is_match(text) {
        return LineClass::Date;
    }

    LineClass::Body
}

/// Title candidate: noticeably larger than body text, short, and not a
/// numbered heading.
fn is_title_candidate(line: &TextLine, text: &str, ctx: &LineContext) -> bool {
    if text.len() > ctx.options.max_heading_len {
        return false;
    }
    if ctx.options.section_re.is_match(text) || ctx.options.clause_re.is_match(text) {
        return false;
    }
    ctx.stats
        .is_heading_size(line.font_size, ctx.options.heading_size_delta)
        || line.is_bold()
        || line.is_uppercase()
}

/// Heading: numbered section pattern, underscore divider, or typographic
/// emphasis (larger font plus bold or uppercase) on a short line without
/// sentence punctuation.
fn is_heading(line: &TextLine, text: &str, ctx: &LineContext) -> bool {
    if ctx.options.section_re.is_match(text) {
        return true;
    }
    if ctx.options.divider_re.is_match(text) {
        return true;
    }

    if text.len() > ctx.options.max_heading_len {
        return false;
    }
    if text.ends_with('.') || text.ends_with(',') || text.ends_with(';') {
        return false;
    }
    if ctx.options.clause_re.is_match(text) {
        return false;
    }

    ctx.stats
        .is_heading_size(line.font_size, ctx.options.heading_size_delta)
        && (line.is_bold() || line.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{group_runs_into_lines, TextRun};

    fn line_of(text: &str, size: f32, font: &str) -> TextLine {
        let run = TextRun::new(text.to_string(), 1, 72.0, 700.0, size, font.to_string());
        group_runs_into_lines(vec![run]).remove(0)
    }

    fn body_stats() -> FontStatistics {
        let mut stats = FontStatistics::default();
        for _ in 0..20 {
            stats.add_size(11.0);
        }
        stats.analyze();
        stats
    }

    fn ctx<'a>(
        options: &'a SegmentOptions,
        stats: &'a FontStatistics,
        first_page: bool,
        title_region: bool,
    ) -> LineContext<'a> {
        LineContext {
            options,
            stats,
            on_first_page: first_page,
            in_title_region: title_region,
            is_table_row: false,
        }
    }

    #[test]
    fn test_numbered_heading() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("1. Definitions", 11.0, "Helvetica");
        let class = classify(&line, "1. Definitions", &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Heading);
    }

    #[test]
    fn test_typographic_heading() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("Confidentiality", 14.0, "Helvetica-Bold");
        let class = classify(&line, "Confidentiality", &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Heading);
    }

    #[test]
    fn test_bold_body_size_is_not_heading() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("Important note", 11.0, "Helvetica-Bold");
        let class = classify(&line, "Important note", &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Body);
    }

    #[test]
    fn test_title_in_region() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("LEASE AGREEMENT", 18.0, "Helvetica-Bold");
        let class = classify(&line, "LEASE AGREEMENT", &ctx(&options, &stats, true, true));
        assert_eq!(class, LineClass::Title);
    }

    #[test]
    fn test_title_region_outside_first_page() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("LEASE AGREEMENT", 18.0, "Helvetica-Bold");
        // On page 2 a big bold uppercase line is a heading, not a title
        let class = classify(&line, "LEASE AGREEMENT", &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Heading);
    }

    #[test]
    fn test_date_line() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let text = "This agreement is effective as of January 15, 2024.";
        let line = line_of(text, 11.0, "Helvetica");
        let class = classify(&line, text, &ctx(&options, &stats, true, false));
        assert_eq!(class, LineClass::Date);
    }

    #[test]
    fn test_table_row_wins() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let line = line_of("1. Definitions", 11.0, "Helvetica");
        let mut context = ctx(&options, &stats, false, false);
        context.is_table_row = true;
        assert_eq!(
            classify(&line, "1. Definitions", &context),
            LineClass::TableRow
        );
    }

    #[test]
    fn test_sentence_is_body() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let text = "The tenant shall pay rent on the first of each month.";
        let line = line_of(text, 11.0, "Helvetica");
        let class = classify(&line, text, &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Body);
    }

    #[test]
    fn test_divider_heading() {
        let options = SegmentOptions::default();
        let stats = body_stats();
        let text = "____ Miscellaneous";
        let line = line_of(text, 11.0, "Helvetica");
        let class = classify(&line, text, &ctx(&options, &stats, false, false));
        assert_eq!(class, LineClass::Heading);
    }
}
