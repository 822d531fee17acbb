//! Segmentation options.
//!
//! All heuristic knobs live here and are passed into the segmenter
//! explicitly; there is no module-level state. Defaults are calibrated for
//! typical single-column contract documents and are all tunable.

use regex::Regex;

use super::tables::TableDetectorConfig;

/// Options controlling segmentation heuristics.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Section heading pattern: roman numerals or dotted decimal numbering
    /// followed by a title ("1. Definitions", "IV Term").
    pub section_re: Regex,

    /// Clause label pattern: "a.", "1.2", "(b)".
    pub clause_re: Regex,

    /// Divider pattern: a run of underscores optionally followed by a title.
    pub divider_re: Regex,

    /// Date pattern: "January 1, 2024", "Jan 1, 2024", "2024-01-01",
    /// "2024.01.01".
    pub date_re: Regex,

    /// Minimum font-size difference over body text for a line to read as a
    /// heading (points).
    pub heading_size_delta: f32,

    /// Fraction of the first page's height, from the top, searched for the
    /// title line.
    pub title_region_fraction: f32,

    /// Height of the footer band at the bottom of each page (points). Footer
    /// text is diverted to the document preamble.
    pub footer_height: f32,

    /// Maximum length for a font-based heading line (characters). Longer
    /// lines are body text regardless of styling.
    pub max_heading_len: usize,

    /// Table detection configuration.
    pub table: TableDetectorConfig,
}

impl SegmentOptions {
    /// Create options with default patterns and thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading font-size delta.
    pub fn with_heading_size_delta(mut self, delta: f32) -> Self {
        self.heading_size_delta = delta;
        self
    }

    /// Set the title region fraction of the first page.
    pub fn with_title_region_fraction(mut self, fraction: f32) -> Self {
        self.title_region_fraction = fraction;
        self
    }

    /// Set the footer band height.
    pub fn with_footer_height(mut self, height: f32) -> Self {
        self.footer_height = height;
        self
    }

    /// Set the section heading pattern.
    pub fn with_section_pattern(mut self, pattern: Regex) -> Self {
        self.section_re = pattern;
        self
    }

    /// Set the date pattern.
    pub fn with_date_pattern(mut self, pattern: Regex) -> Self {
        self.date_re = pattern;
        self
    }

    /// Set the table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table = config;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            // Roman numerals need two letters or a trailing period so prose
            // starting with "I" does not read as a heading.
            section_re: Regex::new(r"^\s*([IVXLCDM]{2,}\.?|[IVXLCDM]\.|\d+(?:\.\d+)*\.?)\s+(.+)$")
                .unwrap(),
            clause_re: Regex::new(r"^\s*([a-zA-Z]\.|\d+\.\d+\.?|\(\w+\))\s*(.*)$")
                .unwrap(),
            divider_re: Regex::new(r"^\s*_{2,}\s*(.*)$").unwrap(),
            date_re: Regex::new(
                r"(?i)\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+\d{1,2},\s+\d{4}\b|\b\d{4}-\d{2}-\d{2}\b|\b\d{4}\.\d{2}\.\d{2}\b",
            )
            .unwrap(),
            heading_size_delta: 1.5,
            title_region_fraction: 0.25,
            footer_height: 100.0,
            max_heading_len: 100,
            table: TableDetectorConfig::default(),
        }
    }
}
