//! Text normalization.
//!
//! Cleans raw extracted text before segmentation: Unicode NFC, typographic
//! punctuation mapped to ASCII, ligatures expanded, whitespace runs collapsed.
//! Line breaks are preserved; normalization happens per line. The whole pass
//! is idempotent.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Typographic character replacements applied before whitespace collapsing.
const CHAR_MAP: &[(char, &str)] = &[
    ('\u{201C}', "\""), // left double quote
    ('\u{201D}', "\""), // right double quote
    ('\u{201E}', "\""), // low double quote
    ('\u{2018}', "'"),  // left single quote
    ('\u{2019}', "'"),  // right single quote
    ('\u{2013}', "-"),  // en dash
    ('\u{2014}', "-"),  // em dash
    ('\u{2026}', "..."),
    ('\u{00A0}', " "), // no-break space
    ('\u{2022}', "-"), // bullet
];

/// Ligature expansions commonly produced by embedded fonts.
const LIGATURE_MAP: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Text normalizer with precompiled patterns.
pub struct Normalizer {
    whitespace_re: Regex,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self {
            whitespace_re: Regex::new(r"[ \t\r\f\v]+").unwrap(),
        }
    }

    /// Normalize a single line or run of text.
    ///
    /// Collapses internal whitespace to single spaces and trims the ends.
    pub fn normalize(&self, text: &str) -> String {
        let mut result: String = text.nfc().collect();

        for (from, to) in CHAR_MAP {
            if result.contains(*from) {
                result = result.replace(*from, to);
            }
        }
        for (ligature, replacement) in LIGATURE_MAP {
            if result.contains(ligature) {
                result = result.replace(ligature, replacement);
            }
        }

        // Drop the replacement character lopdf emits for undecodable glyphs.
        if result.contains('\u{FFFD}') {
            result = result.replace('\u{FFFD}', "");
        }

        let collapsed = self.whitespace_re.replace_all(&result, " ");
        collapsed.trim().to_string()
    }

    /// Normalize multi-line text, preserving line breaks.
    pub fn normalize_lines(&self, text: &str) -> String {
        text.lines()
            .map(|line| self.normalize(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a run of text with default settings.
pub fn normalize(text: &str) -> String {
    Normalizer::new().normalize(text)
}
