//! Positioned text runs and line grouping.
//!
//! The extractor yields `TextRun`s with position and font information; this
//! module groups them into baseline lines in reading order and collects the
//! font-size statistics the segmenter uses for heading detection.

use std::collections::HashMap;

/// A text run with position and style information, as decoded from a page
/// content stream.
#[derive(Debug, Clone)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF coordinates: origin bottom-left)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextRun {
    /// Create a new text run. Width is estimated from the glyph count when
    /// the content stream gives no better figure.
    pub fn new(text: String, page: u32, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            page,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }
}

/// A text line composed of runs on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The runs in this line, sorted by X position
    pub runs: Vec<TextRun>,
    /// Page number (1-indexed)
    pub page: u32,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line (weighted by text length)
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from runs on the same baseline.
    pub fn from_runs(mut runs: Vec<TextRun>) -> Self {
        if runs.is_empty() {
            return Self {
                runs: vec![],
                page: 0,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        runs.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let total_chars: usize = runs.iter().map(|r| r.text.len()).sum();
        let weighted_size: f32 = runs.iter().map(|r| r.font_size * r.text.len() as f32).sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            runs[0].font_size
        };

        let page = runs[0].page;
        let y = runs[0].y;
        let x = runs[0].x;

        Self {
            runs,
            page,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all runs, inserting spaces where the X gap between
    /// adjacent runs exceeds a fraction of the average glyph width.
    pub fn text(&self) -> String {
        if self.runs.is_empty() {
            return String::new();
        }
        if self.runs.len() == 1 {
            return self.runs[0].text.clone();
        }

        let mut result = String::new();
        for (i, run) in self.runs.iter().enumerate() {
            if i == 0 {
                result.push_str(&run.text);
                continue;
            }

            let prev = &self.runs[i - 1];
            let gap = run.x - (prev.x + prev.width);

            let char_count = run.text.chars().count();
            let avg_char_width = if char_count > 0 && run.width > 0.0 {
                run.width / char_count as f32
            } else {
                run.font_size * 0.5
            };

            let needs_space = gap > avg_char_width * 0.2
                && !result.ends_with(' ')
                && !run.text.starts_with(' ');
            if needs_space {
                result.push(' ');
            }
            result.push_str(&run.text);
        }
        result
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .runs
            .iter()
            .filter(|r| r.is_bold)
            .map(|r| r.text.len())
            .sum();
        let total_chars: usize = self.runs.iter().map(|r| r.text.len()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }

    /// Check if every letter in the line is uppercase.
    pub fn is_uppercase(&self) -> bool {
        let text = self.text();
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
    }
}

/// Group runs from one page into baseline lines, top to bottom then left to
/// right. Y tolerance scales with font size so superscripts stay attached.
pub fn group_runs_into_lines(runs: Vec<TextRun>) -> Vec<TextLine> {
    if runs.is_empty() {
        return vec![];
    }

    let mut runs = runs;
    // PDF Y grows upward, so descending Y is top-to-bottom.
    runs.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut current_y: Option<f32> = None;

    for run in runs {
        let y_tolerance = run.font_size * 0.3;

        match current_y {
            Some(y) if (run.y - y).abs() <= y_tolerance => {
                current.push(run);
            }
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_runs(std::mem::take(&mut current)));
                }
                current_y = Some(run.y);
                current.push(run);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_runs(current));
    }

    lines
}

/// Font size statistics over a document, used for heading detection.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (the most common size)
    pub body_size: f32,
    /// All observed font sizes with frequency, keyed at 0.1pt precision
    size_histogram: HashMap<i32, usize>,
}

impl FontStatistics {
    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        let key = (size * 10.0) as i32;
        *self.size_histogram.entry(key).or_insert(0) += 1;
    }

    /// Calculate the body size from the histogram mode.
    pub fn analyze(&mut self) {
        if self.size_histogram.is_empty() {
            self.body_size = 12.0;
            return;
        }

        let (body_key, _) = self
            .size_histogram
            .iter()
            .max_by_key(|(_, count)| *count)
            .expect("non-empty histogram");
        self.body_size = *body_key as f32 / 10.0;
    }

    /// Whether a font size is large enough over body text to read as a
    /// heading. `delta` is the minimum size difference in points.
    pub fn is_heading_size(&self, font_size: f32, delta: f32) -> bool {
        font_size >= self.body_size + delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32, size: f32) -> TextRun {
        TextRun::new(text.to_string(), 1, x, y, size, "Helvetica".to_string())
    }

    #[test]
    fn test_line_grouping_reading_order() {
        let runs = vec![
            run("world", 120.0, 700.0, 12.0),
            run("second line", 72.0, 680.0, 12.0),
            run("hello", 72.0, 700.0, 12.0),
        ];
        let lines = group_runs_into_lines(runs);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "hello world");
        assert_eq!(lines[1].text(), "second line");
    }

    #[test]
    fn test_line_y_tolerance() {
        // Slight baseline wobble stays in one line
        let runs = vec![run("a", 72.0, 700.0, 12.0), run("b", 90.0, 702.0, 12.0)];
        let lines = group_runs_into_lines(runs);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_bold_detection() {
        let bold = TextRun::new("HEADING".into(), 1, 72.0, 700.0, 14.0, "Times-Bold".into());
        assert!(bold.is_bold);
        let line = TextLine::from_runs(vec![bold]);
        assert!(line.is_bold());
        assert!(line.is_uppercase());
    }

    #[test]
    fn test_font_statistics_body_size() {
        let mut stats = FontStatistics::default();
        for _ in 0..20 {
            stats.add_size(11.0);
        }
        for _ in 0..3 {
            stats.add_size(16.0);
        }
        stats.analyze();
        assert!((stats.body_size - 11.0).abs() < 0.01);
        assert!(stats.is_heading_size(16.0, 1.5));
        assert!(!stats.is_heading_size(11.5, 1.5));
    }

    #[test]
    fn test_empty_histogram_defaults() {
        let mut stats = FontStatistics::default();
        stats.analyze();
        assert_eq!(stats.body_size, 12.0);
    }
}
