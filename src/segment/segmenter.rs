//! Document segmentation.
//!
//! Turns raw positioned text runs into a structured [`Document`]: title and
//! contract type from the first page, effective date from the first date-like
//! match, and a section/clause/table breakdown in reading order.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::extract::{group_runs_into_lines, FontStatistics, RawDocument, TextLine, TextRun};
use crate::model::{Clause, Document, Section};
use crate::normalize::Normalizer;

use super::classify::{classify, LineClass, LineContext};
use super::options::SegmentOptions;
use super::tables::{DetectedTable, TableDetector};

/// Contract type inferred from title keywords. Checked in order, first
/// match wins.
const CONTRACT_TYPES: &[(&str, &str)] = &[
    ("OPEN SOURCE", "Open Source Agreement"),
    ("LICENSE", "License Agreement"),
    ("NON-DISCLOSURE", "Non-Disclosure Agreement"),
    ("SERVICE", "Service Agreement"),
    ("EMPLOYMENT", "Employment Contract"),
    ("SALES", "Sales Agreement"),
    ("LEASE", "Lease Agreement"),
    ("CONSULTING", "Consulting Agreement"),
    ("CONSTRUCTION", "Construction Contract"),
];

/// Fallback contract type when no keyword matches.
const DEFAULT_CONTRACT_TYPE: &str = "General Agreement";

/// One item on a page in reading order: a text line or a detected table.
enum PageItem {
    Line(TextLine),
    Table(DetectedTable),
}

impl PageItem {
    fn top_y(&self) -> f32 {
        match self {
            PageItem::Line(line) => line.y,
            PageItem::Table(table) => table.top_y,
        }
    }
}

/// Segments raw extracted text into a structured document.
pub struct Segmenter {
    options: SegmentOptions,
    normalizer: Normalizer,
}

impl Segmenter {
    /// Create a segmenter with default options.
    pub fn new() -> Self {
        Self::with_options(SegmentOptions::default())
    }

    /// Create a segmenter with custom options.
    pub fn with_options(options: SegmentOptions) -> Self {
        Self {
            options,
            normalizer: Normalizer::new(),
        }
    }

    /// Segment a raw document into a structured one.
    pub fn segment(&self, raw: &RawDocument) -> Document {
        let mut document = Document::new();

        let stats = self.font_statistics(raw);
        let mut state = SegmentState::new();
        let mut first_page_text = String::new();

        for page in &raw.pages {
            // Footer runs are kept out of the body and deduplicated into
            // the preamble (page numbers, recurring legal footers).
            let (content_runs, footer_runs): (Vec<TextRun>, Vec<TextRun>) = page
                .runs
                .iter()
                .cloned()
                .partition(|run| run.y > self.options.footer_height);

            let footer = self.footer_text(footer_runs);
            if !footer.is_empty() && state.footer_seen.insert(footer.clone()) {
                state.footer_parts.push(footer.clone());
            }

            let detector = TableDetector::new(&self.options.table);
            let (tables, leftover) = detector.detect(content_runs);

            let on_first_page = page.number == 1;

            let mut items: Vec<PageItem> = group_runs_into_lines(leftover)
                .into_iter()
                .map(PageItem::Line)
                .collect();
            items.extend(tables.into_iter().map(PageItem::Table));
            items.sort_by(|a, b| {
                b.top_y()
                    .partial_cmp(&a.top_y())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let title_floor = page.height * (1.0 - self.options.title_region_fraction);

            for item in items {
                match item {
                    PageItem::Table(table) => {
                        state.push_table(table.table);
                    }
                    PageItem::Line(line) => {
                        let text = self.normalizer.normalize(&line.text());
                        if text.is_empty() {
                            continue;
                        }
                        if on_first_page {
                            if !first_page_text.is_empty() {
                                first_page_text.push(' ');
                            }
                            first_page_text.push_str(&text);
                        }

                        let ctx = LineContext {
                            options: &self.options,
                            stats: &stats,
                            on_first_page,
                            in_title_region: on_first_page && line.y >= title_floor,
                            is_table_row: false,
                        };

                        self.handle_line(&line, &text, &ctx, &mut state);
                    }
                }
            }

            // The footer is part of the first page's text for the date search
            if on_first_page && !footer.is_empty() {
                if !first_page_text.is_empty() {
                    first_page_text.push(' ');
                }
                first_page_text.push_str(&footer);
            }
        }

        state.flush_section();

        document.title = state.title.take().or_else(|| {
            raw.info_title
                .as_deref()
                .map(|t| self.normalizer.normalize(t))
                .filter(|t| !t.is_empty())
        });
        document.contract_type = Some(contract_type_for(document.title.as_deref()).to_string());
        document.effective_date = self.extract_effective_date(&first_page_text);

        state.finish(&mut document);
        document
    }

    /// Route a classified line into the running state machine.
    fn handle_line(
        &self,
        line: &TextLine,
        text: &str,
        ctx: &LineContext,
        state: &mut SegmentState,
    ) {
        match classify(line, text, ctx) {
            LineClass::Title if state.title.is_none() => {
                state.title = Some(text.to_string());
            }
            LineClass::Heading => {
                state.flush_section();
                state.current = Some(self.section_from_heading(text));
            }
            // The date is picked up from the full first-page text in a
            // separate pass, so a date line still flows into the body.
            LineClass::Title | LineClass::Date | LineClass::Body => {
                self.handle_body(text, state);
            }
            LineClass::TableRow => {}
        }
    }

    /// Body text: labeled clause starts, continuation, or preamble.
    fn handle_body(&self, text: &str, state: &mut SegmentState) {
        if let Some(section) = state.current.as_mut() {
            if let Some(caps) = self.options.clause_re.captures(text) {
                let label = caps.get(1).map(|m| m.as_str().to_string());
                let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                section.push_clause(Clause::new(label, body));
                return;
            }
            // A table between clauses starts a fresh clause rather than
            // merging text across it.
            match section.last_clause_mut() {
                Some(clause) => clause.append_text(text),
                None => section.push_clause(Clause::new(None, text)),
            }
        } else {
            state.pre_section_lines.push(text.to_string());
        }
    }

    /// Build a section from a heading line, splitting off the section
    /// number when the heading matches a numbered or divider pattern.
    fn section_from_heading(&self, text: &str) -> Section {
        if let Some(caps) = self.options.section_re.captures(text) {
            let number = caps.get(1).map(|m| m.as_str().trim_end_matches('.').to_string());
            let heading = caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string();
            return Section::new(number, heading);
        }
        if let Some(caps) = self.options.divider_re.captures(text) {
            let heading = caps.get(1).map(|m| m.as_str()).unwrap_or("").to_string();
            return Section::new(None, heading);
        }
        Section::new(None, text)
    }

    /// First date-like match in the first page's text, parsed with the
    /// formats the date pattern admits.
    fn extract_effective_date(&self, first_page_text: &str) -> Option<NaiveDate> {
        let matched = self.options.date_re.find(first_page_text)?;
        parse_date(matched.as_str())
    }

    fn footer_text(&self, runs: Vec<TextRun>) -> String {
        let text = group_runs_into_lines(runs)
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join(" ");
        self.normalizer.normalize(&text)
    }

    fn font_statistics(&self, raw: &RawDocument) -> FontStatistics {
        let mut stats = FontStatistics::default();
        for page in &raw.pages {
            for run in &page.runs {
                stats.add_size(run.font_size);
            }
        }
        stats.analyze();
        stats
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state threaded through the page walk.
struct SegmentState {
    title: Option<String>,
    current: Option<Section>,
    sections: Vec<Section>,
    pre_section_lines: Vec<String>,
    footer_parts: Vec<String>,
    footer_seen: HashSet<String>,
}

impl SegmentState {
    fn new() -> Self {
        Self {
            title: None,
            current: None,
            sections: Vec::new(),
            pre_section_lines: Vec::new(),
            footer_parts: Vec::new(),
            footer_seen: HashSet::new(),
        }
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.current.take() {
            self.sections.push(section);
        }
    }

    /// Tables need a home even before the first heading.
    fn push_table(&mut self, table: crate::model::Table) {
        let section = self.current.get_or_insert_with(Section::implicit);
        section.push_table(table);
    }

    /// Move the accumulated results into the document. Body text seen
    /// before the first heading becomes the preamble, unless no heading
    /// was found anywhere, in which case it becomes a single untitled
    /// section so the content is not lost to metadata.
    fn finish(mut self, document: &mut Document) {
        if self.sections.is_empty() && !self.pre_section_lines.is_empty() {
            let mut section = Section::implicit();
            for line in self.pre_section_lines.drain(..) {
                section.push_clause(Clause::new(None, line));
            }
            self.sections.push(section);
        }

        let mut preamble_parts = self.pre_section_lines;
        preamble_parts.extend(self.footer_parts);
        document.preamble = preamble_parts.join(" ");
        document.sections = self.sections;
    }
}

/// Map title keywords to a contract type.
fn contract_type_for(title: Option<&str>) -> &'static str {
    let title = match title {
        Some(t) => t.to_uppercase(),
        None => return DEFAULT_CONTRACT_TYPE,
    };
    CONTRACT_TYPES
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, contract_type)| *contract_type)
        .unwrap_or(DEFAULT_CONTRACT_TYPE)
}

/// Parse a matched date string, trying each admitted format in turn.
fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%Y.%m.%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
