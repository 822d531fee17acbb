//! Document-level types.

use super::{Section, SectionItem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A parsed contract document.
///
/// Built once per input file and never mutated after serialization. Field
/// order here is the key order of the JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document title, usually the first line of the first page
    pub title: Option<String>,

    /// Contract type inferred from the title (e.g. "Lease Agreement")
    pub contract_type: Option<String>,

    /// Effective date found near the top of the document
    pub effective_date: Option<NaiveDate>,

    /// Text preceding the first recognized section, plus page footers
    pub preamble: String,

    /// Sections in reading order
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            title: None,
            contract_type: None,
            effective_date: None,
            preamble: String::new(),
            sections: Vec::new(),
        }
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Check if the document has any sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.preamble.is_empty()
    }

    /// Total number of clauses across all sections.
    pub fn clause_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|item| matches!(item, SectionItem::Clause(_)))
            .count()
    }

    /// Total number of tables across all sections.
    pub fn table_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|item| matches!(item, SectionItem::Table(_)))
            .count()
    }

    /// Plain text of the whole body: section headings and clause text in
    /// reading order. Table cells are joined with tabs.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.preamble.is_empty() {
            parts.push(self.preamble.clone());
        }
        for section in &self.sections {
            parts.push(section.plain_text());
        }
        parts.join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clause, Table, TableRow};

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
    }

    #[test]
    fn test_counts() {
        let mut doc = Document::new();
        let mut section = Section::new(Some("1.".into()), "Definitions");
        section.push_clause(Clause::new(None, "Terms used herein."));
        section.push_clause(Clause::new(Some("a.".into()), "More terms."));

        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Fee", "Amount"]));
        section.push_table(table);

        doc.add_section(section);

        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.clause_count(), 2);
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn test_plain_text_order() {
        let mut doc = Document::new();
        doc.preamble = "This agreement is made".to_string();

        let mut first = Section::new(Some("1.".into()), "Scope");
        first.push_clause(Clause::new(None, "The scope is broad."));
        doc.add_section(first);

        let mut second = Section::new(Some("2.".into()), "Term");
        second.push_clause(Clause::new(None, "One year."));
        doc.add_section(second);

        let text = doc.plain_text();
        let scope = text.find("Scope").unwrap();
        let term = text.find("Term").unwrap();
        assert!(text.starts_with("This agreement is made"));
        assert!(scope < term);
    }
}
