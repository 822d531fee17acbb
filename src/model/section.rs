//! Section and clause types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A contract section: a heading followed by clauses and tables in reading
/// order. Identity is positional; sections carry no ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section number as printed (e.g. "1.", "2.3", "IV"), if any
    pub number: Option<String>,

    /// Heading text (may be empty for divider-introduced sections)
    pub heading: String,

    /// Clauses and tables, interleaved in document order
    pub items: Vec<SectionItem>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(number: Option<String>, heading: impl Into<String>) -> Self {
        Self {
            number,
            heading: heading.into(),
            items: Vec::new(),
        }
    }

    /// Implicit section for content appearing before any recognized heading.
    pub fn implicit() -> Self {
        Self::new(None, "")
    }

    /// Append a clause.
    pub fn push_clause(&mut self, clause: Clause) {
        self.items.push(SectionItem::Clause(clause));
    }

    /// Append a table.
    pub fn push_table(&mut self, table: Table) {
        self.items.push(SectionItem::Table(table));
    }

    /// Check if the section has no content.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Last clause in the section, if the most recent item is a clause.
    ///
    /// Used while accumulating body lines: text never merges across an
    /// intervening table.
    pub fn last_clause_mut(&mut self) -> Option<&mut Clause> {
        match self.items.last_mut() {
            Some(SectionItem::Clause(clause)) => Some(clause),
            _ => None,
        }
    }

    /// Plain text of the section in reading order.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        let heading = match &self.number {
            Some(number) if !self.heading.is_empty() => format!("{} {}", number, self.heading),
            Some(number) => number.clone(),
            None => self.heading.clone(),
        };
        if !heading.is_empty() {
            parts.push(heading);
        }
        for item in &self.items {
            match item {
                SectionItem::Clause(clause) => parts.push(clause.plain_text()),
                SectionItem::Table(table) => parts.push(table.plain_text()),
            }
        }
        parts.join("\n")
    }
}

/// An item within a section. Serialized with a `type` tag so the JSON reads
/// as `{"type": "clause", ...}` or `{"type": "table", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionItem {
    /// A unit of contractual text
    Clause(Clause),
    /// A tabular region
    Table(Table),
}

/// A clause: a labelled or unlabelled run of body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    /// Clause label as printed (e.g. "a.", "1.2", "(b)"), if any
    pub label: Option<String>,

    /// Clause body text
    pub text: String,
}

impl Clause {
    /// Create a new clause.
    pub fn new(label: Option<String>, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    /// Append a continuation line to the clause body.
    pub fn append_text(&mut self, text: &str) {
        if !self.text.is_empty() && !text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    /// Plain text including the label.
    pub fn plain_text(&self) -> String {
        match &self.label {
            Some(label) => format!("{} {}", label, self.text),
            None => self.text.clone(),
        }
    }
}
