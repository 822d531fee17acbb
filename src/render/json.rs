//! JSON rendering for contract documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(document: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(document),
        JsonFormat::Compact => serde_json::to_string(document),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clause, Section, Table, TableRow};
    use chrono::NaiveDate;

    fn sample() -> Document {
        let mut document = Document::new();
        document.title = Some("Lease Agreement".to_string());
        document.contract_type = Some("Lease Agreement".to_string());
        document.effective_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let mut section = Section::new(Some("1".to_string()), "Premises");
        section.push_clause(Clause::new(None, "The landlord leases the premises."));
        document.add_section(section);
        document
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Lease Agreement"));
        assert!(json.contains("\"effective_date\": \"2024-01-01\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_item_type_tags() {
        let mut document = sample();
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Item", "Cost"]));
        document.sections[0].push_table(table);

        let json = to_json(&document, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"type\":\"clause\""));
        assert!(json.contains("\"type\":\"table\""));
    }

    #[test]
    fn test_round_trip() {
        let document = sample();
        let json = to_json(&document, JsonFormat::Compact).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(to_json(&parsed, JsonFormat::Compact).unwrap(), json);
    }
}
