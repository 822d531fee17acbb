//! End-to-end pipeline tests against synthetic in-memory PDFs.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};

use contrex::{parse_bytes, parse_file, Error, JsonFormat, SectionItem};

/// One line of text with an absolute position, font, and size.
struct Line {
    text: &'static str,
    x: i64,
    y: i64,
    font: &'static str,
    size: i64,
}

fn line(text: &'static str, x: i64, y: i64, font: &'static str, size: i64) -> Line {
    Line {
        text,
        x,
        y,
        font,
        size,
    }
}

/// Build a one-page PDF with the given lines, using real font resources so
/// the content-stream interpreter sees proper font names and encodings.
fn build_pdf(lines: &[Line]) -> Vec<u8> {
    let mut doc = LopdfDocument::with_version("1.4");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut operations = Vec::new();
    for l in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![l.font.into(), l.size.into()]));
        operations.push(Operation::new("Td", vec![l.x.into(), l.y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(l.text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

fn contract_pdf() -> Vec<u8> {
    build_pdf(&[
        line("SERVICE AGREEMENT", 72, 720, "F2", 18),
        line("Effective Date: March 5, 2024", 72, 690, "F1", 11),
        line("1. Scope of Services", 72, 650, "F1", 11),
        line("The provider will deliver consulting services.", 72, 635, "F1", 11),
        line("2. Payment", 72, 605, "F1", 11),
        line("Fees are payable within thirty days.", 72, 590, "F1", 11),
    ])
}

#[test]
fn test_parse_bytes_full_contract() {
    let document = parse_bytes(&contract_pdf()).unwrap();

    assert_eq!(document.title.as_deref(), Some("SERVICE AGREEMENT"));
    assert_eq!(document.contract_type.as_deref(), Some("Service Agreement"));
    assert_eq!(
        document.effective_date,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
    );

    assert_eq!(document.section_count(), 2);
    assert_eq!(document.sections[0].number.as_deref(), Some("1"));
    assert_eq!(document.sections[0].heading, "Scope of Services");
    assert_eq!(document.sections[1].number.as_deref(), Some("2"));
    assert_eq!(document.sections[1].heading, "Payment");
    assert_eq!(document.clause_count(), 2);
    assert_eq!(document.table_count(), 0);
}

#[test]
fn test_clause_text_survives_pipeline() {
    let document = parse_bytes(&contract_pdf()).unwrap();
    match &document.sections[0].items[0] {
        SectionItem::Clause(clause) => {
            assert_eq!(clause.text, "The provider will deliver consulting services.");
        }
        other => panic!("expected clause, got {other:?}"),
    }
}

#[test]
fn test_completeness_no_body_text_lost() {
    let document = parse_bytes(&contract_pdf()).unwrap();
    let text = document.plain_text();

    // Every body line must appear somewhere in the output
    assert!(text.contains("Effective Date: March 5, 2024"));
    assert!(text.contains("The provider will deliver consulting services."));
    assert!(text.contains("Fees are payable within thirty days."));
}

#[test]
fn test_completeness_body_reproduced_exactly() {
    let document = parse_bytes(&contract_pdf()).unwrap();

    // The whole body, in order, with nothing dropped, duplicated, or
    // reordered. The title lives in metadata and is not part of the body.
    let expected = "Effective Date: March 5, 2024\n\n\
                    1 Scope of Services\n\
                    The provider will deliver consulting services.\n\n\
                    2 Payment\n\
                    Fees are payable within thirty days.";
    assert_eq!(document.plain_text(), expected);
}

#[test]
fn test_parse_file_via_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.pdf");
    std::fs::write(&path, contract_pdf()).unwrap();

    let document = parse_file(&path).unwrap();
    assert_eq!(document.title.as_deref(), Some("SERVICE AGREEMENT"));
    assert_eq!(document.section_count(), 2);
}

#[test]
fn test_json_output_schema() {
    let document = parse_bytes(&contract_pdf()).unwrap();
    let json = contrex::render::to_json(&document, JsonFormat::Pretty).unwrap();

    assert!(json.contains("\"title\": \"SERVICE AGREEMENT\""));
    assert!(json.contains("\"contract_type\": \"Service Agreement\""));
    assert!(json.contains("\"effective_date\": \"2024-03-05\""));
    assert!(json.contains("\"type\": \"clause\""));

    // Serialization is deterministic
    let again = contrex::render::to_json(&document, JsonFormat::Pretty).unwrap();
    assert_eq!(json, again);
}

#[test]
fn test_json_round_trip() {
    let document = parse_bytes(&contract_pdf()).unwrap();
    let json = contrex::render::to_json(&document, JsonFormat::Compact).unwrap();
    let parsed: contrex::Document = serde_json::from_str(&json).unwrap();
    assert_eq!(
        contrex::render::to_json(&parsed, JsonFormat::Compact).unwrap(),
        json
    );
}

#[test]
fn test_no_headings_single_section() {
    let data = build_pdf(&[
        line("This letter confirms our prior discussion.", 72, 500, "F1", 11),
        line("Both parties will act in good faith.", 72, 485, "F1", 11),
    ]);
    let document = parse_bytes(&data).unwrap();

    assert_eq!(document.section_count(), 1);
    assert!(document.sections[0].number.is_none());
    assert!(document.preamble.is_empty());
}

#[test]
fn test_unknown_title_keywords_default_type() {
    let data = build_pdf(&[
        line("MEMORANDUM OF UNDERSTANDING", 72, 720, "F2", 18),
        line("1. Purpose", 72, 650, "F1", 11),
        line("This memorandum records a shared intent.", 72, 635, "F1", 11),
    ]);
    let document = parse_bytes(&data).unwrap();

    assert_eq!(
        document.title.as_deref(),
        Some("MEMORANDUM OF UNDERSTANDING")
    );
    assert_eq!(document.contract_type.as_deref(), Some("General Agreement"));
}

#[test]
fn test_textless_pdf_is_an_error() {
    let data = build_pdf(&[]);
    let result = parse_bytes(&data);
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = parse_file("/definitely/not/here.pdf");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_garbage_bytes_rejected() {
    let result = parse_bytes(b"this is not a pdf document");
    assert!(matches!(result, Err(Error::UnknownFormat)));
}
