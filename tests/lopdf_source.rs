mod common;

use common::RecordingSerializer;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdf_docx::{Block, CancellationToken, ConversionConfig, Converter, LopdfDecoder, NoProgress};

/// A two-page PDF whose second page moves to a new line with T*.
fn sample_pdf() -> Vec<u8> {
    let first = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("Tj", vec![Object::string_literal("world")]),
            Operation::new("ET", vec![]),
        ],
    };
    let second = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal("Line one")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("line two")]),
            Operation::new("ET", vec![]),
        ],
    };
    build_pdf(vec![first, second])
}

fn build_pdf(contents: Vec<Content>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn converts_generated_pdf() {
    let mut converter = Converter::native(ConversionConfig::default());

    let output = converter
        .convert_text(&sample_pdf(), &mut NoProgress, &CancellationToken::new())
        .unwrap();

    assert_eq!(output.page_count, 2);
    let xml = common::document_xml(&output.document);
    assert!(xml.contains("Hello world"));
    assert!(xml.contains("Line one line two"));
    assert_eq!(xml.matches("<w:sectPr>").count(), 2);
}

#[test]
fn large_vertical_gap_separates_paragraphs() {
    let page = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("First paragraph line one")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("line two.")]),
            Operation::new("Td", vec![0.into(), (-60).into()]),
            Operation::new("Tj", vec![Object::string_literal("Second paragraph after a big gap.")]),
            Operation::new("ET", vec![]),
        ],
    };
    let serializer = RecordingSerializer::default();
    let mut converter = Converter::new(ConversionConfig::default(), LopdfDecoder, serializer.clone());

    converter
        .convert_text(&build_pdf(vec![page]), &mut NoProgress, &CancellationToken::new())
        .unwrap();

    let blocks = serializer.blocks.borrow();
    assert_eq!(
        blocks[1..],
        [
            Block::paragraph("First paragraph line one line two."),
            Block::paragraph("Second paragraph after a big gap."),
        ]
    );
}

#[test]
fn scaled_text_matrix_breaks_lines() {
    let page = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 1.into()]),
            Operation::new("Tm", vec![10.into(), 0.into(), 0.into(), 10.into(), 72.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal("Line one")]),
            Operation::new("Td", vec![0.into(), (-3).into()]),
            Operation::new("Tj", vec![Object::string_literal("After a gap")]),
            Operation::new("ET", vec![]),
        ],
    };
    let serializer = RecordingSerializer::default();
    let mut converter = Converter::new(ConversionConfig::default(), LopdfDecoder, serializer.clone());

    converter
        .convert_text(&build_pdf(vec![page]), &mut NoProgress, &CancellationToken::new())
        .unwrap();

    let blocks = serializer.blocks.borrow();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2], Block::paragraph("After a gap"));
}
