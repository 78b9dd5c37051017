//! Small PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text placed on a page.
pub struct Text {
    pub bold: bool,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: &'static str,
}

pub fn text(bold: bool, size: f32, x: f32, y: f32, text: &'static str) -> Text {
    Text {
        bold,
        size,
        x,
        y,
        text,
    }
}

pub const BODY: &str = "lorem ipsum dolor sit amet consectetur adipiscing elit";

/// Body lines at 11 pt, stepping down the page from `y`.
pub fn body_lines(count: usize, y: f32) -> Vec<Text> {
    (0..count)
        .map(|i| text(false, 11.0, 72.0, y - 14.0 * i as f32, BODY))
        .collect()
}

/// Build a Letter-sized PDF with one content stream per page.
///
/// `F1` is Helvetica and `F2` is Helvetica-Bold.
pub fn build_pdf(pages: &[Vec<Text>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut operations = Vec::new();
        for line in page {
            let font = if line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
            operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A two-page report with a title, numbered headings and body text.
pub fn report_pdf() -> Vec<u8> {
    let mut first = vec![
        text(true, 24.0, 72.0, 740.0, "Annual Design Report"),
        text(true, 18.0, 72.0, 680.0, "1 Introduction"),
    ];
    first.extend(body_lines(6, 650.0));

    let mut second = vec![text(true, 18.0, 72.0, 740.0, "2 Results")];
    second.extend(body_lines(6, 710.0));

    build_pdf(&[first, second])
}
