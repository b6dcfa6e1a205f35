//! Shared fixtures for integration tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A positioned text run: (text, x, y).
pub type PageText<'a> = Vec<(&'a str, f32, f32)>;

/// Build an in-memory PDF with one entry per page, each placing text runs
/// at fixed positions in Helvetica 12.
pub fn make_pdf(pages: &[PageText<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_texts in pages {
        let mut operations = Vec::new();
        for (text, x, y) in page_texts {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Build a PDF where the given 0-based page has a dangling content stream
/// reference, so span extraction fails on that page only.
pub fn make_pdf_with_broken_page(pages: &[PageText<'_>], broken_page: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (page_index, page_texts) in pages.iter().enumerate() {
        let contents: Object = if page_index == broken_page {
            Object::Reference((9999, 0))
        } else {
            let mut operations = Vec::new();
            for (text, x, y) in page_texts {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                .into()
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// The 3x2 name/age table used across tests, laid out on two columns.
pub fn name_age_table() -> PageText<'static> {
    vec![
        ("Name", 50.0, 700.0),
        ("Age", 150.0, 700.0),
        ("Alice", 50.0, 680.0),
        ("30", 150.0, 680.0),
        ("Bob", 50.0, 660.0),
        ("25", 150.0, 660.0),
    ]
}

/// A page of prose: single-column lines that must not detect as a table.
pub fn prose_page() -> PageText<'static> {
    vec![
        ("This report summarizes the quarter.", 50.0, 700.0),
        ("Nothing tabular appears on this page.", 50.0, 680.0),
        ("See the appendix for details.", 50.0, 660.0),
    ]
}
