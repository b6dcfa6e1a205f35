//! Integration tests for the extraction pipeline.

mod common;

use std::io::Write;

use tableqa::{normalize_all, Error, ExtractOptions, TableExtractor};

use common::{make_pdf, make_pdf_with_broken_page, name_age_table, prose_page};

#[test]
fn test_two_page_round_trip() {
    // Page 1 holds a 3x2 table, page 2 holds prose only.
    let pdf = make_pdf(&[name_age_table(), prose_page()]);

    let extractor = TableExtractor::from_bytes(&pdf).unwrap();
    assert_eq!(extractor.page_count(), 2);

    let raw = extractor.extract().unwrap();
    assert_eq!(raw.len(), 1, "exactly one table must be detected");
    assert_eq!(raw[0].page, 1);
    assert_eq!(
        raw[0].rows,
        vec![
            vec!["Name".to_string(), "Age".to_string()],
            vec!["Alice".to_string(), "30".to_string()],
            vec!["Bob".to_string(), "25".to_string()],
        ]
    );

    let grids = normalize_all(raw);
    assert_eq!(grids.len(), 1);
    assert_eq!(grids[0].row_count(), 3);
    assert_eq!(grids[0].column_count(), 2);
}

#[test]
fn test_zero_tables_is_not_an_error() {
    let pdf = make_pdf(&[prose_page(), prose_page()]);

    let extractor = TableExtractor::from_bytes(&pdf).unwrap();
    let raw = extractor.extract().unwrap();

    assert!(raw.is_empty());
}

#[test]
fn test_empty_page_yields_nothing() {
    let pdf = make_pdf(&[vec![]]);

    let extractor = TableExtractor::from_bytes(&pdf).unwrap();
    assert_eq!(extractor.page_count(), 1);
    assert!(extractor.extract().unwrap().is_empty());
}

#[test]
fn test_malformed_file_is_input_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is not a pdf at all").unwrap();

    let result = TableExtractor::open(file.path());
    assert!(matches!(result, Err(Error::UnknownFormat)));
}

#[test]
fn test_missing_file_is_input_error() {
    let result = TableExtractor::open("/nonexistent/never/here.pdf");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_broken_page_is_skipped_in_lenient_mode() {
    // Page 1 broken, page 2 carries the table. The default mode must skip
    // page 1 and still return page 2's table.
    let pdf = make_pdf_with_broken_page(&[vec![], name_age_table()], 0);

    let extractor = TableExtractor::from_bytes(&pdf).unwrap();
    let raw = extractor.extract().unwrap();

    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].page, 2);
}

#[test]
fn test_broken_page_aborts_in_strict_mode() {
    let pdf = make_pdf_with_broken_page(&[vec![], name_age_table()], 0);

    let extractor =
        TableExtractor::from_bytes_with_options(&pdf, ExtractOptions::new().strict()).unwrap();
    let result = extractor.extract();

    match result {
        Err(Error::PageExtraction { page, .. }) => assert_eq!(page, 1),
        other => panic!("expected PageExtraction error, got {other:?}"),
    }
}

#[test]
fn test_tables_extracted_in_page_order() {
    let pdf = make_pdf(&[name_age_table(), prose_page(), name_age_table()]);

    let extractor = TableExtractor::from_bytes(&pdf).unwrap();
    let raw = extractor.extract().unwrap();

    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0].page, 1);
    assert_eq!(raw[1].page, 3);
}

#[test]
fn test_extract_from_file_path() {
    let pdf = make_pdf(&[name_age_table()]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&pdf).unwrap();

    let grids = tableqa::extract_tables(file.path()).unwrap();
    assert_eq!(grids.len(), 1);
    assert_eq!(grids[0].cell(1, 0), Some("Alice"));
}
