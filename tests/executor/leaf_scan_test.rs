use std::io::Cursor;

use sqlpeek::{
    executor::{
        leaf_scan::LeafPageScanner,
        scan::{ScanIterator, Scanner},
    },
    storage::{config::ReaderConfig, header::DatabaseHeader},
    types::{error::DatabaseError, value::Value},
    utils::mock::{FixtureDatabase, FixturePage},
};

const PAGE_SIZE: u32 = 1024;

fn image(page: FixturePage) -> (Cursor<Vec<u8>>, DatabaseHeader, u32) {
    let mut fixture = FixtureDatabase::new(PAGE_SIZE);
    let index = fixture.add_page(page);
    let cursor = Cursor::new(fixture.to_bytes().unwrap());
    (cursor, fixture.header, index)
}

fn numbered_page(count: u64) -> FixturePage {
    (1..=count).fold(FixturePage::leaf_table(), |page, i| {
        page.with_row(i, &[Value::Int32(i as i32 * 1000)])
    })
}

#[test]
fn test_scan_yields_rows_in_pointer_order() {
    let (mut cursor, header, index) = image(numbered_page(3));
    let config = ReaderConfig::default();
    let mut scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    assert_eq!(scanner.header().cell_count, 3);
    assert_eq!(scanner.last_cell_offset(), None);

    let first = scanner.scan().unwrap().unwrap();
    assert_eq!(first.row_id, 1);
    assert_eq!(first.columns, vec![Value::Int32(1000)]);
    assert_eq!(scanner.last_cell_offset(), Some(scanner.cell_pointers()[0]));

    assert_eq!(scanner.scan().unwrap().unwrap().row_id, 2);
    assert_eq!(scanner.scan().unwrap().unwrap().row_id, 3);
    assert!(scanner.scan().unwrap().is_none());
    assert!(scanner.scan().unwrap().is_none());
}

#[test]
fn test_scan_batch_and_reset() {
    let (mut cursor, header, index) = image(numbered_page(5));
    let config = ReaderConfig::default();
    let mut scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    let batch = scanner.scan_batch(3).unwrap();
    assert_eq!(batch.len(), 3);
    let rest = scanner.scan_batch(10).unwrap();
    assert_eq!(rest.iter().map(|r| r.row_id).collect::<Vec<_>>(), vec![4, 5]);
    assert!(scanner.scan_batch(10).unwrap().is_empty());

    scanner.reset().unwrap();
    assert_eq!(scanner.scan().unwrap().unwrap().row_id, 1);
}

#[test]
fn test_iterator_continues_after_failed_cell() {
    let page = FixturePage::leaf_table()
        .with_row(1, &[Value::Text("a".to_string())])
        // header length 9 runs past a 4-byte record
        .with_raw_cell(vec![0x02, 0x02, 0x09, 0x00])
        .with_row(3, &[Value::Text("c".to_string())]);
    let (mut cursor, header, index) = image(page);
    let config = ReaderConfig::default();
    let scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    let results: Vec<_> = ScanIterator::new(scanner).collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().row_id, 1);
    assert!(matches!(
        results[1],
        Err(DatabaseError::MalformedHeader { .. })
    ));
    assert_eq!(results[2].as_ref().unwrap().row_id, 3);
}

#[test]
fn test_pointer_below_content_area_is_rejected() {
    let page = numbered_page(1).with_extra_pointer(600);
    let (mut cursor, header, index) = image(page);
    let config = ReaderConfig::default();
    let mut scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    assert!(scanner.scan().unwrap().is_some());
    match scanner.scan() {
        Err(DatabaseError::CellOffsetOutOfBounds { page_index, offset }) => {
            assert_eq!(page_index, index);
            assert_eq!(offset, 600);
        }
        other => panic!("Expected CellOffsetOutOfBounds, got {:?}", other),
    }
    assert_eq!(scanner.last_cell_offset(), Some(600));
}

#[test]
fn test_pointer_past_page_end_is_rejected() {
    let page = numbered_page(1).with_extra_pointer(2000);
    let (mut cursor, header, index) = image(page);
    let config = ReaderConfig::default();
    let mut scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    scanner.scan().unwrap();
    assert!(matches!(
        scanner.scan(),
        Err(DatabaseError::CellOffsetOutOfBounds { offset: 2000, .. })
    ));
}

#[test]
fn test_non_leaf_pages_are_unsupported() {
    for page in [
        FixturePage::interior_table(3).with_child(2, 10),
        FixturePage::new(sqlpeek::types::page::PageType::LeafIndex),
    ] {
        let (mut cursor, header, index) = image(page);
        let config = ReaderConfig::default();
        let result = LeafPageScanner::new(&mut cursor, &header, index, &config);
        assert!(matches!(
            result,
            Err(DatabaseError::UnsupportedPageType { .. })
        ));
    }
}

#[test]
fn test_small_prefix_window_still_decodes() {
    let long_text = "x".repeat(300);
    let page = FixturePage::leaf_table().with_row(70_000, &[Value::Text(long_text.clone())]);
    let (mut cursor, header, index) = image(page);
    let config = ReaderConfig::default()
        .with_record_prefix_window(1)
        .with_trace_cells(true);
    let mut scanner = LeafPageScanner::new(&mut cursor, &header, index, &config).unwrap();

    let row = scanner.scan().unwrap().unwrap();
    assert_eq!(row.row_id, 70_000);
    assert_eq!(row.columns, vec![Value::Text(long_text)]);
}
