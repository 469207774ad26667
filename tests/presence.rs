mod common;

use covscrape::model::MethodRecord;
use covscrape::presence::{has_method, RecordSource};
use covscrape::store::FsStorage;

#[test]
fn lookup_in_records_file() {
    let (_dir, _context, _report, records) = common::setup_workspace();

    assert!(has_method(&FsStorage, "add", RecordSource::FromStorage(&records)));
    // The last record counts too; only annotation skips it.
    assert!(has_method(&FsStorage, "describe", RecordSource::FromStorage(&records)));
    assert!(!has_method(&FsStorage, "divide", RecordSource::FromStorage(&records)));
}

#[test]
fn lookup_in_missing_or_empty_files_is_false() {
    let (dir, _context, _report, _records) = common::setup_workspace();

    let missing = dir.path().join("Missing.java.json");
    assert!(!has_method(&FsStorage, "add", RecordSource::FromStorage(&missing)));

    let empty = dir.path().join("Empty.java.json");
    std::fs::write(&empty, b"{\"methods\":[]}").unwrap();
    assert!(!has_method(&FsStorage, "add", RecordSource::FromStorage(&empty)));

    let no_methods = dir.path().join("NoMethods.java.json");
    std::fs::write(&no_methods, b"{\"class_name\":\"X\"}").unwrap();
    assert!(!has_method(&FsStorage, "add", RecordSource::FromStorage(&no_methods)));
}

#[test]
fn lookup_in_memory() {
    let methods = vec![
        MethodRecord::new("push", 3, 8),
        MethodRecord::new("pop", 10, 15),
    ];
    assert!(has_method(&FsStorage, "pop", RecordSource::FromMemory(&methods)));
    assert!(!has_method(&FsStorage, "peek", RecordSource::FromMemory(&methods)));
}
