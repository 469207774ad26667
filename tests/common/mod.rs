use std::path::PathBuf;

use covscrape::store::StorageContext;
use tempfile::TempDir;

/// Create a temporary storage root with the Calculator records in place and
/// the matching JaCoCo page beside it. Returns the dir handle, the storage
/// context, the report path and the records path.
/// The caller must hold onto `TempDir` to keep the temp directory alive.
pub fn setup_workspace() -> (TempDir, StorageContext, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let context = StorageContext::new(dir.path().join("storage"), "calc-demo");
    std::fs::create_dir_all(context.records_dir()).unwrap();

    let records = context.records_dir().join("Calculator.java.json");
    std::fs::write(&records, include_bytes!("../fixtures/Calculator.java.json")).unwrap();

    let report_dir = dir.path().join("site").join("com.example");
    std::fs::create_dir_all(&report_dir).unwrap();
    let report = report_dir.join("Calculator.html");
    std::fs::write(&report, include_bytes!("../fixtures/Calculator.html")).unwrap();

    (dir, context, report, records)
}
