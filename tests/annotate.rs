mod common;

use covscrape::annotate::Annotator;
use covscrape::error::CovscrapeError;
use covscrape::model::{LineStatus, MethodRecordCollection};

fn read_records(path: &std::path::Path) -> MethodRecordCollection {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

/// Annotate the Calculator page end to end against records on disk.
#[test]
fn annotate_calculator_from_disk() {
    let (_dir, context, report, records) = common::setup_workspace();

    let annotated = Annotator::new(context).annotate(&report).unwrap();

    // `describe` is the last record and is not annotated.
    let names: Vec<_> = annotated.iter().map(|m| m.method_name.as_str()).collect();
    assert_eq!(names, vec!["add", "clamp"]);

    let add = &annotated[0];
    let add_lines = add.coverage_lines().unwrap();
    assert_eq!(add_lines.len(), 3);
    assert_eq!(add_lines[0].status, LineStatus::None);
    assert_eq!(add_lines[1].text, "        return a + b;");
    assert_eq!(add_lines[1].status, LineStatus::FullyCovered);
    assert_eq!(add.partially_covered_count(), Some(0));
    assert_eq!(add.not_covered_count(), Some(0));

    let clamp = &annotated[1];
    let statuses: Vec<_> = clamp
        .coverage_lines()
        .unwrap()
        .iter()
        .map(|l| l.status.as_str())
        .collect();
    assert_eq!(statuses, vec!["none", "pc bpc", "nc", "none", "fc", "none"]);
    assert_eq!(clamp.partially_covered_count(), Some(1)); // the `nc` line
    // The branch line is classed `pc bpc`, not `pc`.
    assert_eq!(clamp.not_covered_count(), Some(0));

    let stored = read_records(&records);
    assert_eq!(stored.methods().len(), 3);
    assert_eq!(stored.methods()[0], *add);
    assert_eq!(stored.methods()[1], *clamp);
    assert!(stored.methods()[2].coverage_lines().is_none());
    assert_eq!(stored.extra["class_name"], "Calculator");
}

#[test]
fn annotate_twice_is_idempotent() {
    let (_dir, context, report, records) = common::setup_workspace();
    let annotator = Annotator::new(context);

    let first = annotator.annotate(&report).unwrap();
    let bytes_first = std::fs::read(&records).unwrap();
    let second = annotator.annotate(&report).unwrap();
    let bytes_second = std::fs::read(&records).unwrap();

    assert_eq!(first, second);
    assert_eq!(bytes_first, bytes_second);
    assert_eq!(second[1].coverage_lines().unwrap().len(), 6);
}

#[test]
fn malformed_report_keeps_records_byte_for_byte() {
    let (dir, context, _report, records) = common::setup_workspace();
    let before = std::fs::read(&records).unwrap();

    // A package index page has no <pre> source block.
    let bad_report = dir.path().join("Calculator.html");
    std::fs::write(&bad_report, include_bytes!("fixtures/NoSource.html")).unwrap();

    let err = Annotator::new(context).annotate(&bad_report).unwrap_err();
    assert!(matches!(err, CovscrapeError::MalformedReport(_)), "{err}");
    assert_eq!(std::fs::read(&records).unwrap(), before);
}

#[test]
fn report_without_records_fails() {
    let (dir, context, _report, _records) = common::setup_workspace();

    let other = dir.path().join("Scheduler.html");
    std::fs::write(&other, include_bytes!("fixtures/Calculator.html")).unwrap();

    let err = Annotator::new(context).annotate(&other).unwrap_err();
    assert!(matches!(err, CovscrapeError::RecordsNotFound(_)), "{err}");
    assert!(err.to_string().contains("Scheduler.java.json"), "{err}");
}

#[test]
fn missing_report_file_fails() {
    let (dir, context, _report, records) = common::setup_workspace();
    let before = std::fs::read(&records).unwrap();

    let err = Annotator::new(context)
        .annotate(&dir.path().join("Calculator.html"))
        .unwrap_err();
    assert!(matches!(err, CovscrapeError::MalformedReport(_)), "{err}");
    assert_eq!(std::fs::read(&records).unwrap(), before);
}

#[test]
fn rewritten_records_keep_upstream_key_order() {
    let (_dir, context, report, records) = common::setup_workspace();
    std::fs::write(
        &records,
        r#"{"package":"com.example","methods":[{"method_name":"add","star_line":5,"end_line":7,"visibility":"public","annotations":[]},{"method_name":"clamp","star_line":9,"end_line":14}],"class_name":"Calculator"}"#,
    )
    .unwrap();

    Annotator::new(context).annotate(&report).unwrap();

    let text = std::fs::read_to_string(&records).unwrap();
    let pos = |key: &str| text.find(&format!("\"{key}\"")).unwrap();
    assert!(pos("package") < pos("class_name"), "{text}");
    assert!(pos("visibility") < pos("annotations"), "{text}");
}
