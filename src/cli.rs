//! Command handler functions for the covscrape CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;
use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::annotate::Annotator;
use crate::parsers::jacoco_html;
use crate::presence::{self, RecordSource};
use crate::store::{FsStorage, StorageContext};

pub fn cmd_annotate(context: StorageContext, report: &Path) -> Result<String> {
    let records_path = context.records_path_for_report(report)?;
    let annotator = Annotator::new(context);
    let methods = annotator
        .annotate(report)
        .with_context(|| format!("Failed to annotate {}", report.display()))?;

    let mut out = String::new();
    writeln!(
        out,
        "{:<40} {:>11} {:>13} {:>13}",
        "METHOD", "LINES", "NUMBER_OF_PC", "NUMBER_OF_NC"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(80)).unwrap();
    for m in &methods {
        writeln!(
            out,
            "{:<40} {:>11} {:>13} {:>13}",
            m.method_name,
            format!("{}-{}", m.start_line, m.end_line),
            m.partially_covered_count().unwrap_or(0),
            m.not_covered_count().unwrap_or(0),
        )
        .unwrap();
    }
    writeln!(
        out,
        "Annotated {} methods → {}",
        methods.len(),
        records_path.display()
    )
    .unwrap();
    Ok(out)
}

pub fn cmd_lines(report: &Path, start: u32, end: u32) -> Result<String> {
    ensure!(start <= end, "--start ({start}) must not exceed --end ({end})");

    let content =
        std::fs::read(report).with_context(|| format!("Failed to read {}", report.display()))?;
    let parsed = jacoco_html::parse(&content)?;

    let mut out = String::new();
    writeln!(out, "{:>6}  {:<6}  TEXT", "LINE", "STATUS").unwrap();
    writeln!(out, "{}", "-".repeat(40)).unwrap();
    for line_number in start..=end {
        let line = parsed.line_at(line_number);
        writeln!(out, "{:>6}  {:<6}  {}", line_number, line.status, line.text).unwrap();
    }
    Ok(out)
}

pub fn cmd_has_method(method_name: &str, records: &Path) -> Result<String> {
    let found = presence::has_method(&FsStorage, method_name, RecordSource::FromStorage(records));
    Ok(format!("{found}\n"))
}

pub fn cmd_key(context: &StorageContext, report: &Path) -> Result<String> {
    let path = context.records_path_for_report(report)?;
    Ok(format!("{}\n", path.display()))
}
