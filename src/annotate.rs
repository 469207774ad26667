//! Merge a JaCoCo source page into the method records of the same file.
//!
//! One call is one read-modify-write of the records file: the report and the
//! records are read, every annotated method gets its coverage lines and
//! counts replaced, and the whole collection is written back. Nothing is
//! written when any earlier step fails. Concurrent calls on the same records
//! file are not coordinated here; callers serialize them.

use std::path::Path;

use tracing::debug;

use crate::error::{CovscrapeError, Result};
use crate::model::{CoverageReport, MethodRecord, MethodRecordCollection};
use crate::parsers::jacoco_html;
use crate::store::{self, FsStorage, Storage, StorageContext};

/// Annotation engine bound to one workspace's storage.
#[derive(Debug)]
pub struct Annotator<S = FsStorage> {
    context: StorageContext,
    storage: S,
}

impl Annotator<FsStorage> {
    pub fn new(context: StorageContext) -> Self {
        Self::with_storage(context, FsStorage)
    }
}

impl<S: Storage> Annotator<S> {
    pub fn with_storage(context: StorageContext, storage: S) -> Self {
        Self { context, storage }
    }

    pub fn context(&self) -> &StorageContext {
        &self.context
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Annotate the records paired with `report_path` and persist them.
    ///
    /// Returns the annotated records in collection order. The final record of
    /// the collection is not annotated and is not returned, though it is
    /// written back unchanged.
    pub fn annotate(&self, report_path: &Path) -> Result<Vec<MethodRecord>> {
        let content = self.storage.read(report_path)?.ok_or_else(|| {
            CovscrapeError::MalformedReport(format!(
                "report not found: {}",
                report_path.display()
            ))
        })?;
        let report = jacoco_html::parse(&content)?;

        let records_path = self.context.records_path_for_report(report_path)?;
        let mut collection = store::load_collection(&self.storage, &records_path)?
            .ok_or_else(|| CovscrapeError::RecordsNotFound(records_path.display().to_string()))?;

        let annotated = annotate_collection(&mut collection, &report).ok_or_else(|| {
            CovscrapeError::RecordsNotFound(format!("no methods in {}", records_path.display()))
        })?;

        store::save_collection(&self.storage, &records_path, &collection)?;
        Ok(annotated)
    }
}

/// Attach report lines to every method but the last, in place.
///
/// Returns clones of the annotated records, or `None` when the collection has
/// no methods at all.
pub fn annotate_collection(
    collection: &mut MethodRecordCollection,
    report: &CoverageReport,
) -> Option<Vec<MethodRecord>> {
    let methods = collection.methods.as_mut().filter(|m| !m.is_empty())?;

    // The final record is never annotated. This looks like an off-by-one in
    // the loop bound; it stays until consumers confirm which bound they expect.
    let bound = methods.len() - 1;

    for method in &mut methods[..bound] {
        let lines = (method.start_line..=method.end_line)
            .map(|line_number| report.line_at(line_number))
            .collect();
        method.apply_coverage(lines);
        debug!(
            method = %method.method_name,
            start = method.start_line,
            end = method.end_line,
            number_of_pc = ?method.partially_covered_count(),
            number_of_nc = ?method.not_covered_count(),
            "annotated method"
        );
    }

    Some(methods[..bound].to_vec())
}
