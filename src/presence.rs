//! Name lookup over method records.

use std::path::Path;

use tracing::warn;

use crate::model::MethodRecord;
use crate::store::{self, Storage};

/// Where to look for method records.
#[derive(Debug, Clone, Copy)]
pub enum RecordSource<'a> {
    /// A records file, read through the given storage.
    FromStorage(&'a Path),
    /// Records already in memory.
    FromMemory(&'a [MethodRecord]),
}

/// Whether a method called `method_name` appears in `source`.
///
/// Never fails: a missing or unreadable file, a collection without
/// `methods`, and an empty list all answer `false`.
pub fn has_method<S: Storage + ?Sized>(
    storage: &S,
    method_name: &str,
    source: RecordSource<'_>,
) -> bool {
    match source {
        RecordSource::FromMemory(methods) => contains(methods, method_name),
        RecordSource::FromStorage(path) => match store::load_collection(storage, path) {
            Ok(Some(collection)) => contains(collection.methods(), method_name),
            Ok(None) => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read method records");
                false
            }
        },
    }
}

fn contains(methods: &[MethodRecord], method_name: &str) -> bool {
    methods.iter().any(|m| m.method_name == method_name)
}
