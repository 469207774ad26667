use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovscrapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed coverage report: {0}")]
    MalformedReport(String),

    #[error("Method records not found: {0}")]
    RecordsNotFound(String),

    #[error("Invalid report locator: {0}")]
    InvalidLocator(String),
}

impl CovscrapeError {
    /// Wrap a markup error, keeping the byte offset it was raised at.
    pub(crate) fn xml(source: quick_xml::Error, position: usize) -> Self {
        CovscrapeError::MalformedReport(format!(
            "XML parse error at position {position}: {source}"
        ))
    }
}

pub type Result<T> = std::result::Result<T, CovscrapeError>;
