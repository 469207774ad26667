//! Records shared between the report parser, the annotation engine and the
//! on-disk method store.
//!
//! Field names on the wire follow the JSON written by the structural parser
//! (`method_name`, `star_line`, `number_of_PC`, ...). Fields this crate does
//! not know about are carried through untouched.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classification token attached to one rendered source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineStatus {
    /// `fc`
    FullyCovered,
    /// `pc`
    PartiallyCovered,
    /// `nc`
    NotCovered,
    /// No marker on the line (blank, comment, declaration...).
    None,
    /// Any other token the report uses, kept verbatim.
    Other(String),
}

impl LineStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LineStatus::FullyCovered => "fc",
            LineStatus::PartiallyCovered => "pc",
            LineStatus::NotCovered => "nc",
            LineStatus::None => "none",
            LineStatus::Other(token) => token,
        }
    }

    /// Classify a line anchor from its `class` attribute, kept whole.
    ///
    /// JaCoCo appends a branch marker to lines with branches
    /// (`class="pc bpc"`), so those become `Other("pc bpc")` and fall outside
    /// both aggregates. Whether branch lines should count as `pc`/`nc` is an
    /// open question; consumers currently see the full attribute.
    pub fn from_class(class: Option<&str>) -> Self {
        match class.map(str::trim) {
            Some(attr) if !attr.is_empty() => LineStatus::from(attr.to_string()),
            _ => LineStatus::None,
        }
    }
}

impl From<String> for LineStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "fc" => LineStatus::FullyCovered,
            "pc" => LineStatus::PartiallyCovered,
            "nc" => LineStatus::NotCovered,
            "none" | "" => LineStatus::None,
            _ => LineStatus::Other(token),
        }
    }
}

impl From<LineStatus> for String {
    fn from(status: LineStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Rendered text and status of a single source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCoverage {
    #[serde(rename = "line")]
    pub text: String,
    pub status: LineStatus,
}

impl LineCoverage {
    /// The value used for lines the report has no anchor for.
    pub fn unmarked() -> Self {
        Self {
            text: String::new(),
            status: LineStatus::None,
        }
    }
}

/// One method as emitted by the structural parser, plus the coverage this
/// crate attaches to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub method_name: String,
    #[serde(rename = "star_line", alias = "start_line")]
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coverage_lines: Option<Vec<LineCoverage>>,
    #[serde(
        rename = "number_of_PC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    partially_covered_count: Option<usize>,
    #[serde(
        rename = "number_of_NC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    not_covered_count: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MethodRecord {
    pub fn new(method_name: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            method_name: method_name.into(),
            start_line,
            end_line,
            coverage_lines: None,
            partially_covered_count: None,
            not_covered_count: None,
            extra: Map::new(),
        }
    }

    /// Number of source lines spanned, 0 for an inverted range.
    #[must_use]
    pub fn line_span(&self) -> usize {
        if self.end_line < self.start_line {
            0
        } else {
            (self.end_line - self.start_line) as usize + 1
        }
    }

    pub fn coverage_lines(&self) -> Option<&[LineCoverage]> {
        self.coverage_lines.as_deref()
    }

    pub fn partially_covered_count(&self) -> Option<usize> {
        self.partially_covered_count
    }

    pub fn not_covered_count(&self) -> Option<usize> {
        self.not_covered_count
    }

    /// Replace the coverage lines and recompute both aggregates from them.
    ///
    /// `number_of_PC` counts `nc` lines and `number_of_NC` counts `pc` lines.
    /// The labels read as swapped. Consumers of the stored JSON depend on
    /// this exact mapping, so confirm with them before changing it.
    pub fn apply_coverage(&mut self, lines: Vec<LineCoverage>) {
        self.partially_covered_count = Some(count_status(&lines, &LineStatus::NotCovered));
        self.not_covered_count = Some(count_status(&lines, &LineStatus::PartiallyCovered));
        self.coverage_lines = Some(lines);
    }
}

fn count_status(lines: &[LineCoverage], status: &LineStatus) -> usize {
    lines.iter().filter(|l| &l.status == status).count()
}

/// Everything the structural parser stored for one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodRecordCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<MethodRecord>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MethodRecordCollection {
    pub fn new(methods: Vec<MethodRecord>) -> Self {
        Self {
            methods: Some(methods),
            extra: Map::new(),
        }
    }

    /// Methods, or an empty slice when the field is missing.
    pub fn methods(&self) -> &[MethodRecord] {
        self.methods.as_deref().unwrap_or_default()
    }
}

/// Line-addressable view over one parsed coverage report.
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    lines: HashMap<u32, LineCoverage>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, line_number: u32, line: LineCoverage) {
        self.lines.insert(line_number, line);
    }

    /// Text and status for a 1-based line number. Lines without an anchor
    /// come back as empty text with status `none`.
    #[must_use]
    pub fn line_at(&self, line_number: u32) -> LineCoverage {
        self.lines
            .get(&line_number)
            .cloned()
            .unwrap_or_else(LineCoverage::unmarked)
    }

    /// Number of anchored lines found in the report.
    #[must_use]
    pub fn anchored_lines(&self) -> usize {
        self.lines.len()
    }
}
