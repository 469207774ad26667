/// Parser for JaCoCo HTML (XHTML) source pages.
///
/// A source page renders the whole file inside a single `<pre>` block. Every
/// line that carries probes is wrapped in a span whose id is the line number
/// and whose class is the coverage token:
///
///   <pre class="source lang-java linenums">package com.example;
///
///   <span class="fc" id="L3">public class Foo {</span>
///       void run(int x) {
///   <span class="pc bpc" id="L5" title="1 of 2 branches missed.">    if (x &gt; 0) {</span>
///   <span class="nc" id="L6">        work();</span>
///       ...
///   </pre>
///
/// Only the first `<pre>` is read. Spans outside it (breadcrumbs, footer)
/// are ignored, and parsing stops at its closing tag, so markup after the
/// block is never inspected.
use std::sync::LazyLock;

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use tracing::debug;

use super::get_attr;
use crate::error::{CovscrapeError, Result};
use crate::model::{CoverageReport, LineCoverage, LineStatus};

/// Line anchor ids look like `L42`.
static LINE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^L(\d+)$").unwrap());

/// A line span that has been opened but not yet closed.
struct OpenLine {
    number: u32,
    status: LineStatus,
    text: String,
    /// Elements nested inside the span that are still open.
    depth: usize,
}

impl OpenLine {
    fn close(self, report: &mut CoverageReport) {
        report.insert(
            self.number,
            LineCoverage {
                text: self.text,
                status: self.status,
            },
        );
    }
}

/// Parse a JaCoCo HTML source page into a line-addressable report.
pub fn parse(input: &[u8]) -> Result<CoverageReport> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().check_end_names = false;
    let mut buf = Vec::new();

    let mut report = CoverageReport::new();
    let mut block_found = false;
    let mut in_block = false;
    let mut open: Option<OpenLine> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        match event {
            Err(e) => return Err(CovscrapeError::xml(e, reader.buffer_position())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => {
                if let Some(line) = open.as_mut() {
                    line.depth += 1;
                } else if in_block {
                    open = line_anchor(e).map(|(number, status)| OpenLine {
                        number,
                        status,
                        text: String::new(),
                        depth: 0,
                    });
                } else if !block_found && e.name().as_ref() == b"pre" {
                    block_found = true;
                    in_block = true;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if in_block && open.is_none() {
                    if let Some((number, status)) = line_anchor(e) {
                        report.insert(
                            number,
                            LineCoverage {
                                text: String::new(),
                                status,
                            },
                        );
                    }
                } else if !block_found && e.name().as_ref() == b"pre" {
                    block_found = true;
                    break;
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(line) = open.as_mut() {
                    match t.unescape_with(resolve_html5_entity) {
                        Ok(text) => line.text.push_str(&text),
                        // Entities HTML5 does not define either are kept as written.
                        Err(_) => line.text.push_str(&String::from_utf8_lossy(t)),
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                // `</pre>` ends the block even when a line span inside it
                // was never closed.
                if in_block && e.name().as_ref() == b"pre" {
                    break;
                }
                if let Some(mut line) = open.take() {
                    if line.depth == 0 {
                        line.close(&mut report);
                    } else {
                        line.depth -= 1;
                        open = Some(line);
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    // Unclosed span or truncated page: keep whatever the last span collected.
    if let Some(line) = open.take() {
        line.close(&mut report);
    }

    if !block_found {
        return Err(CovscrapeError::MalformedReport(
            "no <pre> source block found".to_string(),
        ));
    }

    debug!(anchored_lines = report.anchored_lines(), "parsed JaCoCo source page");
    Ok(report)
}

/// Line number and status of a `<span id="L<N>">`, if `e` is one.
fn line_anchor(e: &BytesStart) -> Option<(u32, LineStatus)> {
    if e.name().as_ref() != b"span" {
        return None;
    }
    let id = get_attr(e, b"id")?;
    let number = LINE_ID_RE.captures(&id)?.get(1)?.as_str().parse().ok()?;
    let status = LineStatus::from_class(get_attr(e, b"class").as_deref());
    Some((number, status))
}
