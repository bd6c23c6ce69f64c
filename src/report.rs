//! Report rendering: console text or JSON.
//!
//! Text output lists only the signals that fired: false flags and a single
//! query mention are left out.

use std::fmt::{self, Write};

use webhound_search::DetectionResult;

use crate::config::OutputFormat;
use crate::error::{Result, WebhoundError};
use crate::pipeline::{AnnotatedResult, SearchReport};

const LABEL_WIDTH: usize = 18;

/// Render `report` in `format`.
///
/// # Errors
///
/// Returns [`WebhoundError::Serialize`] if encoding or formatting fails.
pub fn render(report: &SearchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

/// Pretty-printed JSON.
///
/// # Errors
///
/// Returns [`WebhoundError::Serialize`] if encoding fails.
pub fn render_json(report: &SearchReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| WebhoundError::Serialize(e.to_string()))
}

/// Human-readable console text.
///
/// # Errors
///
/// Returns [`WebhoundError::Serialize`] if formatting fails.
pub fn render_text(report: &SearchReport) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, report)
        .map_err(|e| WebhoundError::Serialize(format!("formatting report: {e}")))?;
    Ok(out)
}

fn write_text<W: Write>(out: &mut W, report: &SearchReport) -> fmt::Result {
    if report.is_empty() {
        return writeln!(out, "No results found.");
    }

    for engine in &report.engines {
        writeln!(out, "Results from {}:", engine.engine)?;
        if engine.results.is_empty() {
            writeln!(
                out,
                "  no results extracted from {} page(s)",
                engine.pages_retrieved
            )?;
        }
        for (index, result) in engine.results.iter().enumerate() {
            writeln!(out)?;
            write_result(out, index + 1, result)?;
        }
        writeln!(out)?;
    }
    writeln!(
        out,
        "{} result(s) from {} engine(s)",
        report.total_results(),
        report.engines.len()
    )
}

fn write_result<W: Write>(out: &mut W, number: usize, result: &AnnotatedResult) -> fmt::Result {
    writeln!(out, "Result {number}")?;
    field(out, "Title:", &result.item.title)?;
    field(out, "URL:", &result.item.url)?;
    field(out, "Description:", &result.item.description)?;
    for (label, value) in signals(&result.detection) {
        field(out, label, &value)?;
    }
    Ok(())
}

fn field<W: Write>(out: &mut W, label: &str, value: &str) -> fmt::Result {
    writeln!(out, "  {label:<LABEL_WIDTH$} {value}")
}

/// Detection lines worth showing, in display order.
pub fn signals(detection: &DetectionResult) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    if detection.is_forum {
        lines.push(("Forum:", "yes".to_owned()));
    }
    if detection.is_news {
        lines.push(("News:", "yes".to_owned()));
    }
    let others: Vec<&str> = detection
        .matched_categories
        .iter()
        .map(String::as_str)
        .filter(|c| *c != "forum" && *c != "news")
        .collect();
    if !others.is_empty() {
        lines.push(("Categories:", others.join(", ")));
    }
    if detection.query_mentions > 1 {
        lines.push(("Query Mentions:", detection.query_mentions.to_string()));
    }
    if !detection.social_platforms_detected.is_empty() {
        let platforms: Vec<&str> = detection
            .social_platforms_detected
            .iter()
            .map(String::as_str)
            .collect();
        lines.push(("Social Platforms:", platforms.join(", ")));
    }
    if !detection.entities.is_empty() {
        let entities: Vec<String> = detection
            .entities
            .iter()
            .map(|(text, label)| format!("{text} ({label})"))
            .collect();
        lines.push(("Entities:", entities.join(", ")));
    }
    lines
}
