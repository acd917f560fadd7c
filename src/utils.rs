//! Small helpers for text cleanup, query parsing and output directories.

use chrono::NaiveDate;
use itertools::Itertools;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::ScrapeError;

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Cut `summary` to `max` characters and append `...` if it was longer.
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point.
pub fn truncate_summary(summary: &str, max: usize) -> String {
    if summary.chars().count() <= max {
        summary.to_string()
    } else {
        let head = summary.chars().take(max).collect::<String>();
        format!("{head}...")
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `…(+N chars)` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head = s.chars().take(max).collect::<String>();
        format!("{head}…(+{} chars)", total - max)
    }
}

/// Lowercase, hyphenated, filename-safe form of a category name.
///
/// ```ignore
/// assert_eq!(slugify("AlJazeera Middle East"), "aljazeera-middle-east");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .join("-")
}

/// Parse a user-supplied `YYYY-MM-DD` date leniently.
///
/// Absent, blank, or unparsable input yields `None`; the caller decides what
/// an open bound means.
pub fn parse_query_date(input: Option<&str>) -> Option<NaiveDate> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(input = raw, error = %e, "Ignoring unparsable date");
            None
        }
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), ScrapeError> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
