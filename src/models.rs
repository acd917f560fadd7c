//! Data models shared by every stage of the pipeline.
//!
//! - [`Source`]: one registry entry (category name, listing URL, variant)
//! - [`DateRange`]: the optional inclusive window an article must fall into
//! - [`FetchOutcome`]: the result of a single HTTP request
//! - [`CandidateLink`]: an absolute URL found on a listing page
//! - [`ExtractedArticle`]: the terminal record handed to consumers
//!
//! Everything here is created fresh for each run and never mutated after
//! construction.

use crate::error::ScrapeError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// Maximum summary length (in characters) for variants that truncate.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// The publisher-specific strategy family a source belongs to.
///
/// The set is closed: each variant maps to exactly one
/// [`SourceStrategy`](crate::scrapers::SourceStrategy) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// BBC-like: prefix-filtered anchors, `time[datetime]` dates.
    Bbc,
    /// Hindu-like: marker-filtered anchors, JSON-LD and date-text heuristics.
    Hindu,
    /// Al Jazeera-like: article-card anchors, JSON-LD `datePublished`.
    AlJazeera,
}

/// A category page on one publisher's site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Category display name, used as the registry key.
    pub name: String,
    /// Listing page URL.
    pub url: Url,
    /// Scheme, host and port of `url`, e.g. `https://www.bbc.com`.
    pub origin: String,
    pub variant: Variant,
    /// Path prefix an anchor must start with to be considered (BBC only).
    pub link_prefix: String,
}

impl Source {
    /// Build a source from its registry fields.
    ///
    /// When `link_prefix` is not given it defaults to the first path segment
    /// of the listing URL, so `https://www.bbc.com/news/politics` yields
    /// `/news` and `https://www.bbc.com/sport` yields `/sport`.
    pub fn new(
        name: &str,
        url: &str,
        variant: Variant,
        link_prefix: Option<&str>,
    ) -> Result<Self, ScrapeError> {
        let parsed = Url::parse(url).map_err(|source| ScrapeError::InvalidSourceUrl {
            url: url.to_string(),
            source,
        })?;
        let origin = parsed.origin().ascii_serialization();
        let link_prefix = match link_prefix {
            Some(prefix) => prefix.to_string(),
            None => {
                let first = parsed
                    .path_segments()
                    .and_then(|mut segments| segments.next())
                    .unwrap_or_default();
                format!("/{first}")
            }
        };

        Ok(Self {
            name: name.to_string(),
            url: parsed,
            origin,
            variant,
            link_prefix,
        })
    }
}

/// Inclusive publication-date window. Either end may be open.
///
/// An inverted window (`start > end`) is accepted as-is and simply matches
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Returns `true` when `date` lies inside the window.
    pub fn accept(&self, date: NaiveDate) -> bool {
        if self.start.is_some_and(|start| date < start) {
            return false;
        }
        if self.end.is_some_and(|end| date > end) {
            return false;
        }
        true
    }
}

/// Result of a single GET request. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response with its decoded body.
    Success(String),
    /// The server answered with a non-2xx status.
    HttpError(u16),
    /// The request never produced a response (DNS, connect, timeout, body read).
    NetworkError(String),
}

impl FetchOutcome {
    /// The body on success, otherwise a printable description of the failure.
    pub fn into_body(self) -> Result<String, String> {
        match self {
            FetchOutcome::Success(body) => Ok(body),
            FetchOutcome::HttpError(status) => Err(format!("HTTP status {status}")),
            FetchOutcome::NetworkError(message) => Err(message),
        }
    }
}

/// An absolute URL discovered on a listing page, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateLink {
    pub url: String,
}

impl CandidateLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Headline and summary as found by the extraction cascade.
///
/// `None` means the whole cascade came up empty for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFields {
    pub headline: Option<String>,
    pub summary: Option<String>,
}

/// A fully qualified article, ready for rendering.
///
/// `headline` and `summary` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractedArticle {
    pub headline: String,
    pub summary: String,
    pub link: String,
    /// Serialized as `YYYY-MM-DD`.
    pub published_date: NaiveDate,
    /// Human-readable date, e.g. `April 15, 2025`.
    pub formatted_date: String,
    /// Publisher label, e.g. `The Hindu`.
    pub source: String,
}

impl ExtractedArticle {
    /// Assemble the final record, truncating the summary to
    /// [`SUMMARY_MAX_CHARS`] when `truncate` is set.
    pub fn new(
        headline: String,
        summary: String,
        link: &str,
        published_date: NaiveDate,
        source_label: &str,
        truncate: bool,
    ) -> Self {
        let summary = if truncate {
            crate::utils::truncate_summary(&summary, SUMMARY_MAX_CHARS)
        } else {
            summary
        };
        Self {
            headline,
            summary,
            link: link.to_string(),
            published_date,
            formatted_date: published_date.format("%B %d, %Y").to_string(),
            source: source_label.to_string(),
        }
    }
}

/// The JSON document written for one query.
#[derive(Debug, Serialize)]
pub struct ArticleFeed<'a> {
    pub category: &'a str,
    pub generated_on: NaiveDate,
    pub range: DateRange,
    pub articles: &'a [ExtractedArticle],
}
