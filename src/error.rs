//! Error types for the scraping pipeline.
//!
//! Only [`ScrapeError`] ever reaches a caller. Per-article problems are
//! [`SkipReason`] values: they are counted and logged, and the run moves on
//! to the next candidate.

use thiserror::Error;

/// Failures that stop a run (or prevent one from starting).
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The requested category is not in the registry. The display string is
    /// the user-facing error message.
    #[error("No such category: {0}")]
    CategoryNotFound(String),

    #[error("invalid source url {url}: {source}")]
    InvalidSourceUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single candidate link did not become an article.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    #[error("article page could not be fetched")]
    FetchFailed,
    #[error("publication date outside the requested range")]
    OutOfRange,
    #[error("no headline found")]
    MissingHeadline,
    #[error("no summary found")]
    MissingSummary,
    #[error("link already processed in this run")]
    Duplicate,
}
