//! Publisher-specific scraping strategies.
//!
//! Each publisher family implements [`SourceStrategy`], which bundles the
//! three capabilities the pipeline needs:
//!
//! 1. **Discovery**: scan a listing page for candidate article URLs
//! 2. **Extraction**: pull headline and summary out of an article page
//! 3. **Date resolution**: find the publication date, falling back to today
//!
//! | Variant | Module | Discovery | Dates |
//! |---------|--------|-----------|-------|
//! | BBC | [`bbc`] | `a[href^="/news"]` (or `/sport`) | `time[datetime]` |
//! | The Hindu | [`hindu`] | every anchor, filtered by section markers | JSON-LD, 12 date selectors, 5 text shapes |
//! | Al Jazeera | [`aljazeera`] | article-card anchors, then a broad fallback | JSON-LD `datePublished`, 7 date selectors |
//!
//! Extraction and date resolution are data-driven: a strategy only declares
//! its [`ExtractionProfile`] and [`DateProfile`], and the cascades in
//! [`extract`] and [`dates`] do the rest.

pub mod aljazeera;
pub mod bbc;
pub mod dates;
pub mod extract;
pub mod hindu;

use crate::models::{ArticleFields, CandidateLink, Source, Variant};
use crate::utils::normalize_whitespace;
use chrono::NaiveDate;
use dates::{DateProfile, ResolvedDate};
use extract::ExtractionProfile;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::warn;

/// The capability set every publisher variant provides.
pub trait SourceStrategy: Sync {
    /// Publisher label attached to every emitted article.
    fn label(&self) -> &'static str;

    /// Candidate article URLs on a listing page, absolute and deduplicated.
    fn discover(&self, listing: &str, source: &Source) -> Vec<CandidateLink>;

    fn extraction(&self) -> &'static ExtractionProfile;

    fn date_profile(&self) -> &'static DateProfile;

    /// Whether summaries are cut to 300 characters.
    fn truncates_summary(&self) -> bool {
        true
    }

    /// Per-request timeout for article pages, if tighter than the client's.
    fn article_timeout(&self) -> Option<Duration> {
        None
    }

    fn extract(&self, document: &Html) -> ArticleFields {
        extract::extract(document, self.extraction())
    }

    fn resolve_date(&self, document: &Html, url: &str, today: NaiveDate) -> ResolvedDate {
        dates::resolve(document, url, self.date_profile(), today)
    }
}

impl Variant {
    /// The strategy implementing this variant.
    pub fn strategy(self) -> &'static dyn SourceStrategy {
        match self {
            Variant::Bbc => &bbc::Bbc,
            Variant::Hindu => &hindu::Hindu,
            Variant::AlJazeera => &aljazeera::AlJazeera,
        }
    }
}

/// All elements matching `css`, in document order.
///
/// An invalid selector is logged and matches nothing.
pub(crate) fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            warn!(selector = css, error = %e, "Invalid CSS selector");
            Vec::new()
        }
    }
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Root-relative means a single leading slash; `//host/...` is
/// protocol-relative and not completed against the origin.
pub(crate) fn is_root_relative(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}
