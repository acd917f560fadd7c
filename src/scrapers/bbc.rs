//! BBC News / BBC Sport scraper.
//!
//! Listing pages link articles with root-relative paths under a section
//! prefix (`/news/...` or `/sport/...`). Article pages reliably carry a
//! `<time datetime="...">` element, so no JSON-LD or free-text parsing is
//! attempted. BBC summaries are emitted untruncated.

use super::dates::{DateProfile, ElementScan};
use super::extract::{ExtractionProfile, HeadlineRule, SummaryRule};
use super::{SourceStrategy, select};
use crate::models::{CandidateLink, Source};
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, info, instrument};

static EXTRACTION: ExtractionProfile = ExtractionProfile {
    headline: &[HeadlineRule::Heading("h1"), HeadlineRule::Heading("h2")],
    summary: &[SummaryRule::FirstParagraph],
};

static DATES: DateProfile = DateProfile {
    json_ld_fields: &[],
    selectors: &["time"],
    scan: ElementScan::First,
    shapes: &[],
};

#[derive(Debug)]
pub struct Bbc;

impl SourceStrategy for Bbc {
    fn label(&self) -> &'static str {
        "BBC News"
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    fn discover(&self, listing: &str, source: &Source) -> Vec<CandidateLink> {
        let document = Html::parse_document(listing);
        let css = format!(r#"a[href^="{}"]"#, source.link_prefix);

        let links = select(&document, &css)
            .into_iter()
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| is_article_path(href))
            .map(|href| format!("{}{}", source.origin, href))
            .unique()
            .map(CandidateLink::new)
            .collect::<Vec<_>>();

        info!(count = links.len(), "Indexed BBC article URLs");
        debug!(urls = ?links, "BBC URLs");
        links
    }

    fn extraction(&self) -> &'static ExtractionProfile {
        &EXTRACTION
    }

    fn date_profile(&self) -> &'static DateProfile {
        &DATES
    }

    fn truncates_summary(&self) -> bool {
        false
    }
}

/// Live pages, fragments and section indexes (fewer than three `/`
/// segments, e.g. `/news`) are not articles.
fn is_article_path(href: &str) -> bool {
    href.split('/').count() >= 3 && !href.contains("live") && !href.contains('#')
}
