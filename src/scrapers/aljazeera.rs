//! Al Jazeera scraper.
//!
//! Listing pages wrap each story in a card (`.gc--type-post`, `article`, ...).
//! The first anchor inside each card is the story link. When the card markup
//! changes and no cards are found, a broader pattern over all anchors (dated
//! paths or `/news/` paths) is used instead.
//!
//! Article URLs usually embed the date (`/news/2025/4/15/slug`), which the
//! date cascade picks up when the page itself has none.

use super::dates::{DateProfile, DateShape, ElementScan};
use super::extract::{ExtractionProfile, HeadlineRule, SummaryRule};
use super::{SourceStrategy, is_root_relative, select};
use crate::models::{CandidateLink, Source};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};

const CARD_CONTAINERS: &str = ".gc--type-post, .gc--type-custompost, article, .article-card";
const FALLBACK_ANCHORS: &str = r#"a[href*="/20"], a[href*="/news/"]"#;
const REJECT_MARKERS: [&str; 5] = ["javascript:", "#", "mailto:", "/tag/", "/author/"];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

static EXTRACTION: ExtractionProfile = ExtractionProfile {
    headline: &[
        HeadlineRule::Heading("h1.article__title"),
        HeadlineRule::Heading("h1.post-title"),
        HeadlineRule::Heading("h1"),
    ],
    summary: &[
        SummaryRule::MetaDescription,
        SummaryRule::ContentParagraph(&[".article__content p, .article-p, .wysiwyg p"]),
    ],
};

static DATES: DateProfile = DateProfile {
    json_ld_fields: &["datePublished"],
    selectors: &[
        "time",
        ".article-dates",
        ".date-simple",
        ".article-date",
        r#"[data-testid="article-date"]"#,
        ".published-date",
        ".post-date",
    ],
    scan: ElementScan::First,
    shapes: &[
        DateShape::DayMonthYear,
        DateShape::MonthDayYear,
        DateShape::Iso,
        DateShape::DayMonthYearSlashed,
    ],
};

#[derive(Debug)]
pub struct AlJazeera;

impl SourceStrategy for AlJazeera {
    fn label(&self) -> &'static str {
        "Al Jazeera"
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    fn discover(&self, listing: &str, source: &Source) -> Vec<CandidateLink> {
        let document = Html::parse_document(listing);

        let mut hrefs = select(&document, CARD_CONTAINERS)
            .into_iter()
            .filter_map(|card| card.select(&ANCHOR).next())
            .filter_map(|anchor| anchor.value().attr("href"))
            .collect::<Vec<_>>();
        if hrefs.is_empty() {
            debug!("No article cards found; using broad anchor patterns");
            hrefs = select(&document, FALLBACK_ANCHORS)
                .into_iter()
                .filter_map(|anchor| anchor.value().attr("href"))
                .collect();
        }

        let links = hrefs
            .into_iter()
            .filter(|href| !REJECT_MARKERS.iter().any(|marker| href.contains(marker)))
            .filter_map(|href| absolutize(source, href))
            .unique()
            .map(CandidateLink::new)
            .collect::<Vec<_>>();

        info!(count = links.len(), "Found Al Jazeera article links");
        debug!(urls = ?links, "Al Jazeera URLs");
        links
    }

    fn extraction(&self) -> &'static ExtractionProfile {
        &EXTRACTION
    }

    fn date_profile(&self) -> &'static DateProfile {
        &DATES
    }

    fn article_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(10))
    }
}

/// Complete root-relative links, keep absolute ones, drop everything else.
fn absolutize(source: &Source, href: &str) -> Option<String> {
    if is_root_relative(href) {
        Some(format!("{}{}", source.origin, href))
    } else if href.starts_with("http") {
        Some(href.to_string())
    } else {
        None
    }
}
