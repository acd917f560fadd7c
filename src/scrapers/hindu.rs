//! The Hindu scraper.
//!
//! Listing pages mix navigation, tag and article links with both absolute
//! and root-relative hrefs, so every anchor is scanned and kept only if it
//! points into one of the article sections. Article markup varies a lot
//! between sections, hence the long headline, summary and date cascades.

use super::dates::{DateProfile, DateShape, ElementScan};
use super::extract::{ExtractionProfile, HeadlineRule, SummaryRule};
use super::{SourceStrategy, is_root_relative, select};
use crate::models::{CandidateLink, Source};
use itertools::Itertools;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Path fragments that mark an article (or article section) URL.
const ARTICLE_MARKERS: [&str; 6] = [
    "/article",
    "/news/",
    "/business/",
    "/sport/",
    "/sci-tech/",
    "/entertainment/",
];

static EXTRACTION: ExtractionProfile = ExtractionProfile {
    headline: &[
        HeadlineRule::Heading("h1.title"),
        HeadlineRule::Heading("h1.article-title"),
        HeadlineRule::Heading(r#"h1[itemprop="headline"]"#),
        HeadlineRule::Heading("h1.story-headline"),
        HeadlineRule::Heading("h1"),
        HeadlineRule::TitleBeforeSuffix(" - The Hindu"),
    ],
    summary: &[
        SummaryRule::MetaDescription,
        SummaryRule::ContentParagraph(&[
            ".lead-text",
            ".article-text p",
            ".article p",
            "article p",
            ".story-content p",
        ]),
        SummaryRule::AnyParagraph,
    ],
};

static DATES: DateProfile = DateProfile {
    json_ld_fields: &["datePublished", "dateModified", "publishedDate"],
    selectors: &[
        ".dateline",
        ".date-line",
        ".publish-time",
        ".update-time",
        "time",
        r#"[itemprop="datePublished"]"#,
        r#"[itemprop="dateModified"]"#,
        ".article-date",
        ".storydate",
        ".story-date-time",
        ".meta-datetime",
        ".article__published",
    ],
    scan: ElementScan::All,
    shapes: &[
        DateShape::MonthDayYear,
        DateShape::DayMonthYear,
        DateShape::DayMonYearDashed,
        DateShape::DayMonthYearSlashed,
        DateShape::Iso,
    ],
};

#[derive(Debug)]
pub struct Hindu;

impl SourceStrategy for Hindu {
    fn label(&self) -> &'static str {
        "The Hindu"
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    fn discover(&self, listing: &str, source: &Source) -> Vec<CandidateLink> {
        let document = Html::parse_document(listing);
        let absolute_prefix = format!("{}/", source.origin);

        let links = select(&document, "a[href]")
            .into_iter()
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| href.starts_with(&absolute_prefix) || is_root_relative(href))
            .filter(|href| ARTICLE_MARKERS.iter().any(|marker| href.contains(marker)))
            .map(|href| {
                if is_root_relative(href) {
                    format!("{}{}", source.origin, href)
                } else {
                    href.to_string()
                }
            })
            .unique()
            .map(CandidateLink::new)
            .collect::<Vec<_>>();

        info!(count = links.len(), "Found potential Hindu article links");
        debug!(urls = ?links, "Hindu URLs");
        links
    }

    fn extraction(&self) -> &'static ExtractionProfile {
        &EXTRACTION
    }

    fn date_profile(&self) -> &'static DateProfile {
        &DATES
    }

    fn article_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(15))
    }
}
