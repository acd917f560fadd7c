//! Headline and summary cascades.
//!
//! A variant declares an [`ExtractionProfile`]: an ordered list of
//! [`HeadlineRule`]s and an ordered list of [`SummaryRule`]s. Each rule either
//! finds a non-empty value or reports nothing, and the first rule that finds
//! something wins.

use super::{element_text, select};
use crate::models::ArticleFields;
use crate::utils::normalize_whitespace;
use scraper::{ElementRef, Html};

/// Paragraphs must be strictly longer than this (in characters) to count as
/// a summary in the content-area and fallback rules.
pub const MIN_PARAGRAPH_CHARS: usize = 30;

/// Parent class markers that flag a paragraph as page furniture.
const BOILERPLATE_MARKERS: [&str; 4] = ["footer", "comment", "author", "social"];

/// One step of the headline cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineRule {
    /// Text of the first element matching the selector.
    Heading(&'static str),
    /// The `<title>` text before the given publisher suffix. Only applies
    /// when the suffix is actually present.
    TitleBeforeSuffix(&'static str),
}

/// One step of the summary cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRule {
    /// `<meta name="description" content="...">`.
    MetaDescription,
    /// Text of the first `<p>` on the page, whatever its length.
    FirstParagraph,
    /// First sufficiently long paragraph matching any of the selectors,
    /// tried selector by selector.
    ContentParagraph(&'static [&'static str]),
    /// First sufficiently long `<p>` anywhere whose parent is not page
    /// furniture.
    AnyParagraph,
}

/// The ordered cascades for one variant.
#[derive(Debug)]
pub struct ExtractionProfile {
    pub headline: &'static [HeadlineRule],
    pub summary: &'static [SummaryRule],
}

/// Run both cascades over an article page.
pub fn extract(document: &Html, profile: &ExtractionProfile) -> ArticleFields {
    ArticleFields {
        headline: profile
            .headline
            .iter()
            .find_map(|rule| rule.apply(document)),
        summary: profile.summary.iter().find_map(|rule| rule.apply(document)),
    }
}

impl HeadlineRule {
    pub fn apply(&self, document: &Html) -> Option<String> {
        match *self {
            HeadlineRule::Heading(css) => select(document, css)
                .first()
                .map(|element| element_text(*element))
                .filter(|text| !text.is_empty()),
            HeadlineRule::TitleBeforeSuffix(suffix) => {
                let title = select(document, "title")
                    .first()
                    .map(|element| element_text(*element))?;
                let (head, _) = title.split_once(suffix)?;
                Some(head.trim().to_string()).filter(|text| !text.is_empty())
            }
        }
    }
}

impl SummaryRule {
    pub fn apply(&self, document: &Html) -> Option<String> {
        match *self {
            SummaryRule::MetaDescription => select(document, r#"meta[name="description"]"#)
                .first()
                .and_then(|meta| meta.value().attr("content"))
                .map(normalize_whitespace)
                .filter(|text| !text.is_empty()),
            SummaryRule::FirstParagraph => select(document, "p")
                .first()
                .map(|p| element_text(*p))
                .filter(|text| !text.is_empty()),
            SummaryRule::ContentParagraph(selectors) => selectors.iter().find_map(|css| {
                select(document, css)
                    .into_iter()
                    .map(element_text)
                    .find(|text| is_long_enough(text))
            }),
            SummaryRule::AnyParagraph => select(document, "p")
                .into_iter()
                .filter(|p| !is_boilerplate(*p))
                .map(element_text)
                .find(|text| is_long_enough(text)),
        }
    }
}

fn is_long_enough(text: &str) -> bool {
    text.chars().count() > MIN_PARAGRAPH_CHARS
}

/// A paragraph is furniture when its parent's class attribute mentions a
/// footer, comment, author or social block.
fn is_boilerplate(paragraph: ElementRef<'_>) -> bool {
    let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
        return false;
    };
    let class = parent.value().attr("class").unwrap_or_default();
    BOILERPLATE_MARKERS
        .iter()
        .any(|marker| class.contains(marker))
}
