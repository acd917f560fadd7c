//! Publication-date cascade.
//!
//! Steps, first success wins:
//!
//! 1. **Structured data**: JSON-LD blocks, first configured field present
//! 2. **Date elements**: variant selectors; a `datetime` attribute beats the
//!    element text, which is scanned with the variant's [`DateShape`]s
//! 3. **URL path**: a `/YYYY/M/D/` segment in the article URL
//! 4. **Today**: so every article carries a date
//!
//! Resolution never fails; [`ResolvedDate::source`] records which step
//! produced the value.

use super::{element_text, select};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::Html;
use serde_json::Value;

static MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]+) (\d{1,2}), (\d{4})").expect("valid regex"));
static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}) ([A-Za-z]+) (\d{4})").expect("valid regex"));
static DAY_MON_YEAR_DASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})-([A-Za-z]+)-(\d{4})").expect("valid regex"));
static DAY_MONTH_YEAR_SLASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})/(\d{2})/(\d{4})").expect("valid regex"));
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));
static URL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d{4})/(\d{1,2})/(\d{1,2})/").expect("valid regex"));

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A free-text date layout recognised inside date elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// `April 15, 2025`
    MonthDayYear,
    /// `15 April 2025`
    DayMonthYear,
    /// `15-Apr-2025`
    DayMonYearDashed,
    /// `15/04/2025` (day first)
    DayMonthYearSlashed,
    /// `2025-04-15`
    Iso,
}

impl DateShape {
    fn regex(self) -> &'static Regex {
        match self {
            DateShape::MonthDayYear => &MONTH_DAY_YEAR,
            DateShape::DayMonthYear => &DAY_MONTH_YEAR,
            DateShape::DayMonYearDashed => &DAY_MON_YEAR_DASHED,
            DateShape::DayMonthYearSlashed => &DAY_MONTH_YEAR_SLASHED,
            DateShape::Iso => &ISO_DATE,
        }
    }

    /// First occurrence of this shape in `text` that is a real calendar date.
    pub fn find(self, text: &str) -> Option<NaiveDate> {
        self.regex()
            .captures_iter(text)
            .find_map(|caps| self.build(&caps))
    }

    fn build(self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let (year, month, day) = match self {
            DateShape::MonthDayYear => (&caps[3], month_number(&caps[1])?, &caps[2]),
            DateShape::DayMonthYear | DateShape::DayMonYearDashed => {
                (&caps[3], month_number(&caps[2])?, &caps[1])
            }
            DateShape::DayMonthYearSlashed => (&caps[3], caps[2].parse::<u32>().ok()?, &caps[1]),
            DateShape::Iso => (&caps[1], caps[2].parse::<u32>().ok()?, &caps[3]),
        };
        NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
    }
}

/// Month number for a full or three-letter English month name.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|month| *month == name || (name.len() == 3 && month.starts_with(&name)))
        .map(|index| index as u32 + 1)
}

/// How many elements per selector are examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementScan {
    /// Every matching element, in document order.
    All,
    /// Only the first matching element.
    First,
}

/// Per-variant inputs to the date cascade.
#[derive(Debug)]
pub struct DateProfile {
    /// JSON-LD fields in priority order. Empty disables the step.
    pub json_ld_fields: &'static [&'static str],
    pub selectors: &'static [&'static str],
    pub scan: ElementScan,
    /// Text shapes tried against an element's text, in order. Empty means
    /// only `datetime` attributes are read.
    pub shapes: &'static [DateShape],
}

/// Which cascade step produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    StructuredData,
    DatetimeAttribute,
    ElementText,
    UrlPath,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

/// The evidence-based steps, in precedence order. "Today" is the fallback
/// applied by [`resolve`] when none of them finds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateStep {
    StructuredData,
    Elements,
    UrlPath,
}

const CASCADE: [DateStep; 3] = [DateStep::StructuredData, DateStep::Elements, DateStep::UrlPath];

impl DateStep {
    fn apply(self, document: &Html, url: &str, profile: &DateProfile) -> Option<ResolvedDate> {
        match self {
            DateStep::StructuredData => from_json_ld(document, profile.json_ld_fields)
                .map(|date| ResolvedDate {
                    date,
                    source: DateSource::StructuredData,
                }),
            DateStep::Elements => from_elements(document, profile),
            DateStep::UrlPath => from_url(url).map(|date| ResolvedDate {
                date,
                source: DateSource::UrlPath,
            }),
        }
    }
}

/// Run the cascade. Always produces a date.
pub fn resolve(document: &Html, url: &str, profile: &DateProfile, today: NaiveDate) -> ResolvedDate {
    CASCADE
        .iter()
        .find_map(|step| step.apply(document, url, profile))
        .unwrap_or(ResolvedDate {
            date: today,
            source: DateSource::Today,
        })
}

/// Date portion of an ISO-8601 timestamp such as `2025-04-15T09:30:00Z`.
pub fn parse_iso_prefix(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.split('T').next().unwrap_or(value).trim();
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok().or_else(|| {
        value
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

/// Scan JSON-LD blocks. Only object roots are considered, and only the
/// highest-priority field present in a block is tried; blocks that fail to
/// parse are skipped.
fn from_json_ld(document: &Html, fields: &[&str]) -> Option<NaiveDate> {
    if fields.is_empty() {
        return None;
    }
    select(document, r#"script[type="application/ld+json"]"#)
        .into_iter()
        .find_map(|script| {
            let raw = script.text().collect::<String>();
            let Ok(Value::Object(block)) = serde_json::from_str::<Value>(&raw) else {
                return None;
            };
            let value = fields.iter().find_map(|field| block.get(*field))?;
            parse_iso_prefix(value.as_str()?)
        })
}

fn from_elements(document: &Html, profile: &DateProfile) -> Option<ResolvedDate> {
    for css in profile.selectors {
        let elements = select(document, css);
        let limit = match profile.scan {
            ElementScan::All => elements.len(),
            ElementScan::First => 1,
        };
        for element in elements.into_iter().take(limit) {
            if let Some(date) = element.value().attr("datetime").and_then(parse_iso_prefix) {
                return Some(ResolvedDate {
                    date,
                    source: DateSource::DatetimeAttribute,
                });
            }
            if profile.shapes.is_empty() {
                continue;
            }
            let text = element_text(element);
            if let Some(date) = profile.shapes.iter().find_map(|shape| shape.find(&text)) {
                return Some(ResolvedDate {
                    date,
                    source: DateSource::ElementText,
                });
            }
        }
    }
    None
}

/// `/YYYY/M/D/` in the URL path, rejected unless it is a real calendar date.
pub fn from_url(url: &str) -> Option<NaiveDate> {
    let caps = URL_DATE.captures(url)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}
