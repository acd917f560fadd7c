//! Markdown rendering of a query result.

use crate::models::{DateRange, ExtractedArticle};
use std::fmt::Write;

/// Render the articles of one category as a Markdown document.
///
/// ```text
/// # BBC Politics
///
/// _Articles from 2025-04-01 to 2025-04-20_
///
/// ## Headline
///
/// **BBC News** · April 15, 2025 · [Read more](https://...)
///
/// Summary text.
/// ```
pub fn articles_to_markdown(
    category: &str,
    range: &DateRange,
    articles: &[ExtractedArticle],
) -> String {
    let mut md = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(md, "# {category}\n");
    if let Some(window) = describe_range(range) {
        let _ = writeln!(md, "_Articles {window}_\n");
    }

    if articles.is_empty() {
        md.push_str("No articles found.\n");
        return md;
    }

    for article in articles {
        let _ = writeln!(md, "## {}\n", article.headline);
        let _ = writeln!(
            md,
            "**{}** · {} · [Read more]({})\n",
            article.source, article.formatted_date, article.link
        );
        let _ = writeln!(md, "{}\n", article.summary);
    }
    md
}

fn describe_range(range: &DateRange) -> Option<String> {
    match (range.start, range.end) {
        (Some(start), Some(end)) => Some(format!("from {start} to {end}")),
        (Some(start), None) => Some(format!("since {start}")),
        (None, Some(end)) => Some(format!("until {end}")),
        (None, None) => None,
    }
}
