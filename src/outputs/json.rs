//! JSON output for one query.
//!
//! Files are grouped by the day the run happened:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── aljazeera-asia.json
//! ```

use crate::error::ScrapeError;
use crate::models::{ArticleFeed, DateRange, ExtractedArticle};
use crate::utils::{ensure_writable_dir, slugify};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the articles of one query to `{json_output_dir}/{today}/{slug}.json`.
///
/// The document echoes the category, run date and date window next to the
/// article list. Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display(), %category))]
pub async fn write_articles(
    json_output_dir: &Path,
    category: &str,
    range: DateRange,
    articles: &[ExtractedArticle],
    today: NaiveDate,
) -> Result<PathBuf, ScrapeError> {
    let feed = ArticleFeed {
        category,
        generated_on: today,
        range,
        articles,
    };
    let json = serde_json::to_string_pretty(&feed)?;

    let dated_dir = json_output_dir.join(today.to_string());
    info!(dir = %dated_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = ensure_writable_dir(&dated_dir).await {
        error!(dir = %dated_dir.display(), error = %e, "JSON directory is not writable");
        return Err(e);
    }

    let path = dated_dir.join(format!("{}.json", slugify(category)));
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = articles.len(), "Wrote JSON file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("category_news_json_{name}_{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_write_articles_layout_and_content() {
        let dir = scratch_dir("layout");
        let today = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();
        let articles = vec![ExtractedArticle::new(
            "Floods displace thousands".to_string(),
            "Heavy rains.".to_string(),
            "https://www.aljazeera.com/news/2025/4/15/floods",
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            "Al Jazeera",
            true,
        )];
        let range = DateRange::new(NaiveDate::from_ymd_opt(2025, 4, 1), None);

        let path = write_articles(&dir, "AlJazeera Asia", range, &articles, today)
            .await
            .unwrap();
        assert_eq!(path, dir.join("2025-04-22").join("aljazeera-asia.json"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["category"], "AlJazeera Asia");
        assert_eq!(written["generated_on"], "2025-04-22");
        assert_eq!(written["range"]["start"], "2025-04-01");
        assert!(written["range"]["end"].is_null());
        assert_eq!(written["articles"][0]["formatted_date"], "April 15, 2025");
        assert_eq!(written["articles"][0]["source"], "Al Jazeera");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_articles_empty_list() {
        let dir = scratch_dir("empty");
        let today = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();
        let path = write_articles(&dir, "BBC Sports", DateRange::default(), &[], today)
            .await
            .unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["articles"].as_array().map(Vec::len), Some(0));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
