//! # Category News
//!
//! Command-line front end: scrape one category and print the articles as
//! Markdown, optionally writing JSON and Markdown files as well.
//!
//! ## Usage
//!
//! ```sh
//! category_news "BBC Politics" -n 5 -j ./json -m ./markdown
//! ```

use category_news::config::Settings;
use category_news::error::ScrapeError;
use category_news::fetch::{FixedPacing, HttpFetcher, Paced};
use category_news::models::DateRange;
use category_news::outputs::{json, markdown};
use category_news::pipeline::{Pipeline, Query};
use category_news::utils::{ensure_writable_dir, parse_query_date, slugify};
use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())?;
    let registry = settings.registry()?;

    if args.list_categories {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }
    let Some(category) = args.category.as_deref() else {
        return Err("a category is required".into());
    };

    // Open start, end defaults to today.
    let today = Local::now().date_naive();
    let start = parse_query_date(args.start_date.as_deref());
    let end = parse_query_date(args.end_date.as_deref()).or(Some(today));
    let range = DateRange::new(start, end);
    let max_articles = args.max_articles.unwrap_or(settings.max_articles);
    info!(%category, max_articles, ?start, ?end, "Starting run");

    // Early check: output directories must be writable before any scraping.
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(Path::new(dir)).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e.into());
        }
    }

    let fetcher = Paced::new(
        HttpFetcher::new(&settings.http)?,
        FixedPacing::new(settings.pacing.clone()),
    );
    let query = Query::new(category)
        .with_max_articles(max_articles)
        .with_range(range);

    let report = match Pipeline::new(&registry, fetcher).run(&query, today).await {
        Ok(report) => report,
        Err(e @ ScrapeError::CategoryNotFound(_)) => {
            eprintln!("{e}");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(reason) = &report.listing_error {
        warn!(%category, %reason, "Listing page unavailable; no articles");
    }

    let md = markdown::articles_to_markdown(category, &range, &report.articles);
    println!("{md}");

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_articles(Path::new(dir), category, range, &report.articles, today).await {
            error!(error = %e, "Failed to write JSON");
        }
    }

    if let Some(dir) = &args.markdown_output_dir {
        let path = Path::new(dir).join(format!("{today}_{}.md", slugify(category)));
        info!(path = %path.display(), "Writing Markdown");
        if let Err(e) = tokio::fs::write(&path, &md).await {
            error!(path = %path.display(), error = %e, "Failed writing Markdown");
        } else {
            info!(path = %path.display(), "Wrote Markdown");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        articles = report.articles.len(),
        candidates = report.candidates,
        elapsed_secs = elapsed.as_secs_f64(),
        "category_news finished"
    );
    Ok(())
}
