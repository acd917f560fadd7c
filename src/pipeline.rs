//! One scraping run: category → listing page → candidates → articles.
//!
//! The run is strictly sequential. Each candidate is fetched, extracted,
//! dated and filtered before the next one is requested, and the pacing
//! decorator around the fetcher keeps the request rate fixed.
//!
//! ```text
//! resolve category ─► fetch listing ─► discover links
//!                                        │
//!        ┌───────────────────────────────┘
//!        ▼
//!   for each candidate (until the cap is reached):
//!     fetch ─► extract ─► resolve date ─► range filter ─► aggregate
//! ```

use crate::error::{ScrapeError, SkipReason};
use crate::fetch::{PageKind, PageSource};
use crate::models::{CandidateLink, DateRange, ExtractedArticle, Source};
use crate::registry::SourceRegistry;
use crate::scrapers::dates::DateSource;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use scraper::Html;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info, instrument, warn};

/// Article cap used when the caller does not choose one.
pub const DEFAULT_MAX_ARTICLES: usize = 10;

/// What the consumer asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub category: String,
    pub max_articles: usize,
    pub range: DateRange,
}

impl Query {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            max_articles: DEFAULT_MAX_ARTICLES,
            range: DateRange::default(),
        }
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}

/// Everything a run produced, including why candidates were dropped.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Accepted articles, in discovery order.
    pub articles: Vec<ExtractedArticle>,
    /// Number of candidate links discovered on the listing page.
    pub candidates: usize,
    /// Set when the listing page itself could not be fetched. The article
    /// list is then empty for a different reason than "nothing matched".
    pub listing_error: Option<String>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunReport {
    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_default() += 1;
    }
}

/// Owns the per-run dedup set and result list, and enforces the cap.
#[derive(Debug)]
pub struct Aggregator {
    cap: usize,
    seen: HashSet<String>,
    articles: Vec<ExtractedArticle>,
}

impl Aggregator {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            seen: HashSet::new(),
            articles: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.articles.len() >= self.cap
    }

    /// Mark `url` as processed. Returns `false` if it already was.
    pub fn claim(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    /// Append an accepted article. Refused when the cap is reached or an
    /// article with the same link is already present.
    pub fn push(&mut self, article: ExtractedArticle) -> Result<(), SkipReason> {
        if self.articles.iter().any(|existing| existing.link == article.link) {
            return Err(SkipReason::Duplicate);
        }
        if self.is_full() {
            debug!(link = %article.link, "Cap reached; dropping article");
            return Ok(());
        }
        self.articles.push(article);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn into_articles(self) -> Vec<ExtractedArticle> {
        self.articles
    }
}

/// The scraping pipeline over an explicit registry and page source.
pub struct Pipeline<'r, F> {
    registry: &'r SourceRegistry,
    fetcher: F,
}

impl<'r, F: PageSource> Pipeline<'r, F> {
    pub fn new(registry: &'r SourceRegistry, fetcher: F) -> Self {
        Self { registry, fetcher }
    }

    /// Run one query. `today` is the date used when an article has no
    /// discoverable date of its own.
    ///
    /// Only an unknown category is an error. A failed listing fetch yields an
    /// empty report with [`RunReport::listing_error`] set.
    #[instrument(level = "info", skip_all, fields(category = %query.category, max = query.max_articles))]
    pub async fn run(&self, query: &Query, today: NaiveDate) -> Result<RunReport, ScrapeError> {
        let source = self.registry.resolve(&query.category)?;
        let strategy = source.variant.strategy();
        let mut report = RunReport::default();

        let listing = match self
            .fetcher
            .fetch(source.url.as_str(), PageKind::Listing)
            .await
            .into_body()
        {
            Ok(body) => body,
            Err(e) => {
                error!(url = %source.url, error = %e, "Listing page fetch failed");
                report.listing_error = Some(e);
                return Ok(report);
            }
        };

        let candidates = strategy.discover(&listing, source);
        report.candidates = candidates.len();
        info!(count = candidates.len(), "Discovered candidate links");

        let mut aggregator = Aggregator::new(query.max_articles);
        for candidate in candidates {
            if aggregator.is_full() {
                debug!("Article cap reached; stopping");
                break;
            }
            if !aggregator.claim(&candidate.url) {
                report.skip(SkipReason::Duplicate);
                continue;
            }

            let outcome = self
                .process_candidate(source, &candidate, &query.range, today)
                .await
                .and_then(|article| aggregator.push(article));
            if let Err(reason) = outcome {
                debug!(url = %candidate.url, %reason, "Skipped candidate");
                report.skip(reason);
            }
        }

        report.articles = aggregator.into_articles();
        info!(
            accepted = report.articles.len(),
            candidates = report.candidates,
            skipped = ?report.skipped,
            "Run complete"
        );
        Ok(report)
    }

    async fn process_candidate(
        &self,
        source: &Source,
        candidate: &CandidateLink,
        range: &DateRange,
        today: NaiveDate,
    ) -> Result<ExtractedArticle, SkipReason> {
        let body = self
            .fetcher
            .fetch(&candidate.url, PageKind::Article(source.variant))
            .await
            .into_body()
            .map_err(|e| {
                warn!(url = %candidate.url, error = %e, "Article fetch failed");
                SkipReason::FetchFailed
            })?;
        build_article(source, &candidate.url, &body, range, today)
    }
}

/// Extract, date and filter one fetched article page.
pub fn build_article(
    source: &Source,
    url: &str,
    markup: &str,
    range: &DateRange,
    today: NaiveDate,
) -> Result<ExtractedArticle, SkipReason> {
    let strategy = source.variant.strategy();
    let document = Html::parse_document(markup);
    let fields = strategy.extract(&document);
    let resolved = strategy.resolve_date(&document, url, today);
    if resolved.source == DateSource::Today {
        debug!(%url, "Using today's date for article");
    }

    if !range.accept(resolved.date) {
        return Err(SkipReason::OutOfRange);
    }
    let headline = fields.headline.ok_or(SkipReason::MissingHeadline)?;
    let summary = fields.summary.ok_or(SkipReason::MissingSummary)?;
    debug!(
        %url,
        date = %resolved.date,
        date_source = ?resolved.source,
        headline = %truncate_for_log(&headline, 80),
        "Extracted article"
    );

    Ok(ExtractedArticle::new(
        headline,
        summary,
        url,
        resolved.date,
        strategy.label(),
        strategy.truncates_summary(),
    ))
}

/// Simple entry point: the article list, or the category error.
///
/// A failed listing fetch is indistinguishable from "nothing matched" here;
/// use [`Pipeline::run`] when the difference matters.
pub async fn get_articles<F: PageSource>(
    registry: &SourceRegistry,
    fetcher: F,
    category: &str,
    max_articles: usize,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Vec<ExtractedArticle>, ScrapeError> {
    let query = Query::new(category)
        .with_max_articles(max_articles)
        .with_range(DateRange::new(start_date, end_date));
    let report = Pipeline::new(registry, fetcher).run(&query, today).await?;
    Ok(report.articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchOutcome, Variant};
    use crate::registry::CategoryEntry;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const LISTING_URL: &str = "https://www.aljazeera.com/asia/";

    /// Serves canned pages and records every requested URL.
    #[derive(Default)]
    struct StubPages {
        pages: HashMap<String, FetchOutcome>,
        requested: RefCell<Vec<String>>,
    }

    impl StubPages {
        fn page(mut self, url: &str, outcome: FetchOutcome) -> Self {
            self.pages.insert(url.to_string(), outcome);
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.borrow().clone()
        }
    }

    impl PageSource for StubPages {
        async fn fetch(&self, url: &str, _kind: PageKind) -> FetchOutcome {
            self.requested.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .unwrap_or(FetchOutcome::HttpError(404))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 4, 22)
    }

    fn registry() -> SourceRegistry {
        SourceRegistry::builtin().unwrap()
    }

    fn story_url(n: u32) -> String {
        format!("https://www.aljazeera.com/news/2025/4/{n}/story-{n}")
    }

    fn listing(count: u32) -> String {
        (1..=count)
            .map(|n| format!(r#"<article><a href="/news/2025/4/{n}/story-{n}">Story {n}</a></article>"#))
            .collect()
    }

    fn article_page(n: u32) -> String {
        format!(
            r#"<html><head><meta name="description" content="Summary of story number {n}."></head>
               <body><h1 class="article__title">Story {n}</h1></body></html>"#
        )
    }

    fn stub_with_articles(count: u32) -> StubPages {
        (1..=count).fold(
            StubPages::default().page(LISTING_URL, FetchOutcome::Success(listing(count))),
            |stub, n| stub.page(&story_url(n), FetchOutcome::Success(article_page(n))),
        )
    }

    #[tokio::test]
    async fn test_unknown_category_is_error_without_fetching() {
        let registry = registry();
        let stub = StubPages::default();
        let err = get_articles(&registry, &stub, "CNN World", 10, None, None, today())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No such category: CNN World");
        assert!(stub.requested().is_empty());
    }

    #[tokio::test]
    async fn test_failed_article_is_skipped_and_order_kept() {
        let registry = registry();
        let stub = stub_with_articles(3).page(&story_url(2), FetchOutcome::HttpError(500));

        let articles = get_articles(&registry, &stub, "AlJazeera Asia", 10, None, None, today())
            .await
            .unwrap();
        let headlines = articles.iter().map(|a| a.headline.as_str()).collect::<Vec<_>>();
        assert_eq!(headlines, vec!["Story 1", "Story 3"]);
        assert_eq!(articles[0].link, story_url(1));
        assert_eq!(articles[0].published_date, date(2025, 4, 1));
        assert_eq!(articles[0].source, "Al Jazeera");
    }

    #[tokio::test]
    async fn test_cap_stops_fetching_after_first_accepted() {
        let registry = registry();
        let stub = stub_with_articles(5);

        let articles = get_articles(&registry, &stub, "AlJazeera Asia", 1, None, None, today())
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].headline, "Story 1");
        assert_eq!(stub.requested(), vec![LISTING_URL.to_string(), story_url(1)]);
    }

    #[tokio::test]
    async fn test_cap_counts_accepted_articles_only() {
        let registry = registry();
        let stub = stub_with_articles(4)
            .page(&story_url(1), FetchOutcome::NetworkError("reset".to_string()))
            .page(&story_url(2), FetchOutcome::Success("<h1>No summary</h1>".to_string()));

        let articles = get_articles(&registry, &stub, "AlJazeera Asia", 2, None, None, today())
            .await
            .unwrap();
        let headlines = articles.iter().map(|a| a.headline.as_str()).collect::<Vec<_>>();
        assert_eq!(headlines, vec!["Story 3", "Story 4"]);
    }

    #[tokio::test]
    async fn test_date_range_filters_articles() {
        let registry = registry();
        let stub = stub_with_articles(5);
        let query = Query::new("AlJazeera Asia")
            .with_range(DateRange::new(Some(date(2025, 4, 2)), Some(date(2025, 4, 4))));

        let report = Pipeline::new(&registry, &stub).run(&query, today()).await.unwrap();
        let dates = report
            .articles
            .iter()
            .map(|a| a.published_date)
            .collect::<Vec<_>>();
        assert_eq!(dates, vec![date(2025, 4, 2), date(2025, 4, 3), date(2025, 4, 4)]);
        assert_eq!(report.skipped[&SkipReason::OutOfRange], 2);
        for article in &report.articles {
            assert!(article.published_date >= date(2025, 4, 2));
            assert!(article.published_date <= date(2025, 4, 4));
        }
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty_not_error() {
        let registry = registry();
        let stub = stub_with_articles(3);

        let articles = get_articles(
            &registry,
            &stub,
            "AlJazeera Asia",
            10,
            Some(date(2025, 4, 10)),
            Some(date(2025, 4, 1)),
            today(),
        )
        .await
        .unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_is_empty_with_error_recorded() {
        let registry = registry();
        let stub = StubPages::default().page(LISTING_URL, FetchOutcome::HttpError(503));

        let report = Pipeline::new(&registry, &stub)
            .run(&Query::new("AlJazeera Asia"), today())
            .await
            .unwrap();
        assert!(report.articles.is_empty());
        assert_eq!(report.listing_error.as_deref(), Some("HTTP status 503"));
        assert_eq!(stub.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_links_are_unique_in_result() {
        let registry = SourceRegistry::from_entries(&[CategoryEntry {
            name: "Hindu National".to_string(),
            url: "https://www.thehindu.com/news/national/".to_string(),
            variant: Variant::Hindu,
            prefix: None,
        }])
        .unwrap();
        let article = "https://www.thehindu.com/news/national/a/article1.ece";
        let listing = r#"
            <a href="/news/national/a/article1.ece">A</a>
            <a href="https://www.thehindu.com/news/national/a/article1.ece">A again</a>"#;
        let page = r#"<h1 class="title">Headline A</h1>
            <div class="article"><p>This paragraph is long enough to be the summary.</p></div>
            <time datetime="2025-04-20T10:00:00+05:30"></time>"#;
        let stub = StubPages::default()
            .page("https://www.thehindu.com/news/national/", FetchOutcome::Success(listing.to_string()))
            .page(article, FetchOutcome::Success(page.to_string()));

        let articles = get_articles(&registry, &stub, "Hindu National", 10, None, None, today())
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].headline, "Headline A");
        assert_eq!(articles[0].published_date, date(2025, 4, 20));
        assert_eq!(stub.requested().iter().filter(|u| *u == article).count(), 1);
    }

    #[test]
    fn test_build_article_prefers_structured_date() {
        let registry = registry();
        let source = registry.resolve("Hindu National").unwrap();
        let page = r#"
            <script type="application/ld+json">{"datePublished":"2025-04-10T09:00:00+05:30"}</script>
            <h1>Headline</h1>
            <div class="dateline">April 18, 2025</div>
            <meta name="description" content="A description of the article.">"#;
        let article = build_article(
            source,
            "https://www.thehindu.com/news/national/x/article2.ece",
            page,
            &DateRange::default(),
            today(),
        )
        .unwrap();
        assert_eq!(article.published_date, date(2025, 4, 10));
        assert_eq!(article.formatted_date, "April 10, 2025");
    }

    #[test]
    fn test_build_article_truncates_hindu_summary() {
        let registry = registry();
        let source = registry.resolve("Hindu Business").unwrap();
        let long = "w".repeat(350);
        let page = format!(r#"<h1>Headline</h1><meta name="description" content="{long}">"#);
        let article = build_article(
            source,
            "https://www.thehindu.com/business/x/article3.ece",
            &page,
            &DateRange::default(),
            today(),
        )
        .unwrap();
        assert_eq!(article.summary, format!("{}...", "w".repeat(300)));
        assert_eq!(article.published_date, today());
    }

    #[test]
    fn test_build_article_keeps_bbc_summary_whole() {
        let registry = registry();
        let source = registry.resolve("BBC Politics").unwrap();
        let long = "z".repeat(350);
        let page = format!(
            r#"<h1>Headline</h1><time datetime="2025-04-15T06:00:00Z"></time><p>{long}</p>"#
        );
        let article = build_article(
            source,
            "https://www.bbc.com/news/articles/c1",
            &page,
            &DateRange::default(),
            today(),
        )
        .unwrap();
        assert_eq!(article.summary.len(), 350);
        assert_eq!(article.source, "BBC News");
    }

    #[test]
    fn test_build_article_missing_fields() {
        let registry = registry();
        let source = registry.resolve("AlJazeera Economy").unwrap();
        let url = "https://www.aljazeera.com/economy/2025/4/15/x";

        let no_headline = build_article(
            source,
            url,
            r#"<meta name="description" content="Summary">"#,
            &DateRange::default(),
            today(),
        );
        assert_eq!(no_headline, Err(SkipReason::MissingHeadline));

        let no_summary = build_article(source, url, "<h1>Title</h1>", &DateRange::default(), today());
        assert_eq!(no_summary, Err(SkipReason::MissingSummary));
    }

    #[tokio::test]
    async fn test_run_against_http_server() {
        use crate::config::HttpSettings;
        use crate::fetch::{FixedPacing, HttpFetcher, Paced};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let listing = r#"<div class="article-card"><a href="/news/2025/4/15/quake">Quake</a></div>
            <div class="article-card"><a href="/news/2025/4/14/gone">Gone</a></div>"#;
        Mock::given(method("GET"))
            .and(path("/asia/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news/2025/4/15/quake"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<h1 class="article__title">Quake hits coast</h1>
                   <div class="wysiwyg"><p>A strong earthquake struck the coastal region overnight.</p></div>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news/2025/4/14/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let registry = SourceRegistry::from_entries(&[CategoryEntry {
            name: "Local Asia".to_string(),
            url: format!("{}/asia/", server.uri()),
            variant: Variant::AlJazeera,
            prefix: None,
        }])
        .unwrap();
        let fetcher = Paced::new(
            HttpFetcher::new(&HttpSettings::default()).unwrap(),
            FixedPacing::none(),
        );

        let report = Pipeline::new(&registry, fetcher)
            .run(&Query::new("Local Asia"), today())
            .await
            .unwrap();
        assert_eq!(report.candidates, 2);
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].headline, "Quake hits coast");
        assert_eq!(report.articles[0].link, format!("{}/news/2025/4/15/quake", server.uri()));
        assert_eq!(report.articles[0].published_date, date(2025, 4, 15));
        assert_eq!(report.skipped[&SkipReason::FetchFailed], 1);
    }

    #[test]
    fn test_aggregator_dedup_and_cap() {
        let article = |n: u32| {
            ExtractedArticle::new(
                format!("H{n}"),
                "S".to_string(),
                &story_url(n),
                date(2025, 4, n),
                "Al Jazeera",
                true,
            )
        };
        let mut aggregator = Aggregator::new(2);
        assert!(aggregator.claim(&story_url(1)));
        assert!(!aggregator.claim(&story_url(1)));

        aggregator.push(article(1)).unwrap();
        assert_eq!(aggregator.push(article(1)), Err(SkipReason::Duplicate));
        aggregator.push(article(2)).unwrap();
        assert!(aggregator.is_full());
        aggregator.push(article(3)).unwrap();
        assert_eq!(aggregator.len(), 2);
    }
}
