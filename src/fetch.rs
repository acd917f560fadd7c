//! HTTP fetching with a fixed header profile and fixed pacing.
//!
//! # Architecture
//!
//! - [`PageSource`]: core trait, "give me the markup behind this URL"
//! - [`HttpFetcher`]: `reqwest`-backed implementation with the browser-like
//!   header profile from [`HttpSettings`]
//! - [`Paced`]: decorator that sleeps after every request according to a
//!   [`PacingPolicy`], whatever the outcome
//!
//! Nothing here retries. A failed request is reported once as a
//! [`FetchOutcome`] and the caller decides what to skip.

use crate::config::{HttpSettings, PacingSettings};
use crate::error::ScrapeError;
use crate::models::{FetchOutcome, Variant};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// What kind of page a request is for. Pacing and timeouts depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Listing,
    Article(Variant),
}

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    async fn fetch(&self, url: &str, kind: PageKind) -> FetchOutcome;
}

impl<T: PageSource> PageSource for &T {
    async fn fetch(&self, url: &str, kind: PageKind) -> FetchOutcome {
        (**self).fetch(url, kind).await
    }
}

/// `reqwest` client preloaded with the outbound header profile.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&settings.user_agent, "user-agent")?);
        headers.insert(ACCEPT, header_value(&settings.accept, "accept")?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value(&settings.accept_language, "accept-language")?,
        );
        headers.insert(REFERER, header_value(&settings.referer, "referer")?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value).map_err(|_| ScrapeError::InvalidHeader(name))
}

impl PageSource for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url, ?kind))]
    async fn fetch(&self, url: &str, kind: PageKind) -> FetchOutcome {
        let mut request = self.client.get(url);
        if let PageKind::Article(variant) = kind {
            if let Some(timeout) = variant.strategy().article_timeout() {
                request = request.timeout(timeout);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Request failed");
                return FetchOutcome::NetworkError(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success status");
            return FetchOutcome::HttpError(status.as_u16());
        }

        match response.text().await {
            Ok(body) => {
                debug!(%url, bytes = body.len(), "Fetched page");
                FetchOutcome::Success(body)
            }
            Err(e) => {
                warn!(%url, error = %e, "Failed reading response body");
                FetchOutcome::NetworkError(e.to_string())
            }
        }
    }
}

/// Decides how long to wait after a request of a given kind.
pub trait PacingPolicy {
    fn delay_after(&self, kind: PageKind) -> Duration;
}

/// Unconditional fixed delays: one for listing pages, one per variant for
/// article pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPacing {
    settings: PacingSettings,
}

impl FixedPacing {
    pub fn new(settings: PacingSettings) -> Self {
        Self { settings }
    }

    /// No delays at all.
    pub fn none() -> Self {
        Self::new(PacingSettings {
            listing_delay_ms: 0,
            bbc_article_delay_ms: 0,
            hindu_article_delay_ms: 0,
            aljazeera_article_delay_ms: 0,
        })
    }
}

impl Default for FixedPacing {
    fn default() -> Self {
        Self::new(PacingSettings::default())
    }
}

impl PacingPolicy for FixedPacing {
    fn delay_after(&self, kind: PageKind) -> Duration {
        match kind {
            PageKind::Listing => self.settings.listing_delay(),
            PageKind::Article(variant) => self.settings.article_delay(variant),
        }
    }
}

/// Wraps any [`PageSource`] and pauses after every request.
pub struct Paced<F, P> {
    inner: F,
    policy: P,
}

impl<F, P> Paced<F, P>
where
    F: PageSource,
    P: PacingPolicy,
{
    pub fn new(inner: F, policy: P) -> Self {
        Self { inner, policy }
    }
}

impl<F, P: fmt::Debug> fmt::Debug for Paced<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paced").field("policy", &self.policy).finish()
    }
}

impl<F, P> PageSource for Paced<F, P>
where
    F: PageSource,
    P: PacingPolicy,
{
    async fn fetch(&self, url: &str, kind: PageKind) -> FetchOutcome {
        let outcome = self.inner.fetch(url, kind).await;
        let delay = self.policy.delay_after(kind);
        if !delay.is_zero() {
            debug!(?delay, ?kind, "Pausing before next request");
            sleep(delay).await;
        }
        outcome
    }
}
