//! Runtime settings, optionally loaded from a YAML file.
//!
//! Every field has a default, so a missing file (or a file that sets only a
//! few keys) is fine:
//!
//! ```yaml
//! max_articles: 5
//! pacing:
//!   listing_delay_ms: 1000
//!   hindu_article_delay_ms: 2500
//! categories:
//!   - name: BBC Science
//!     url: https://www.bbc.com/news/science_and_environment
//!     variant: bbc
//! ```

use crate::error::ScrapeError;
use crate::models::Variant;
use crate::registry::{CategoryEntry, SourceRegistry};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Top-level settings document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub pacing: PacingSettings,
    /// Default article cap when the CLI does not set one.
    pub max_articles: usize,
    /// Replaces the built-in registry when non-empty.
    pub categories: Vec<CategoryEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http: HttpSettings::default(),
            pacing: PacingSettings::default(),
            max_articles: crate::pipeline::DEFAULT_MAX_ARTICLES,
            categories: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ScrapeError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let settings = Self::from_yaml(&text)?;
                info!(path, categories = settings.categories.len(), "Loaded settings");
                Ok(settings)
            }
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, ScrapeError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// The registry these settings describe.
    pub fn registry(&self) -> Result<SourceRegistry, ScrapeError> {
        if self.categories.is_empty() {
            SourceRegistry::builtin()
        } else {
            SourceRegistry::from_entries(&self.categories)
        }
    }
}

/// Outbound header profile and client timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
    /// Client-wide timeout; some article fetches use a shorter per-request one.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/100.0.4896.75 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                     image/webp,image/apng,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://www.google.com/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fixed delays imposed after each request, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PacingSettings {
    pub listing_delay_ms: u64,
    pub bbc_article_delay_ms: u64,
    pub hindu_article_delay_ms: u64,
    pub aljazeera_article_delay_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            listing_delay_ms: 1000,
            bbc_article_delay_ms: 1500,
            hindu_article_delay_ms: 2000,
            aljazeera_article_delay_ms: 1500,
        }
    }
}

impl PacingSettings {
    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    pub fn article_delay(&self, variant: Variant) -> Duration {
        let ms = match variant {
            Variant::Bbc => self.bbc_article_delay_ms,
            Variant::Hindu => self.hindu_article_delay_ms,
            Variant::AlJazeera => self.aljazeera_article_delay_ms,
        };
        Duration::from_millis(ms)
    }
}
