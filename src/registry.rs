//! The category registry: category name → listing page and variant.
//!
//! The registry is built once at startup (from the built-in table or from the
//! settings file) and passed to the pipeline by reference.

use crate::error::ScrapeError;
use crate::models::{Source, Variant};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One registry row as it appears in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub url: String,
    pub variant: Variant,
    /// Overrides the anchor path prefix used by the BBC discoverer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

const BUILTIN: [(&str, &str, Variant); 15] = [
    ("BBC Politics", "https://www.bbc.com/news/politics", Variant::Bbc),
    ("BBC Finance", "https://www.bbc.com/news/business", Variant::Bbc),
    (
        "BBC Entertainment",
        "https://www.bbc.com/news/entertainment_and_arts",
        Variant::Bbc,
    ),
    ("BBC Sports", "https://www.bbc.com/sport", Variant::Bbc),
    ("BBC India", "https://www.bbc.com/news/world/asia/india", Variant::Bbc),
    ("Hindu National", "https://www.thehindu.com/news/national/", Variant::Hindu),
    ("Hindu Business", "https://www.thehindu.com/business/", Variant::Hindu),
    ("Hindu Sport", "https://www.thehindu.com/sport/", Variant::Hindu),
    ("Hindu Entertainment", "https://www.thehindu.com/entertainment/", Variant::Hindu),
    ("Hindu Science", "https://www.thehindu.com/sci-tech/science/", Variant::Hindu),
    ("AlJazeera Middle East", "https://www.aljazeera.com/middle-east/", Variant::AlJazeera),
    ("AlJazeera Asia", "https://www.aljazeera.com/asia/", Variant::AlJazeera),
    ("AlJazeera Economy", "https://www.aljazeera.com/economy/", Variant::AlJazeera),
    ("AlJazeera Sports", "https://www.aljazeera.com/sports/", Variant::AlJazeera),
    ("AlJazeera Features", "https://www.aljazeera.com/features/", Variant::AlJazeera),
];

/// The built-in 15-entry table (3 publishers × 5 categories).
pub fn builtin_entries() -> Vec<CategoryEntry> {
    BUILTIN
        .iter()
        .map(|(name, url, variant)| CategoryEntry {
            name: name.to_string(),
            url: url.to_string(),
            variant: *variant,
            prefix: None,
        })
        .collect()
}

/// Immutable lookup table of [`Source`]s, in registration order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Registry over the built-in table.
    pub fn builtin() -> Result<Self, ScrapeError> {
        Self::from_entries(&builtin_entries())
    }

    /// Registry over arbitrary entries. Fails on the first unparsable URL.
    pub fn from_entries(entries: &[CategoryEntry]) -> Result<Self, ScrapeError> {
        let sources = entries
            .iter()
            .map(|entry| {
                Source::new(&entry.name, &entry.url, entry.variant, entry.prefix.as_deref())
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = sources.len(), "Built source registry");
        Ok(Self { sources })
    }

    /// Exact-match lookup by category name.
    pub fn resolve(&self, category: &str) -> Result<&Source, ScrapeError> {
        self.sources
            .iter()
            .find(|source| source.name == category)
            .ok_or_else(|| ScrapeError::CategoryNotFound(category.to_string()))
    }

    /// Category names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|source| source.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_builtin_has_five_categories_per_publisher() {
        let registry = SourceRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 15);

        let counts = registry
            .sources
            .iter()
            .map(|source| source.variant)
            .counts();
        assert_eq!(counts[&Variant::Bbc], 5);
        assert_eq!(counts[&Variant::Hindu], 5);
        assert_eq!(counts[&Variant::AlJazeera], 5);
    }

    #[test]
    fn test_resolve_exact_match() {
        let registry = SourceRegistry::builtin().unwrap();
        let source = registry.resolve("Hindu Science").unwrap();
        assert_eq!(source.url.as_str(), "https://www.thehindu.com/sci-tech/science/");
        assert_eq!(source.variant, Variant::Hindu);
        assert_eq!(source.origin, "https://www.thehindu.com");
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = SourceRegistry::builtin().unwrap();
        let err = registry.resolve("hindu science").unwrap_err();
        assert!(matches!(err, ScrapeError::CategoryNotFound(ref name) if name == "hindu science"));
    }

    #[test]
    fn test_bbc_sports_uses_sport_prefix() {
        let registry = SourceRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("BBC Sports").unwrap().link_prefix, "/sport");
        assert_eq!(registry.resolve("BBC India").unwrap().link_prefix, "/news");
    }

    #[test]
    fn test_names_preserve_order() {
        let registry = SourceRegistry::builtin().unwrap();
        let names = registry.names().collect::<Vec<_>>();
        assert_eq!(names.first(), Some(&"BBC Politics"));
        assert_eq!(names.last(), Some(&"AlJazeera Features"));
    }

    #[test]
    fn test_from_entries_with_prefix_override() {
        let entries = vec![CategoryEntry {
            name: "Custom".to_string(),
            url: "https://www.bbc.com/news/science_and_environment".to_string(),
            variant: Variant::Bbc,
            prefix: Some("/news/science".to_string()),
        }];
        let registry = SourceRegistry::from_entries(&entries).unwrap();
        assert_eq!(registry.resolve("Custom").unwrap().link_prefix, "/news/science");
    }
}
