use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{
    models::{ResolvedMovie, TmdbMovie},
    services::providers::MetadataProvider,
};

/// `(YYYY)` annotations with surrounding whitespace
static YEAR_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*").expect("valid year regex"));

/// Outcome of a single lookup. Lookups never fail; problems become a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub movie: ResolvedMovie,
    pub warning: Option<String>,
}

impl Resolution {
    fn resolved(movie: ResolvedMovie) -> Self {
        Self {
            movie,
            warning: None,
        }
    }

    fn degraded(title: &str) -> Self {
        Self {
            movie: ResolvedMovie::unresolved(title),
            warning: Some(format!("Could not fetch info for: {}", title)),
        }
    }
}

/// Maps loosely formatted titles to canonical title, year and poster
#[derive(Clone)]
pub struct MetadataResolver {
    /// `None` when no metadata credential is configured
    provider: Option<Arc<dyn MetadataProvider>>,
    image_base_url: String,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            image_base_url: image_base_url.into(),
        }
    }

    /// A resolver that passes titles through untouched
    pub fn disabled() -> Self {
        Self {
            provider: None,
            image_base_url: String::new(),
        }
    }

    /// Looks up one title. Always returns a movie; falls back to the input title.
    pub async fn resolve(&self, title: &str) -> Resolution {
        let Some(provider) = &self.provider else {
            return Resolution::resolved(ResolvedMovie::unresolved(title));
        };

        let query = strip_year(title);

        match provider.search_movie(&query).await {
            Ok(Some(hit)) => Resolution::resolved(self.to_resolved(title, hit)),
            Ok(None) => {
                tracing::debug!(title = %title, "No metadata match");
                Resolution::resolved(ResolvedMovie::unresolved(title))
            }
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "Metadata lookup failed");
                Resolution::degraded(title)
            }
        }
    }

    /// Resolves every title concurrently, returning results in input order
    pub async fn resolve_all(&self, titles: &[String]) -> Vec<Resolution> {
        let tasks: Vec<_> = titles
            .iter()
            .cloned()
            .map(|title| {
                let resolver = self.clone();
                tokio::spawn(async move { resolver.resolve(&title).await })
            })
            .collect();

        let mut resolutions = Vec::with_capacity(tasks.len());
        for (task, title) in tasks.into_iter().zip(titles) {
            match task.await {
                Ok(resolution) => resolutions.push(resolution),
                Err(e) => {
                    tracing::error!(title = %title, error = %e, "Metadata task join error");
                    resolutions.push(Resolution::degraded(title));
                }
            }
        }

        let degraded = resolutions.iter().filter(|r| r.warning.is_some()).count();
        if degraded > 0 {
            tracing::warn!(
                success_count = resolutions.len() - degraded,
                error_count = degraded,
                "Partial metadata lookup failure"
            );
        }

        resolutions
    }

    fn to_resolved(&self, title: &str, hit: TmdbMovie) -> ResolvedMovie {
        let display_title = hit
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| title.to_string());

        let year = hit
            .release_date
            .map(|date| date.chars().take(4).collect())
            .unwrap_or_default();

        let poster_url = hit
            .poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.image_base_url, path));

        ResolvedMovie {
            display_title,
            year,
            poster_url,
        }
    }
}

/// Removes `(YYYY)` annotations so the search matches on the bare title
pub fn strip_year(title: &str) -> String {
    YEAR_ANNOTATION.replace_all(title, " ").trim().to_string()
}
