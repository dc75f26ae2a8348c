/// TMDb movie search provider
///
/// Uses `/search/movie` and hands back the first hit in provider order.
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{TmdbMovie, TmdbSearchResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Builds a provider when a TMDb key is configured
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        let Some(api_key) = config.tmdb_key() else {
            return Ok(None);
        };

        Self::new(
            api_key.to_string(),
            config.tmdb_api_url.clone(),
            Duration::from_secs(config.metadata_timeout_secs),
        )
        .map(Some)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movie(&self, query: &str) -> AppResult<Option<TmdbMovie>> {
        let url = format!("{}/search/movie", self.api_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;

        tracing::debug!(
            query = %query,
            results = search.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(search.results.into_iter().next())
    }
}
