/// External service abstractions
///
/// Recommendation text comes from a chat-completion service and movie metadata from a
/// title search service. Both sit behind traits so the pipeline can run against any
/// backend, including in-memory fakes in tests.
use crate::{error::AppResult, models::TmdbMovie};

pub mod openai;
pub mod tmdb;

pub use openai::OpenAiGenerator;
pub use tmdb::TmdbProvider;

/// Trait for text-generation backends
///
/// Each call is stateless: one system instruction and one user message in, one reply out.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for the given instructions
    async fn generate(&self, system: &str, user: &str) -> AppResult<String>;
}

/// Trait for movie metadata backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search movies by title and return the provider's top hit, if any
    async fn search_movie(&self, query: &str) -> AppResult<Option<TmdbMovie>>;
}
