//! Session orchestration: Submit, RequestMore and Render over a [`SessionState`].
//!
//! Each operation takes the current state by reference and hands back the next one, so a
//! failed request leaves the caller's state exactly as it was.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{RenderRecord, SessionState},
    services::{
        metadata::MetadataResolver, parser::parse_recommendations,
        providers::TextGenerator, recommendations::request_recommendations,
    },
};

pub const BLANK_QUERY_MESSAGE: &str = "Please describe what kind of movie you want.";

/// Render output for one result set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsView {
    pub records: Vec<RenderRecord>,
    /// Soft warnings from metadata lookups
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    resolver: MetadataResolver,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, resolver: MetadataResolver) -> Self {
        Self {
            generator,
            resolver,
        }
    }

    /// Starts a fresh recommendation cycle for `query`.
    ///
    /// Blank queries are rejected before any request is made.
    pub async fn submit(&self, state: &SessionState, query: &str) -> AppResult<SessionState> {
        let query = query.trim();
        if query.is_empty() {
            tracing::info!("Rejected blank query");
            return Err(AppError::InvalidInput(BLANK_QUERY_MESSAGE.to_string()));
        }

        tracing::info!(query = %query, previous_seen = state.seen_titles.len(), "Submitting query");

        let text = request_recommendations(self.generator.as_ref(), query, &[]).await?;

        Ok(SessionState {
            last_result: Some(text),
            seen_titles: Default::default(),
            current_query: query.to_string(),
        })
    }

    /// Asks for more recommendations, excluding everything shown so far
    pub async fn request_more(&self, state: &SessionState) -> AppResult<SessionState> {
        if !state.has_results() {
            return Err(AppError::NoResults);
        }

        tracing::info!(
            query = %state.current_query,
            excluded = state.seen_titles.len(),
            "Requesting more recommendations"
        );

        let text = request_recommendations(
            self.generator.as_ref(),
            &state.current_query,
            state.seen_titles.as_slice(),
        )
        .await?;

        Ok(SessionState {
            last_result: Some(text),
            ..state.clone()
        })
    }

    /// Parses and resolves the last result, recording every shown title as seen
    pub async fn render(&self, mut state: SessionState) -> (SessionState, ResultsView) {
        let Some(text) = state.last_result.as_deref() else {
            return (state, ResultsView::default());
        };

        let parsed = parse_recommendations(text);
        let titles: Vec<String> = parsed.iter().map(|p| p.search_title.clone()).collect();
        let resolutions = self.resolver.resolve_all(&titles).await;

        let mut view = ResultsView::default();
        for (movie, resolution) in parsed.iter().zip(resolutions) {
            state.seen_titles.insert(&resolution.movie.display_title);
            if let Some(warning) = resolution.warning {
                view.warnings.push(warning);
            }
            view.records.push(RenderRecord::new(resolution.movie, movie));
        }

        tracing::info!(
            records = view.records.len(),
            seen = state.seen_titles.len(),
            warnings = view.warnings.len(),
            "Rendered recommendations"
        );

        (state, view)
    }
}
