use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{RenderRecord, SessionState},
    services::Orchestrator,
};

use super::views::{render_page, PageView};
use super::{AppState, SessionSlot};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct FindForm {
    pub query: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct MoreForm {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct MoreRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub session_id: Uuid,
    pub query: String,
    pub movies: Vec<RenderRecord>,
    pub warnings: Vec<String>,
}

impl RecommendationResponse {
    fn new(session_id: Uuid, slot: &SessionSlot) -> Self {
        Self {
            session_id,
            query: slot.state.current_query.clone(),
            movies: slot.results.records.clone(),
            warnings: slot.results.warnings.clone(),
        }
    }
}

/// Renders `next` and stores it, together with its results, in the slot
async fn render_into(orchestrator: &Orchestrator, slot: &mut SessionSlot, next: SessionState) {
    let (state, results) = orchestrator.render(next).await;
    slot.state = state;
    slot.results = results;
}

fn page_response(page: PageView, status: StatusCode) -> Response {
    match render_page(&page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Page rendering failed");
            e.into_response()
        }
    }
}

/// Validation problems are shown as a notice, anything else as an error
fn failure_page(page: PageView, error: AppError) -> Response {
    match error {
        AppError::InvalidInput(_) => {
            page_response(page.with_notice(error.user_message()), StatusCode::OK)
        }
        _ => {
            let status = error.status_code();
            page_response(page.with_error(error.user_message()), status)
        }
    }
}

/// Applies a trigger's outcome to an existing session.
///
/// On failure the slot is left as it was and its last results are shown again as stored.
async fn respond_with_page(
    state: &AppState,
    session_id: Uuid,
    slot: &mut SessionSlot,
    outcome: AppResult<SessionState>,
) -> Response {
    match outcome {
        Ok(next) => {
            render_into(&state.orchestrator, slot, next).await;
            page_response(
                PageView::new(session_id, &slot.state, &slot.results),
                StatusCode::OK,
            )
        }
        Err(e) => failure_page(PageView::new(session_id, &slot.state, &slot.results), e),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Empty search page
pub async fn index() -> Response {
    page_response(PageView::default(), StatusCode::OK)
}

/// "Find Movies": start a new recommendation cycle
pub async fn find(State(state): State<AppState>, Form(form): Form<FindForm>) -> Response {
    if let Some((session_id, handle)) = state.sessions.lookup(form.session_id).await {
        let mut slot = handle.lock().await;
        let outcome = state.orchestrator.submit(&slot.state, &form.query).await;
        return respond_with_page(&state, session_id, &mut slot, outcome).await;
    }

    // No session yet: one is only registered once the first request succeeds
    let mut slot = SessionSlot::default();
    match state.orchestrator.submit(&slot.state, &form.query).await {
        Ok(next) => {
            render_into(&state.orchestrator, &mut slot, next).await;
            let session_id = Uuid::new_v4();
            let page = PageView::new(session_id, &slot.state, &slot.results);
            state.sessions.insert(session_id, slot).await;
            page_response(page, StatusCode::OK)
        }
        Err(e) => {
            let page = PageView {
                query: form.query,
                ..Default::default()
            };
            failure_page(page, e)
        }
    }
}

/// "Next Suggestions": more recommendations excluding those already shown
pub async fn more(State(state): State<AppState>, Form(form): Form<MoreForm>) -> Response {
    let handle = match state.sessions.get(form.session_id).await {
        Ok(handle) => handle,
        Err(e) => {
            let status = e.status_code();
            return page_response(PageView::default().with_error(e.user_message()), status);
        }
    };
    let mut slot = handle.lock().await;

    let outcome = state.orchestrator.request_more(&slot.state).await;
    respond_with_page(&state, form.session_id, &mut slot, outcome).await
}

/// JSON: start a new recommendation cycle
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if let Some((session_id, handle)) = state.sessions.lookup(request.session_id).await {
        let mut slot = handle.lock().await;
        tracing::info!(session_id = %session_id, "Processing recommendation request");

        let next = state.orchestrator.submit(&slot.state, &request.query).await?;
        render_into(&state.orchestrator, &mut slot, next).await;
        return Ok(Json(RecommendationResponse::new(session_id, &slot)));
    }

    tracing::info!("Processing recommendation request for a new session");

    let mut slot = SessionSlot::default();
    let next = state.orchestrator.submit(&slot.state, &request.query).await?;
    render_into(&state.orchestrator, &mut slot, next).await;

    let session_id = Uuid::new_v4();
    let response = RecommendationResponse::new(session_id, &slot);
    state.sessions.insert(session_id, slot).await;

    Ok(Json(response))
}

/// JSON: more recommendations for an existing session
pub async fn recommend_more(
    State(state): State<AppState>,
    Json(request): Json<MoreRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let handle = state.sessions.get(request.session_id).await?;
    let mut slot = handle.lock().await;

    tracing::info!(session_id = %request.session_id, "Processing next-suggestions request");

    let next = state.orchestrator.request_more(&slot.state).await?;
    render_into(&state.orchestrator, &mut slot, next).await;

    Ok(Json(RecommendationResponse::new(request.session_id, &slot)))
}
