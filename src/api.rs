use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::feedback::ScoredFeedback;
use crate::prioritize::{FeedbackFilters, FilterError, PrioritizationService, PriorityStats};
use crate::reply::{suggest_reply, ReplySuggestion, ReplyTemplates};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PrioritizationService>,
    pub templates: Arc<ReplyTemplates>,
}

impl AppState {
    pub fn new(service: PrioritizationService) -> Self {
        Self {
            service: Arc::new(service),
            templates: ReplyTemplates::builtin(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/feedback/prioritized", get(prioritized))
        .route("/feedback/priority-stats", get(priority_stats))
        .route("/feedback/suggest-reply", post(reply_suggestion))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidFilters(#[from] FilterError),
    #[error("feedback store unavailable")]
    Store(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidFilters(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                tracing::error!(target: "api", error = ?e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn prioritized(
    State(state): State<AppState>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Json<Vec<ScoredFeedback>>, ApiError> {
    filters.validate()?;
    let items = state
        .service
        .get_prioritized_feedbacks(&filters, Utc::now())
        .await
        .map_err(ApiError::Store)?;
    Ok(Json(items))
}

async fn priority_stats(
    State(state): State<AppState>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Json<PriorityStats>, ApiError> {
    filters.validate()?;
    let stats = state
        .service
        .get_priority_stats(&filters, Utc::now())
        .await
        .map_err(ApiError::Store)?;
    Ok(Json(stats))
}

#[derive(Deserialize)]
struct ReplyReq {
    text: String,
    #[serde(default)]
    rating: Option<i32>,
}

async fn reply_suggestion(
    State(state): State<AppState>,
    Json(body): Json<ReplyReq>,
) -> Json<ReplySuggestion> {
    let tables = state.service.keywords();
    Json(suggest_reply(&body.text, body.rating, &tables, &state.templates))
}
