//! HTTP API
//!
//! JSON endpoints consumed by the story client. Errors are returned as
//! `{"detail": "..."}` with the status mapped from [`StoryError`].

pub mod routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::StoryError;
use crate::session::EpisodeSessionService;

pub type SharedState = Arc<EpisodeSessionService>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for StoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoryError::NotFound(_) => StatusCode::NOT_FOUND,
            StoryError::NoHearts => StatusCode::BAD_REQUEST,
            StoryError::Io(_) | StoryError::Json(_) => {
                error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/debug/reset_hearts", post(routes::reset_hearts))
        .route("/api/user", get(routes::get_user))
        .route("/api/library", get(routes::get_library))
        .route("/api/story/:story_id/manifest", get(routes::get_manifest))
        .route("/api/story/:story_id/progress", get(routes::get_progress))
        .route("/api/story/:story_id/save", post(routes::save_progress))
        .route("/api/story/:story_id/:episode_id/start", post(routes::start_episode))
        // Health check
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
