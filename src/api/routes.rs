//! API route handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::SharedState;
use crate::error::Result;
use crate::library::{EpisodeData, LibraryEntry, StoryManifest};
use crate::profile::ProfileStatus;
use crate::progress::StateMap;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /api/debug/reset_hearts - full hearts, all progress erased
pub async fn reset_hearts(State(state): State<SharedState>) -> Result<Json<ResetResponse>> {
    state.full_reset().await?;
    Ok(Json(ResetResponse {
        status: "ok",
        message: "Full reset completed",
    }))
}

/// GET /api/user
pub async fn get_user(State(state): State<SharedState>) -> Result<Json<ProfileStatus>> {
    Ok(Json(state.user_status().await?))
}

/// GET /api/library
pub async fn get_library(State(state): State<SharedState>) -> Result<Json<Vec<LibraryEntry>>> {
    let scan = state.library().list_library().await?;
    Ok(Json(scan.entries))
}

/// GET /api/story/:story_id/manifest
pub async fn get_manifest(
    State(state): State<SharedState>,
    Path(story_id): Path<String>,
) -> Result<Json<StoryManifest>> {
    Ok(Json(state.library().get_manifest(&story_id).await?))
}

/// POST /api/story/:story_id/:episode_id/start
pub async fn start_episode(
    State(state): State<SharedState>,
    Path((story_id, episode_id)): Path<(String, String)>,
) -> Result<Json<EpisodeData>> {
    Ok(Json(state.start_episode(&story_id, &episode_id).await?))
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub status: &'static str,
}

/// POST /api/story/:story_id/save - body is a state object merged into saved progress
pub async fn save_progress(
    State(state): State<SharedState>,
    Path(story_id): Path<String>,
    Json(update): Json<StateMap>,
) -> Result<Json<SaveResponse>> {
    state.save_progress(&story_id, update).await?;
    Ok(Json(SaveResponse { status: "saved" }))
}

/// GET /api/story/:story_id/progress
pub async fn get_progress(
    State(state): State<SharedState>,
    Path(story_id): Path<String>,
) -> Result<Json<StateMap>> {
    Ok(Json(state.story_progress(&story_id).await?))
}
