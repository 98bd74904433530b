use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::Story;

use super::dto::{CreateStoryRequest, UpdateStoryRequest};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/stories",
            get(list_stories).post(create_story),
        )
        .route("/stories/:id", get(get_story).patch(update_story))
}

#[instrument(skip(state, _actor))]
pub async fn list_stories(
    State(state): State<AppState>,
    _actor: Actor,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let db = state.store.read().await;
    let stories = db
        .stories
        .iter()
        .filter(|s| s.project_id == project_id)
        .cloned()
        .collect();
    Ok(Json(stories))
}

#[instrument(skip(state, _actor))]
pub async fn get_story(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<Story>, ApiError> {
    let db = state.store.read().await;
    let story = db
        .stories
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Story"))?;
    Ok(Json(story))
}

/// POST /projects/:project_id/stories. Any authenticated actor may create;
/// the story starts in backlog with a `created` history entry.
#[instrument(skip(state, payload))]
pub async fn create_story(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<(StatusCode, Json<Story>), ApiError> {
    let story = repo::create(&state.store, project_id, payload, actor.id).await;
    info!(story_id = %story.id, project_id = %project_id, created_by = %actor.email, "story created");
    Ok((StatusCode::CREATED, Json(story)))
}

/// PATCH /stories/:id. Changed fields are recorded in the story history.
#[instrument(skip(state, payload))]
pub async fn update_story(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStoryRequest>,
) -> Result<Json<Story>, ApiError> {
    let story = repo::update(&state.store, &id, payload, actor.id).await?;
    info!(story_id = %story.id, "story updated");
    Ok(Json(story))
}
