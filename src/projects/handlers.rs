use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{self, Action};
use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::Project;

use super::dto::CreateProjectRequest;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/project/:id", get(get_project))
        .route("/projects", get(list_projects))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/projects", post(create_project))
}

#[instrument(skip(state, _actor))]
pub async fn get_project(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let db = state.store.read().await;
    let project = db
        .projects
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(Json(project))
}

#[instrument(skip(state, _actor))]
pub async fn list_projects(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<Project>>, ApiError> {
    let db = state.store.read().await;
    Ok(Json(db.projects.clone()))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    access::require(actor.role, Action::CreateProject)?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("Project name is required".into()))?;

    let project = Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: OffsetDateTime::now_utc(),
        created_by: actor.id,
    };

    let mut db = state.store.write().await;
    db.projects.push(project.clone());
    info!(project_id = %project.id, name = %project.name, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}
