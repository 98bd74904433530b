use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{self, Action};
use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::{Sprint, Story, StoryStatus};

use super::dto::{
    CreateSprintRequest, IsoDate, SprintSummary, StatusCounts, UpdateSprintRequest,
};
use super::{dates, repo};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/sprints",
            get(list_sprints).post(create_sprint),
        )
        .route("/projects/:project_id/sprints/names", get(sprint_names))
        .route("/sprints/:sprint_id", patch(update_sprint))
        .route("/sprints/:sprint_id/dates", get(sprint_dates))
        .route("/sprints/:sprint_id/tickets/:project_id", get(sprint_tickets))
        .route("/sprints/:sprint_id/summary/:project_id", get(sprint_summary))
}

#[instrument(skip(state, _actor))]
pub async fn list_sprints(
    State(state): State<AppState>,
    _actor: Actor,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Sprint>>, ApiError> {
    let db = state.store.read().await;
    let sprints = db
        .sprints
        .iter()
        .filter(|s| s.project_id == project_id)
        .cloned()
        .collect();
    Ok(Json(sprints))
}

#[instrument(skip(state, _actor))]
pub async fn sprint_names(
    State(state): State<AppState>,
    _actor: Actor,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, ApiError> {
    let db = state.store.read().await;
    let names = db
        .sprints
        .iter()
        .filter(|s| s.project_id == project_id)
        .map(|s| s.name.clone())
        .collect();
    Ok(Json(names))
}

#[instrument(skip(state, payload))]
pub async fn create_sprint(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateSprintRequest>,
) -> Result<(StatusCode, Json<Sprint>), ApiError> {
    access::require(actor.role, Action::CreateSprint)?;
    let sprint = repo::create(&state.store, project_id, payload.start_date, payload.end_date).await;
    info!(sprint_id = %sprint.id, name = %sprint.name, "sprint created");
    Ok((StatusCode::CREATED, Json(sprint)))
}

#[instrument(skip(state, payload))]
pub async fn update_sprint(
    State(state): State<AppState>,
    actor: Actor,
    Path(sprint_id): Path<Uuid>,
    Json(payload): Json<UpdateSprintRequest>,
) -> Result<Json<Sprint>, ApiError> {
    access::require(actor.role, Action::EditSprint)?;
    let sprint = repo::update(&state.store, sprint_id, payload).await?;
    info!(sprint_id = %sprint.id, "sprint updated");
    Ok(Json(sprint))
}

/// GET /sprints/:sprint_id/dates. Business days of the sprint's range as ISO
/// date strings.
#[instrument(skip(state, _actor))]
pub async fn sprint_dates(
    State(state): State<AppState>,
    _actor: Actor,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<Vec<IsoDate>>, ApiError> {
    let db = state.store.read().await;
    let sprint = db
        .sprints
        .iter()
        .find(|s| s.id == sprint_id)
        .ok_or_else(|| ApiError::not_found("Sprint"))?;
    let days = dates::business_days(sprint.start_date, sprint.end_date)
        .into_iter()
        .map(IsoDate)
        .collect();
    Ok(Json(days))
}

/// GET /sprints/:name/tickets/:project_id. Stories in the sprint that carry
/// a positive estimate, i.e. the ones the timeline can schedule.
#[instrument(skip(state, _actor))]
pub async fn sprint_tickets(
    State(state): State<AppState>,
    _actor: Actor,
    Path((sprint_name, project_id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let db = state.store.read().await;
    let tickets = db
        .stories
        .iter()
        .filter(|s| {
            s.project_id == project_id
                && s.sprint == sprint_name
                && s.estimated_hours.map_or(false, |h| h > 0)
        })
        .cloned()
        .collect();
    Ok(Json(tickets))
}

/// GET /sprints/:name/summary/:project_id. Ticket count and status breakdown
/// over the stories matching project and sprint name.
#[instrument(skip(state, _actor))]
pub async fn sprint_summary(
    State(state): State<AppState>,
    _actor: Actor,
    Path((sprint_name, project_id)): Path<(String, Uuid)>,
) -> Result<Json<SprintSummary>, ApiError> {
    let db = state.store.read().await;
    let in_sprint: Vec<_> = db
        .stories
        .iter()
        .filter(|s| s.project_id == project_id && s.sprint == sprint_name)
        .collect();

    let count = |status: StoryStatus| in_sprint.iter().filter(|s| s.status == status).count();
    Ok(Json(SprintSummary {
        total_tickets: in_sprint.len(),
        status_counts: StatusCounts {
            backlog: count(StoryStatus::Backlog),
            in_progress: count(StoryStatus::InProgress),
            done: count(StoryStatus::Done),
        },
    }))
}
