use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{self, Action};
use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::SprintAssignment;

use super::dto::UpsertAssignmentRequest;
use super::repo::{self, SlotKey};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/sprints/:sprint_id/assignments",
        get(list_assignments).post(upsert_assignment),
    )
}

#[instrument(skip(state, _actor))]
pub async fn list_assignments(
    State(state): State<AppState>,
    _actor: Actor,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<Vec<SprintAssignment>>, ApiError> {
    Ok(Json(repo::list_for_sprint(&state.store, sprint_id).await))
}

/// POST /sprints/:sprint_id/assignments. Creates or replaces the half-day
/// slot addressed by (sprint, user, date, period).
#[instrument(skip(state, payload))]
pub async fn upsert_assignment(
    State(state): State<AppState>,
    actor: Actor,
    Path(sprint_id): Path<Uuid>,
    Json(payload): Json<UpsertAssignmentRequest>,
) -> Result<Json<SprintAssignment>, ApiError> {
    access::require(actor.role, Action::UpsertAssignment)?;

    let content = payload.content()?;
    let key = SlotKey {
        sprint_id,
        user_id: payload.user_id,
        date: payload.date,
        period: payload.period,
    };
    let assignment = repo::upsert(&state.store, key, content).await?;
    info!(
        assignment_id = %assignment.id,
        sprint_id = %sprint_id,
        user_id = %payload.user_id,
        "assignment upserted"
    );
    Ok(Json(assignment))
}
