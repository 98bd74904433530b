use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::access::{self, Action};
use crate::auth::handlers::is_valid_email;
use crate::auth::password::hash_password;
use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::{AppState, DEFAULT_PASSWORD};
use crate::store::models::{Membership, Role, User, UserStatus};

use super::dto::{CreateUserRequest, UpdateStatusRequest, UserWithProject};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id/status", patch(update_status))
        .route("/user/:id/projects", get(user_membership))
        .route("/projects/:project_id/users", get(project_users))
}

/// GET /users. Admin view: every user joined with their project membership.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<UserWithProject>>, ApiError> {
    access::require(actor.role, Action::ListUsers)?;

    let db = state.store.read().await;
    let users = db
        .users
        .iter()
        .map(|user| {
            let membership = db.memberships.iter().find(|m| m.user_id == user.id);
            let project = membership
                .and_then(|m| db.projects.iter().find(|p| p.id == m.project_id));
            UserWithProject {
                user: user.clone(),
                project_name: project.map(|p| p.name.clone()),
                project_role: membership.map(|m| m.role.clone()),
            }
        })
        .collect();
    Ok(Json(users))
}

/// POST /users. Creates a personnel account with the default password and a
/// membership in the given project. Duplicate check and insert run under one
/// write guard.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    access::require(actor.role, Action::CreateUser)?;

    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let password_hash = hash_password(DEFAULT_PASSWORD)?;

    let mut db = state.store.write().await;

    if let Some(existing) = db.users.iter().find(|u| u.email == email) {
        let already_member = db
            .memberships
            .iter()
            .any(|m| m.user_id == existing.id && m.project_id == payload.project_id);
        if already_member {
            return Err(ApiError::Validation(
                "User already exists in this project".into(),
            ));
        }
    }

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        email,
        password_hash,
        role: Role::Personnel,
        status: UserStatus::Active,
    };
    db.users.push(user.clone());
    db.memberships.push(Membership {
        user_id: user.id,
        project_id: payload.project_id,
        role: payload.role,
    });

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /user/:id/projects. The membership record for one user.
#[instrument(skip(state))]
pub async fn user_membership(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Membership>, ApiError> {
    access::require(actor.role, Action::ViewMembership)?;

    let db = state.store.read().await;
    let membership = db
        .memberships
        .iter()
        .find(|m| m.user_id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("User has no project".into()))?;
    Ok(Json(membership))
}

/// GET /projects/:project_id/users. Active members of a project; any
/// authenticated actor may read this (the timeline grid needs it).
#[instrument(skip(state, _actor))]
pub async fn project_users(
    State(state): State<AppState>,
    _actor: Actor,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<User>>, ApiError> {
    let db = state.store.read().await;
    let members = db
        .users
        .iter()
        .filter(|u| {
            u.status == UserStatus::Active
                && db
                    .memberships
                    .iter()
                    .any(|m| m.project_id == project_id && m.user_id == u.id)
        })
        .cloned()
        .collect();
    Ok(Json(members))
}

/// PATCH /users/:id/status. Accounts are deactivated, never deleted.
#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<User>, ApiError> {
    access::require(actor.role, Action::ChangeUserStatus)?;

    let mut db = state.store.write().await;
    let user = db
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| ApiError::not_found("User"))?;
    user.status = payload.status;
    info!(user_id = %user.id, status = ?user.status, "user status changed");
    Ok(Json(user.clone()))
}
