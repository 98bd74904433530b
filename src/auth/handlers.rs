use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::UserStatus;

use super::dto::{LoginRequest, LoginResponse, PublicUser};
use super::jwt::JwtKeys;
use super::password::verify_password;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login. Only active accounts may log in; the issued token
/// carries the actor's role and home project for the authorization gate.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let db = state.store.read().await;
    let user = db
        .users
        .iter()
        .find(|u| u.email == payload.email && u.status == UserStatus::Active)
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let project_id = db
        .memberships
        .iter()
        .find(|m| m.user_id == user.id)
        .map(|m| m.project_id);

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email, user.role, project_id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            project_id,
        },
    }))
}
