use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::models::{User, UserStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub project_id: Uuid,
    /// Display role label for the membership ("Developer", "QA", ...).
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// User joined with their (first) project membership for the admin list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithProject {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_role: Option<String>,
}
