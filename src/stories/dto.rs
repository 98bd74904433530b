use serde::Deserialize;
use uuid::Uuid;

use crate::store::models::{Priority, StoryStatus, StoryType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: StoryType,
    pub priority: Priority,
    pub assignee_id: Uuid,
    pub sprint: String,
    #[serde(default)]
    pub estimated_hours: Option<u32>,
}

/// Partial story update. Only the fields listed here are patchable; absent
/// fields are left untouched (there is no way to clear an optional field).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<StoryStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Uuid>,
    pub sprint: Option<String>,
    pub estimated_hours: Option<u32>,
}
