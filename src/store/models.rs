use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Application-level role driving the authorization gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectManager,
    TechLead,
    Personnel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by: Uuid,
}

/// Join record linking a user to a project, with a free-form display role
/// label ("Tech Lead", "Developer", ...). One per (user, project) expected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub role: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    Upcoming,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub status: SprintStatus,
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoryStatus {
    #[serde(rename = "backlog")]
    Backlog,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in progress",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Story,
    Bug,
}

impl StoryType {
    /// Prefix used for human-facing story IDs ("STORY-001", "BUG-002").
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Story => "STORY",
            Self::Bug => "BUG",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Story => "Story",
            Self::Bug => "Bug",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    StatusChanged,
    Assigned,
    Moved,
}

/// One immutable audit record on a story. Never mutated or removed once
/// appended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub action: HistoryAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub uploaded_by: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: StoryStatus,
    pub assignee_id: Uuid,
    pub project_id: Uuid,
    /// Sprint display name, not an id reference.
    pub sprint: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: StoryType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<u32>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
}

/// What occupies a half-day timeline slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotKind {
    #[serde(rename = "ticket")]
    Ticket,
    #[serde(rename = "VL")]
    VacationLeave,
    #[serde(rename = "SL")]
    SickLeave,
    #[serde(rename = "unset")]
    Unset,
}

/// Validated content for one slot, produced from the upsert request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Ticket(String),
    VacationLeave,
    SickLeave,
    Unset,
}

impl SlotContent {
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Ticket(_) => SlotKind::Ticket,
            Self::VacationLeave => SlotKind::VacationLeave,
            Self::SickLeave => SlotKind::SickLeave,
            Self::Unset => SlotKind::Unset,
        }
    }

    pub fn ticket_id(&self) -> Option<String> {
        match self {
            Self::Ticket(id) => Some(id.clone()),
            _ => None,
        }
    }
}

/// One half-day slot in a sprint timeline. At most one row exists per
/// (sprint_id, user_id, date, period); the upsert engine enforces this.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintAssignment {
    pub id: Uuid,
    pub sprint_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub period: Period,
    #[serde(rename = "type")]
    pub kind: SlotKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub project_id: Uuid,
}
