use serde::{Deserialize, Serialize};
use time::Date;

use crate::store::models::{iso_date, SprintStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSprintRequest {
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

/// Partial sprint update; only accepted while the sprint is still upcoming.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprintRequest {
    pub name: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub end_date: Option<Date>,
    pub status: Option<SprintStatus>,
}

/// ISO `YYYY-MM-DD` wire form of a date.
#[derive(Debug, Serialize)]
pub struct IsoDate(#[serde(with = "iso_date")] pub Date);

#[derive(Debug, Serialize)]
pub struct StatusCounts {
    pub backlog: usize,
    #[serde(rename = "in progress")]
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSummary {
    pub total_tickets: usize,
    pub status_counts: StatusCounts,
}
