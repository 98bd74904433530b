use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::{iso_date, Period, SlotContent, SlotKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAssignmentRequest {
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub period: Period,
    #[serde(rename = "type")]
    pub kind: SlotKind,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

impl UpsertAssignmentRequest {
    /// Validates the tagged content: a ticket slot needs a ticket id, leave
    /// and unset slots carry none.
    pub fn content(&self) -> Result<SlotContent, ApiError> {
        match self.kind {
            SlotKind::Ticket => {
                let ticket_id = self
                    .ticket_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        ApiError::Validation("ticketId is required for ticket assignments".into())
                    })?;
                Ok(SlotContent::Ticket(ticket_id.to_string()))
            }
            SlotKind::VacationLeave => Ok(SlotContent::VacationLeave),
            SlotKind::SickLeave => Ok(SlotContent::SickLeave),
            SlotKind::Unset => Ok(SlotContent::Unset),
        }
    }
}
