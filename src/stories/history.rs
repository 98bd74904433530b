//! Story change tracking. Every accepted partial update is diffed against the
//! current record and each changed field yields one immutable history entry;
//! entries within one update share a single timestamp.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::models::{HistoryAction, HistoryEntry, Story, StoryType};

use super::dto::UpdateStoryRequest;

/// One entry per submitted field whose value differs from the current one,
/// in field-declaration order. `status` changes are tagged `status_changed`,
/// everything else `updated`. Wire-level field names appear in the entries so
/// the audit trail matches what clients sent.
pub fn diff(
    story: &Story,
    update: &UpdateStoryRequest,
    actor_id: Uuid,
    actor_name: &str,
    timestamp: OffsetDateTime,
) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();

    let mut push = |field: &str, old: String, new: String| {
        let action = if field == "status" {
            HistoryAction::StatusChanged
        } else {
            HistoryAction::Updated
        };
        entries.push(HistoryEntry {
            id: Uuid::new_v4(),
            action,
            field: Some(field.to_string()),
            old_value: Some(old.clone()),
            new_value: Some(new.clone()),
            user_id: actor_id,
            timestamp,
            description: format!("{field} changed from {old} to {new} by {actor_name}"),
        });
    };

    if let Some(title) = &update.title {
        if *title != story.title {
            push("title", story.title.clone(), title.clone());
        }
    }
    if let Some(description) = &update.description {
        if Some(description) != story.description.as_ref() {
            push(
                "description",
                story.description.clone().unwrap_or_default(),
                description.clone(),
            );
        }
    }
    if let Some(status) = update.status {
        if status != story.status {
            push(
                "status",
                story.status.as_str().to_string(),
                status.as_str().to_string(),
            );
        }
    }
    if let Some(priority) = update.priority {
        if priority != story.priority {
            push(
                "priority",
                story.priority.as_str().to_string(),
                priority.as_str().to_string(),
            );
        }
    }
    if let Some(assignee_id) = update.assignee_id {
        if assignee_id != story.assignee_id {
            push(
                "assigneeId",
                story.assignee_id.to_string(),
                assignee_id.to_string(),
            );
        }
    }
    if let Some(sprint) = &update.sprint {
        if *sprint != story.sprint {
            push("sprint", story.sprint.clone(), sprint.clone());
        }
    }
    if let Some(hours) = update.estimated_hours {
        if Some(hours) != story.estimated_hours {
            push(
                "estimatedHours",
                story
                    .estimated_hours
                    .map(|h| h.to_string())
                    .unwrap_or_default(),
                hours.to_string(),
            );
        }
    }

    entries
}

/// Applies the submitted fields to the story. The diff must be taken before
/// this runs.
pub fn apply(story: &mut Story, update: UpdateStoryRequest) {
    if let Some(title) = update.title {
        story.title = title;
    }
    if let Some(description) = update.description {
        story.description = Some(description);
    }
    if let Some(status) = update.status {
        story.status = status;
    }
    if let Some(priority) = update.priority {
        story.priority = priority;
    }
    if let Some(assignee_id) = update.assignee_id {
        story.assignee_id = assignee_id;
    }
    if let Some(sprint) = update.sprint {
        story.sprint = sprint;
    }
    if let Some(hours) = update.estimated_hours {
        story.estimated_hours = Some(hours);
    }
}

pub fn creation_entry(
    kind: StoryType,
    actor_id: Uuid,
    actor_name: &str,
    timestamp: OffsetDateTime,
) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4(),
        action: HistoryAction::Created,
        field: None,
        old_value: None,
        new_value: None,
        user_id: actor_id,
        timestamp,
        description: format!("{} created by {actor_name}", kind.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{Priority, StoryStatus};
    use time::macros::datetime;

    fn sample_story() -> Story {
        Story {
            id: "STORY-001".into(),
            title: "Checkout flow".into(),
            description: Some("Initial description".into()),
            status: StoryStatus::Backlog,
            assignee_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            sprint: "Sprint 1".into(),
            priority: Priority::Medium,
            kind: StoryType::Story,
            created_at: datetime!(2024-01-15 10:00:00 UTC),
            created_by: Uuid::new_v4(),
            estimated_hours: Some(8),
            attachments: Vec::new(),
            comments: Vec::new(),
            history: Vec::new(),
        }
    }

    #[test]
    fn status_change_yields_one_status_changed_entry() {
        let story = sample_story();
        let update = UpdateStoryRequest {
            status: Some(StoryStatus::InProgress),
            ..Default::default()
        };
        let entries = diff(
            &story,
            &update,
            Uuid::new_v4(),
            "Bob Smith",
            OffsetDateTime::now_utc(),
        );
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.action, HistoryAction::StatusChanged);
        assert_eq!(entry.field.as_deref(), Some("status"));
        assert_eq!(entry.old_value.as_deref(), Some("backlog"));
        assert_eq!(entry.new_value.as_deref(), Some("in progress"));
        assert_eq!(
            entry.description,
            "status changed from backlog to in progress by Bob Smith"
        );
    }

    #[test]
    fn unchanged_fields_yield_no_entries() {
        let story = sample_story();
        let update = UpdateStoryRequest {
            title: Some(story.title.clone()),
            status: Some(story.status),
            priority: Some(story.priority),
            estimated_hours: story.estimated_hours,
            ..Default::default()
        };
        let entries = diff(
            &story,
            &update,
            Uuid::new_v4(),
            "Bob Smith",
            OffsetDateTime::now_utc(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn entries_share_one_timestamp_and_follow_field_order() {
        let story = sample_story();
        let update = UpdateStoryRequest {
            title: Some("Checkout flow v2".into()),
            status: Some(StoryStatus::Done),
            estimated_hours: Some(12),
            ..Default::default()
        };
        let now = OffsetDateTime::now_utc();
        let entries = diff(&story, &update, Uuid::new_v4(), "Alice Johnson", now);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.timestamp == now));
        let fields: Vec<_> = entries.iter().map(|e| e.field.as_deref().unwrap()).collect();
        assert_eq!(fields, vec!["title", "status", "estimatedHours"]);
    }

    #[test]
    fn non_status_changes_are_tagged_updated() {
        let story = sample_story();
        let new_assignee = Uuid::new_v4();
        let update = UpdateStoryRequest {
            assignee_id: Some(new_assignee),
            ..Default::default()
        };
        let entries = diff(
            &story,
            &update,
            Uuid::new_v4(),
            "Carol Davis",
            OffsetDateTime::now_utc(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, HistoryAction::Updated);
        assert_eq!(entries[0].field.as_deref(), Some("assigneeId"));
        assert_eq!(entries[0].new_value.as_deref(), Some(new_assignee.to_string().as_str()));
    }

    #[test]
    fn apply_sets_submitted_fields_only() {
        let mut story = sample_story();
        let original_title = story.title.clone();
        apply(
            &mut story,
            UpdateStoryRequest {
                status: Some(StoryStatus::Done),
                sprint: Some("Sprint 2".into()),
                ..Default::default()
            },
        );
        assert_eq!(story.status, StoryStatus::Done);
        assert_eq!(story.sprint, "Sprint 2");
        assert_eq!(story.title, original_title);
        assert_eq!(story.estimated_hours, Some(8));
    }

    #[test]
    fn creation_entry_labels_story_and_bug() {
        let now = OffsetDateTime::now_utc();
        let actor = Uuid::new_v4();
        let entry = creation_entry(StoryType::Story, actor, "Alice Johnson", now);
        assert_eq!(entry.action, HistoryAction::Created);
        assert_eq!(entry.description, "Story created by Alice Johnson");
        let entry = creation_entry(StoryType::Bug, actor, "Alice Johnson", now);
        assert_eq!(entry.description, "Bug created by Alice Johnson");
    }
}
