use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::{Story, StoryStatus, StoryType};
use crate::store::{Database, Store};

use super::dto::{CreateStoryRequest, UpdateStoryRequest};
use super::history;

/// Next human-facing story ID for the given type: one plus the maximum
/// existing numeric suffix, zero-padded to three digits (unpadded past 999).
/// Numbering is global across projects and never reuses a number.
pub fn next_story_id(stories: &[Story], kind: StoryType) -> String {
    let prefix = kind.id_prefix();
    let next = stories
        .iter()
        .filter_map(|s| s.id.strip_prefix(prefix))
        .filter_map(|rest| rest.strip_prefix('-'))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1);
    format!("{prefix}-{next:03}")
}

fn actor_name(db: &Database, actor_id: Uuid) -> String {
    db.users
        .iter()
        .find(|u| u.id == actor_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "User".to_string())
}

/// Creates a story in backlog with its `created` history entry. ID
/// generation and insert run under one write guard so concurrent creations
/// cannot race to the same number.
pub async fn create(
    store: &Store,
    project_id: Uuid,
    req: CreateStoryRequest,
    actor_id: Uuid,
) -> Story {
    let now = OffsetDateTime::now_utc();
    let mut db = store.write().await;

    let id = next_story_id(&db.stories, req.kind);
    let name = actor_name(&db, actor_id);
    let story = Story {
        id,
        title: req.title,
        description: req.description,
        status: StoryStatus::Backlog,
        assignee_id: req.assignee_id,
        project_id,
        sprint: req.sprint,
        priority: req.priority,
        kind: req.kind,
        created_at: now,
        created_by: actor_id,
        estimated_hours: req.estimated_hours,
        attachments: Vec::new(),
        comments: Vec::new(),
        history: vec![history::creation_entry(req.kind, actor_id, &name, now)],
    };
    db.stories.push(story.clone());
    story
}

/// Applies a partial update and appends the resulting history entries. Diff,
/// mutation and append are one atomic unit under the write guard.
pub async fn update(
    store: &Store,
    id: &str,
    update: UpdateStoryRequest,
    actor_id: Uuid,
) -> Result<Story, ApiError> {
    let now = OffsetDateTime::now_utc();
    let mut db = store.write().await;

    let name = actor_name(&db, actor_id);
    let story = db
        .stories
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::not_found("Story"))?;

    let entries = history::diff(story, &update, actor_id, &name, now);
    history::apply(story, update);
    story.history.extend(entries);

    Ok(story.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::models::{HistoryAction, Priority};
    use crate::store::seed;

    fn seeded_store() -> (Store, seed::SeedIds) {
        let hash = hash_password("password").expect("hash");
        let (db, ids) = seed::demo(&hash);
        (Store::new(db), ids)
    }

    fn new_story_request(kind: StoryType) -> CreateStoryRequest {
        CreateStoryRequest {
            title: "New work item".into(),
            description: None,
            kind,
            priority: Priority::Low,
            assignee_id: Uuid::new_v4(),
            sprint: "Sprint 3".into(),
            estimated_hours: Some(2),
        }
    }

    #[test]
    fn story_ids_are_monotonic_per_type() {
        let stories = Vec::new();
        assert_eq!(next_story_id(&stories, StoryType::Story), "STORY-001");
        assert_eq!(next_story_id(&stories, StoryType::Bug), "BUG-001");
    }

    #[tokio::test]
    async fn consecutive_bug_creations_number_in_call_order() {
        // Seed data holds BUG-001, so the max existing bug number is 1.
        let (store, ids) = seeded_store();
        let first = create(
            &store,
            ids.ecommerce,
            new_story_request(StoryType::Bug),
            ids.alice,
        )
        .await;
        let second = create(
            &store,
            ids.ecommerce,
            new_story_request(StoryType::Bug),
            ids.alice,
        )
        .await;
        assert_eq!(first.id, "BUG-002");
        assert_eq!(second.id, "BUG-003");
    }

    #[tokio::test]
    async fn numbering_grows_unpadded_past_999() {
        let (store, ids) = seeded_store();
        {
            let mut db = store.write().await;
            let mut big = db.stories[0].clone();
            big.id = "BUG-999".into();
            db.stories.push(big);
        }
        let story = create(
            &store,
            ids.ecommerce,
            new_story_request(StoryType::Bug),
            ids.alice,
        )
        .await;
        assert_eq!(story.id, "BUG-1000");
    }

    #[tokio::test]
    async fn creation_appends_exactly_one_created_entry() {
        let (store, ids) = seeded_store();
        let story = create(
            &store,
            ids.ecommerce,
            new_story_request(StoryType::Story),
            ids.alice,
        )
        .await;
        assert_eq!(story.status, StoryStatus::Backlog);
        assert_eq!(story.history.len(), 1);
        assert_eq!(story.history[0].action, HistoryAction::Created);
        assert_eq!(story.history[0].description, "Story created by Alice Johnson");
    }

    #[tokio::test]
    async fn update_appends_history_and_persists_fields() {
        let (store, ids) = seeded_store();
        let before_len = {
            let db = store.read().await;
            db.stories
                .iter()
                .find(|s| s.id == "BUG-001")
                .expect("seeded bug")
                .history
                .len()
        };

        let updated = update(
            &store,
            "BUG-001",
            UpdateStoryRequest {
                status: Some(StoryStatus::InProgress),
                ..Default::default()
            },
            ids.bob,
        )
        .await
        .expect("update");

        assert_eq!(updated.status, StoryStatus::InProgress);
        assert_eq!(updated.history.len(), before_len + 1);
        let entry = updated.history.last().expect("entry");
        assert_eq!(entry.action, HistoryAction::StatusChanged);
        assert_eq!(entry.old_value.as_deref(), Some("backlog"));
        assert_eq!(entry.new_value.as_deref(), Some("in progress"));
        assert!(entry.description.ends_with("by Bob Smith"));

        // Read back through the store: the appended entry is durable.
        let db = store.read().await;
        let stored = db.stories.iter().find(|s| s.id == "BUG-001").expect("bug");
        assert_eq!(stored.history.len(), before_len + 1);
    }

    #[tokio::test]
    async fn update_of_missing_story_is_not_found() {
        let (store, ids) = seeded_store();
        let err = update(&store, "STORY-999", UpdateStoryRequest::default(), ids.bob)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn no_op_update_appends_nothing() {
        let (store, ids) = seeded_store();
        let updated = update(
            &store,
            "BUG-001",
            UpdateStoryRequest {
                status: Some(StoryStatus::Backlog),
                ..Default::default()
            },
            ids.bob,
        )
        .await
        .expect("update");
        assert!(updated.history.is_empty());
    }
}
