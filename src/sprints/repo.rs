use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::{Sprint, SprintStatus};
use crate::store::Store;

use super::dto::UpdateSprintRequest;

/// Next sprint number within a project: one plus the maximum number parsed
/// from existing "Sprint N" names. Monotonic, never gap-filling.
pub fn next_sprint_number(sprints: &[Sprint], project_id: Uuid) -> u32 {
    sprints
        .iter()
        .filter(|s| s.project_id == project_id)
        .filter_map(|s| s.name.strip_prefix("Sprint "))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

/// Creates an upcoming sprint named by the per-project counter. Numbering
/// and insert run under one write guard.
pub async fn create(store: &Store, project_id: Uuid, start_date: Date, end_date: Date) -> Sprint {
    let mut db = store.write().await;
    let number = next_sprint_number(&db.sprints, project_id);
    let sprint = Sprint {
        id: Uuid::new_v4(),
        name: format!("Sprint {number}"),
        start_date,
        end_date,
        status: SprintStatus::Upcoming,
        project_id,
    };
    db.sprints.push(sprint.clone());
    sprint
}

/// Applies a partial update. Sprints are only mutable while upcoming; the
/// status check happens inside the write guard so a concurrent activation
/// cannot slip between check and mutation.
pub async fn update(
    store: &Store,
    id: Uuid,
    update: UpdateSprintRequest,
) -> Result<Sprint, ApiError> {
    let mut db = store.write().await;
    let sprint = db
        .sprints
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::not_found("Sprint"))?;

    if sprint.status != SprintStatus::Upcoming {
        return Err(ApiError::InvalidState(
            "Can only modify upcoming sprints".into(),
        ));
    }

    if let Some(name) = update.name {
        sprint.name = name;
    }
    if let Some(start_date) = update.start_date {
        sprint.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        sprint.end_date = end_date;
    }
    if let Some(status) = update.status {
        sprint.status = status;
    }

    Ok(sprint.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::seed;
    use time::macros::date;

    fn seeded_store() -> (Store, seed::SeedIds) {
        let hash = hash_password("password").expect("hash");
        let (db, ids) = seed::demo(&hash);
        (Store::new(db), ids)
    }

    #[tokio::test]
    async fn numbering_is_scoped_per_project() {
        let (store, ids) = seeded_store();
        // The e-commerce project is seeded with Sprints 1-5.
        let sprint = create(
            &store,
            ids.ecommerce,
            date!(2024 - 03 - 12),
            date!(2024 - 03 - 25),
        )
        .await;
        assert_eq!(sprint.name, "Sprint 6");
        assert_eq!(sprint.status, SprintStatus::Upcoming);

        // A project with no sprints starts at 1.
        let sprint = create(
            &store,
            ids.mobile_app,
            date!(2024 - 03 - 12),
            date!(2024 - 03 - 25),
        )
        .await;
        assert_eq!(sprint.name, "Sprint 1");
    }

    #[tokio::test]
    async fn numbering_never_reclaims_deleted_numbers() {
        let (store, ids) = seeded_store();
        {
            let mut db = store.write().await;
            // Drop "Sprint 3"; its number must not be reused.
            db.sprints.retain(|s| s.name != "Sprint 3");
        }
        let sprint = create(
            &store,
            ids.ecommerce,
            date!(2024 - 03 - 12),
            date!(2024 - 03 - 25),
        )
        .await;
        assert_eq!(sprint.name, "Sprint 6");
    }

    #[tokio::test]
    async fn upcoming_sprint_accepts_update() {
        let (store, ids) = seeded_store();
        let updated = update(
            &store,
            ids.sprint_3,
            UpdateSprintRequest {
                end_date: Some(date!(2024 - 02 - 18)),
                ..Default::default()
            },
        )
        .await
        .expect("update");
        assert_eq!(updated.end_date, date!(2024 - 02 - 18));
    }

    #[tokio::test]
    async fn active_sprint_rejects_update_with_invalid_state() {
        let (store, ids) = seeded_store();
        let err = update(
            &store,
            ids.sprint_2,
            UpdateSprintRequest {
                name: Some("Sprint 2b".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[tokio::test]
    async fn missing_sprint_is_not_found() {
        let (store, _) = seeded_store();
        let err = update(&store, Uuid::new_v4(), UpdateSprintRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
