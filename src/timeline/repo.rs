//! Sprint-assignment upsert engine. A slot is addressed by the composite key
//! (sprint_id, user_id, date, period); upserting resolves that key to exactly
//! one row, replacing content in place when the row exists.

use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::{Period, SlotContent, SprintAssignment};
use crate::store::Store;

/// Composite key addressing one half-day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotKey {
    pub sprint_id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub period: Period,
}

impl SlotKey {
    fn matches(&self, a: &SprintAssignment) -> bool {
        a.sprint_id == self.sprint_id
            && a.user_id == self.user_id
            && a.date == self.date
            && a.period == self.period
    }
}

/// Finds the row for `key` and replaces its content keeping its identity, or
/// creates a fresh row. Lookup and write happen under one write guard, so two
/// concurrent upserts on the same key can never both miss and insert
/// duplicates. An `unset` slot is retained as a row; readers treat it as
/// empty.
pub async fn upsert(
    store: &Store,
    key: SlotKey,
    content: SlotContent,
) -> Result<SprintAssignment, ApiError> {
    let mut db = store.write().await;

    let project_id = db
        .sprints
        .iter()
        .find(|s| s.id == key.sprint_id)
        .map(|s| s.project_id)
        .ok_or_else(|| ApiError::not_found("Sprint"))?;

    if let Some(existing) = db.assignments.iter_mut().find(|a| key.matches(a)) {
        existing.kind = content.kind();
        existing.ticket_id = content.ticket_id();
        existing.project_id = project_id;
        return Ok(existing.clone());
    }

    let assignment = SprintAssignment {
        id: Uuid::new_v4(),
        sprint_id: key.sprint_id,
        user_id: key.user_id,
        date: key.date,
        period: key.period,
        kind: content.kind(),
        ticket_id: content.ticket_id(),
        project_id,
    };
    db.assignments.push(assignment.clone());
    Ok(assignment)
}

pub async fn list_for_sprint(store: &Store, sprint_id: Uuid) -> Vec<SprintAssignment> {
    let db = store.read().await;
    db.assignments
        .iter()
        .filter(|a| a.sprint_id == sprint_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::models::SlotKind;
    use crate::store::seed;
    use std::sync::Arc;
    use time::macros::date;

    fn seeded_store() -> (Arc<Store>, seed::SeedIds) {
        let hash = hash_password("password").expect("hash");
        let (db, ids) = seed::demo(&hash);
        (Arc::new(Store::new(db)), ids)
    }

    fn key(ids: &seed::SeedIds, period: Period) -> SlotKey {
        SlotKey {
            sprint_id: ids.sprint_2,
            user_id: ids.carol,
            date: date!(2024 - 01 - 16),
            period,
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_replaces_in_place() {
        let (store, ids) = seeded_store();
        let slot = key(&ids, Period::Morning);

        let first = upsert(&store, slot, SlotContent::Ticket("STORY-002".into()))
            .await
            .expect("first upsert");
        assert_eq!(first.kind, SlotKind::Ticket);
        assert_eq!(first.ticket_id.as_deref(), Some("STORY-002"));

        let second = upsert(&store, slot, SlotContent::VacationLeave)
            .await
            .expect("second upsert");
        assert_eq!(second.id, first.id, "identity is stable across replace");
        assert_eq!(second.kind, SlotKind::VacationLeave);
        assert_eq!(second.ticket_id, None, "old content fully replaced");

        let rows = list_for_sprint(&store, ids.sprint_2).await;
        assert_eq!(rows.len(), 1, "no duplicate row for the same key");
    }

    #[tokio::test]
    async fn distinct_periods_are_distinct_slots() {
        let (store, ids) = seeded_store();
        upsert(
            &store,
            key(&ids, Period::Morning),
            SlotContent::Ticket("STORY-002".into()),
        )
        .await
        .expect("morning");
        upsert(&store, key(&ids, Period::Afternoon), SlotContent::SickLeave)
            .await
            .expect("afternoon");

        let rows = list_for_sprint(&store, ids.sprint_2).await;
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn unset_is_retained_as_an_empty_row() {
        let (store, ids) = seeded_store();
        let slot = key(&ids, Period::Morning);
        upsert(&store, slot, SlotContent::Ticket("STORY-002".into()))
            .await
            .expect("set");
        let cleared = upsert(&store, slot, SlotContent::Unset).await.expect("clear");
        assert_eq!(cleared.kind, SlotKind::Unset);
        assert_eq!(cleared.ticket_id, None);

        let rows = list_for_sprint(&store, ids.sprint_2).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SlotKind::Unset);
    }

    #[tokio::test]
    async fn unknown_sprint_is_not_found() {
        let (store, ids) = seeded_store();
        let slot = SlotKey {
            sprint_id: Uuid::new_v4(),
            user_id: ids.carol,
            date: date!(2024 - 01 - 16),
            period: Period::Morning,
        };
        let err = upsert(&store, slot, SlotContent::SickLeave).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_upserts_on_one_key_never_duplicate() {
        let (store, ids) = seeded_store();
        let slot = key(&ids, Period::Morning);

        let mut handles = Vec::new();
        for n in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                upsert(&store, slot, SlotContent::Ticket(format!("STORY-{n:03}"))).await
            }));
        }
        for handle in handles {
            handle.await.expect("join").expect("upsert");
        }

        let rows = list_for_sprint(&store, ids.sprint_2).await;
        assert_eq!(rows.len(), 1, "all writers converged on a single row");
    }

    #[tokio::test]
    async fn project_id_comes_from_the_sprint() {
        let (store, ids) = seeded_store();
        let row = upsert(&store, key(&ids, Period::Morning), SlotContent::VacationLeave)
            .await
            .expect("upsert");
        assert_eq!(row.project_id, ids.ecommerce);
    }
}
