use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod models;
pub mod seed;

use models::{Membership, Project, Sprint, SprintAssignment, Story, User};

/// All entity tables. Plain vectors; every cross-table invariant is enforced
/// by the operations in the domain repos, which run under one store guard.
#[derive(Debug, Default)]
pub struct Database {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub memberships: Vec<Membership>,
    pub sprints: Vec<Sprint>,
    pub stories: Vec<Story>,
    pub assignments: Vec<SprintAssignment>,
}

/// Shared in-memory entity store. A single `RwLock` serializes mutations, so
/// any read-modify-write sequence (find-or-create assignment, history diff,
/// next-ID computation) that holds the write guard for its whole duration is
/// atomic with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<Database>,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self {
            inner: RwLock::new(db),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Database> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Database> {
        self.inner.write().await
    }
}
