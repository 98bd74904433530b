//! Role-based authorization gate. A pure predicate over (role, action);
//! temporal rules such as "only upcoming sprints are editable" live with the
//! entity they guard, not here.

use crate::error::ApiError;
use crate::store::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProject,
    ListUsers,
    CreateUser,
    ChangeUserStatus,
    ViewMembership,
    CreateSprint,
    EditSprint,
    UpsertAssignment,
}

pub fn allowed(role: Role, action: Action) -> bool {
    use Action::*;
    match action {
        CreateProject => role == Role::Admin,
        ListUsers | CreateUser | ChangeUserStatus | ViewMembership => {
            matches!(role, Role::Admin | Role::ProjectManager)
        }
        // Sprint creation/editing deliberately excludes tech leads, while
        // timeline assignment includes them.
        CreateSprint | EditSprint => matches!(role, Role::Admin | Role::ProjectManager),
        UpsertAssignment => matches!(
            role,
            Role::Admin | Role::ProjectManager | Role::TechLead
        ),
    }
}

pub fn require(role: Role, action: Action) -> Result<(), ApiError> {
    if allowed(role, action) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
