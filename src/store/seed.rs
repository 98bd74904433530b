//! Demo dataset the server boots with, mirroring the seed data the product
//! team uses for local development. Also used by tests through
//! `AppState::fake()`.

use time::macros::{date, datetime};
use uuid::Uuid;

use super::models::{
    HistoryAction, HistoryEntry, Membership, Priority, Project, Role, Sprint, SprintStatus, Story,
    StoryStatus, StoryType, User, UserStatus,
};
use super::Database;

/// Stable handles into the demo dataset, so tests can log in and address
/// seeded records without scanning the tables first.
#[derive(Debug, Clone)]
pub struct SeedIds {
    pub alice: Uuid,
    pub bob: Uuid,
    pub carol: Uuid,
    pub david: Uuid,
    pub ecommerce: Uuid,
    pub mobile_app: Uuid,
    pub analytics: Uuid,
    pub sprint_1: Uuid,
    pub sprint_2: Uuid,
    pub sprint_3: Uuid,
}

/// Builds the demo database. Every seeded account shares `password_hash`
/// (the hash of the default password).
pub fn demo(password_hash: &str) -> (Database, SeedIds) {
    let ids = SeedIds {
        alice: Uuid::new_v4(),
        bob: Uuid::new_v4(),
        carol: Uuid::new_v4(),
        david: Uuid::new_v4(),
        ecommerce: Uuid::new_v4(),
        mobile_app: Uuid::new_v4(),
        analytics: Uuid::new_v4(),
        sprint_1: Uuid::new_v4(),
        sprint_2: Uuid::new_v4(),
        sprint_3: Uuid::new_v4(),
    };

    let user = |id, name: &str, email: &str, role, status| User {
        id,
        name: name.into(),
        email: email.into(),
        password_hash: password_hash.into(),
        role,
        status,
    };

    let users = vec![
        user(
            ids.alice,
            "Alice Johnson",
            "alice@company.com",
            Role::Admin,
            UserStatus::Active,
        ),
        user(
            ids.bob,
            "Bob Smith",
            "bob@company.com",
            Role::ProjectManager,
            UserStatus::Active,
        ),
        user(
            ids.carol,
            "Carol Davis",
            "carol@company.com",
            Role::TechLead,
            UserStatus::Active,
        ),
        user(
            ids.david,
            "David Wilson",
            "david@company.com",
            Role::Personnel,
            UserStatus::Inactive,
        ),
    ];

    let project = |id, name: &str| Project {
        id,
        name: name.into(),
        created_at: datetime!(2024-01-01 00:00:00 UTC),
        created_by: ids.alice,
    };

    let projects = vec![
        project(ids.ecommerce, "E-Commerce Platform"),
        project(ids.mobile_app, "Mobile App"),
        project(ids.analytics, "Analytics Dashboard"),
    ];

    let membership = |user_id, project_id, role: &str| Membership {
        user_id,
        project_id,
        role: role.into(),
    };

    let memberships = vec![
        membership(ids.alice, ids.ecommerce, "Admin"),
        membership(ids.bob, ids.ecommerce, "Project Manager"),
        membership(ids.carol, ids.ecommerce, "Tech Lead"),
        membership(ids.david, ids.mobile_app, "Developer"),
    ];

    let sprint = |id, n: u32, start, end, status| Sprint {
        id,
        name: format!("Sprint {n}"),
        start_date: start,
        end_date: end,
        status,
        project_id: ids.ecommerce,
    };

    let sprints = vec![
        sprint(
            ids.sprint_1,
            1,
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 14),
            SprintStatus::Completed,
        ),
        sprint(
            ids.sprint_2,
            2,
            date!(2024 - 01 - 15),
            date!(2024 - 01 - 28),
            SprintStatus::Active,
        ),
        sprint(
            ids.sprint_3,
            3,
            date!(2024 - 01 - 29),
            date!(2024 - 02 - 11),
            SprintStatus::Upcoming,
        ),
        sprint(
            Uuid::new_v4(),
            4,
            date!(2024 - 02 - 12),
            date!(2024 - 02 - 25),
            SprintStatus::Upcoming,
        ),
        sprint(
            Uuid::new_v4(),
            5,
            date!(2024 - 02 - 26),
            date!(2024 - 03 - 11),
            SprintStatus::Upcoming,
        ),
    ];

    let story_history = vec![
        HistoryEntry {
            id: Uuid::new_v4(),
            action: HistoryAction::Created,
            field: None,
            old_value: None,
            new_value: None,
            user_id: ids.alice,
            timestamp: datetime!(2024-01-15 10:00:00 UTC),
            description: "Story created by Alice Johnson".into(),
        },
        HistoryEntry {
            id: Uuid::new_v4(),
            action: HistoryAction::Assigned,
            field: Some("assigneeId".into()),
            old_value: Some(String::new()),
            new_value: Some(ids.bob.to_string()),
            user_id: ids.alice,
            timestamp: datetime!(2024-01-15 10:05:00 UTC),
            description: "Assigned to Bob Smith by Alice Johnson".into(),
        },
        HistoryEntry {
            id: Uuid::new_v4(),
            action: HistoryAction::StatusChanged,
            field: Some("status".into()),
            old_value: Some("backlog".into()),
            new_value: Some("in progress".into()),
            user_id: ids.bob,
            timestamp: datetime!(2024-01-15 14:00:00 UTC),
            description: "Status changed from Backlog to In Progress by Bob Smith".into(),
        },
    ];

    let story = |id: &str,
                 title: &str,
                 description: &str,
                 status,
                 assignee_id,
                 sprint: &str,
                 priority,
                 kind,
                 created_at,
                 estimated_hours| Story {
        id: id.into(),
        title: title.into(),
        description: Some(description.into()),
        status,
        assignee_id,
        project_id: ids.ecommerce,
        sprint: sprint.into(),
        priority,
        kind,
        created_at,
        created_by: ids.alice,
        estimated_hours,
        attachments: Vec::new(),
        comments: Vec::new(),
        history: Vec::new(),
    };

    let mut stories = vec![
        story(
            "STORY-001",
            "Implement user authentication system",
            "Create a secure login system with JWT tokens and password hashing.",
            StoryStatus::Done,
            ids.carol,
            "Sprint 1",
            Priority::High,
            StoryType::Story,
            datetime!(2024-01-15 10:00:00 UTC),
            Some(16),
        ),
        story(
            "STORY-002",
            "Design product catalog page",
            "Create responsive design for product listing with filters.",
            StoryStatus::InProgress,
            ids.carol,
            "Sprint 2",
            Priority::Medium,
            StoryType::Story,
            datetime!(2024-01-16 09:30:00 UTC),
            Some(12),
        ),
        story(
            "BUG-001",
            "Fix payment gateway timeout issue",
            "Payment processing fails after 30 seconds.",
            StoryStatus::Backlog,
            ids.bob,
            "Sprint 3",
            Priority::High,
            StoryType::Bug,
            datetime!(2024-01-17 14:15:00 UTC),
            Some(4),
        ),
        story(
            "STORY-003",
            "Create shopping cart functionality",
            "Implement add to cart, quantity updates, and cart persistence.",
            StoryStatus::InProgress,
            ids.bob,
            "Sprint 2",
            Priority::High,
            StoryType::Story,
            datetime!(2024-01-18 11:00:00 UTC),
            Some(20),
        ),
    ];
    stories[1].history = story_history;

    let db = Database {
        users,
        projects,
        memberships,
        sprints,
        stories,
        assignments: Vec::new(),
    };

    (db, ids)
}
