// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-based access policy.
//!
//! The whole permission matrix lives in [`allowed_roles`] so it can be audited
//! and tested in one place. Operations that are further narrowed to the
//! actor's own classroom perform that check themselves after the policy
//! passes.

use roster_domain::{Role, UserId};

use crate::error::CoreError;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The actor's user identifier.
    pub user_id: UserId,
    /// The actor's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// An operation subject to the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a classroom.
    CreateClassroom,
    /// Bind a teacher to a classroom.
    AssignTeacher,
    /// Bind students to a classroom.
    AssignStudents,
    /// Add periods to a classroom timetable.
    CreateTimetable,
    /// View the classroom the actor belongs to.
    ViewOwnClassroom,
    /// List every classroom.
    ListClassrooms,
    /// List the students of a classroom.
    ListClassroomStudents,
    /// View a classroom timetable.
    ViewTimetable,
    /// Register a new user.
    RegisterUser,
    /// List every user.
    ListUsers,
    /// View a single user.
    ViewUser,
    /// Repair a half-applied teacher assignment.
    ReconcileAssignment,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::CreateClassroom,
        Self::AssignTeacher,
        Self::AssignStudents,
        Self::CreateTimetable,
        Self::ViewOwnClassroom,
        Self::ListClassrooms,
        Self::ListClassroomStudents,
        Self::ViewTimetable,
        Self::RegisterUser,
        Self::ListUsers,
        Self::ViewUser,
        Self::ReconcileAssignment,
    ];

    /// Converts this action to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateClassroom => "create_classroom",
            Self::AssignTeacher => "assign_teacher",
            Self::AssignStudents => "assign_students",
            Self::CreateTimetable => "create_timetable",
            Self::ViewOwnClassroom => "view_own_classroom",
            Self::ListClassrooms => "list_classrooms",
            Self::ListClassroomStudents => "list_classroom_students",
            Self::ViewTimetable => "view_timetable",
            Self::RegisterUser => "register_user",
            Self::ListUsers => "list_users",
            Self::ViewUser => "view_user",
            Self::ReconcileAssignment => "reconcile_assignment",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the roles permitted to perform an action.
#[must_use]
pub const fn allowed_roles(action: Action) -> &'static [Role] {
    match action {
        Action::CreateClassroom
        | Action::AssignTeacher
        | Action::ListClassrooms
        | Action::ReconcileAssignment => &[Role::Principal],
        Action::AssignStudents | Action::RegisterUser | Action::ListUsers | Action::ViewUser => {
            &[Role::Principal, Role::Teacher]
        }
        Action::CreateTimetable => &[Role::Teacher],
        Action::ViewOwnClassroom | Action::ListClassroomStudents | Action::ViewTimetable => {
            &[Role::Student]
        }
    }
}

/// Returns whether a role may perform an action.
#[must_use]
pub fn is_allowed(role: Role, action: Action) -> bool {
    allowed_roles(action).contains(&role)
}

/// Checks the access policy for an actor.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if the actor's role may not perform the action.
pub fn authorize(actor: &Actor, action: Action) -> Result<(), CoreError> {
    if is_allowed(actor.role, action) {
        return Ok(());
    }

    let required: Vec<&str> = allowed_roles(action).iter().map(Role::as_str).collect();
    tracing::warn!(
        actor_id = %actor.user_id,
        role = %actor.role,
        action = %action,
        "Access policy denied action"
    );
    Err(CoreError::forbidden(
        action,
        actor.role,
        format!("requires one of: {}", required.join(", ")),
    ))
}
