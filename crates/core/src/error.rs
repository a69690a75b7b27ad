// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{ClassroomId, DomainError, OperatingHours, Period, Role, UserId};

use crate::policy::Action;
use crate::store::StoreError;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A `User` record.
    User,
    /// A `Classroom` record.
    Classroom,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Classroom => write!(f, "Classroom"),
        }
    }
}

/// Which side of a timetable batch a conflicting period came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSource {
    /// The period is already stored in the classroom's timetable.
    Existing,
    /// The period is another member of the same proposed batch.
    Proposed,
}

/// Coarse classification of a `CoreError`.
///
/// Callers branch on the kind (for example to pick a transport status code)
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced user or classroom does not exist.
    NotFound,
    /// A user has the wrong role for the operation.
    InvalidRole,
    /// The actor may not perform the operation.
    Forbidden,
    /// A teacher or classroom is already bound elsewhere.
    AlreadyAssigned,
    /// A period falls outside classroom operating hours.
    OutOfHours,
    /// A period falls on a day the classroom does not meet.
    InvalidDay,
    /// A period does not start before it ends.
    InvalidRange,
    /// Two periods overlap.
    TimeConflict,
    /// A record changed between read and write.
    Conflict,
    /// A unique value is already taken.
    AlreadyExists,
    /// Input failed field validation.
    InvalidInput,
    /// The store failed for reasons unrelated to the request.
    Internal,
}

impl ErrorKind {
    /// Returns a stable machine-readable name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidRole => "InvalidRole",
            Self::Forbidden => "Forbidden",
            Self::AlreadyAssigned => "AlreadyAssigned",
            Self::OutOfHours => "OutOfHours",
            Self::InvalidDay => "InvalidDay",
            Self::InvalidRange => "InvalidRange",
            Self::TimeConflict => "TimeConflict",
            Self::Conflict => "Conflict",
            Self::AlreadyExists => "AlreadyExists",
            Self::InvalidInput => "InvalidInput",
            Self::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed domain validation.
    DomainViolation(DomainError),
    /// A referenced record does not exist.
    NotFound {
        /// The kind of record.
        entity: EntityKind,
        /// The missing identifier.
        id: i64,
    },
    /// A user has the wrong role for the operation.
    InvalidRole {
        /// The offending user.
        user_id: UserId,
        /// The role the operation requires.
        expected: Role,
        /// The role the user actually has.
        actual: Role,
    },
    /// The actor may not perform the operation.
    Forbidden {
        /// The attempted action.
        action: Action,
        /// The actor's role.
        role: Role,
        /// Why the action was refused.
        reason: String,
    },
    /// First-principal bootstrap was attempted after users already exist.
    BootstrapClosed,
    /// The teacher is already bound to a classroom.
    AlreadyAssigned {
        /// The teacher being assigned.
        teacher_id: UserId,
        /// The classroom the teacher is already bound to.
        classroom_id: ClassroomId,
    },
    /// The classroom already has a different teacher.
    ClassroomHasTeacher {
        /// The classroom being assigned.
        classroom_id: ClassroomId,
        /// The teacher already bound to it.
        teacher_id: UserId,
    },
    /// The teacher record was written but the classroom record was not.
    ///
    /// The two records disagree until `reconcile_teacher_assignment` runs.
    IncompleteAssignment {
        /// The teacher whose binding was saved.
        teacher_id: UserId,
        /// The classroom whose save failed.
        classroom_id: ClassroomId,
        /// The failure from the classroom write.
        cause: Box<Self>,
    },
    /// A proposed period falls outside the classroom's operating hours.
    OutOfHours {
        /// The offending period.
        period: Period,
        /// The classroom's operating hours.
        hours: OperatingHours,
    },
    /// A proposed period falls on a day the classroom does not meet.
    InvalidDay {
        /// The offending period.
        period: Period,
    },
    /// A proposed period does not start before it ends.
    InvalidRange {
        /// The offending period.
        period: Period,
    },
    /// A proposed period overlaps another period.
    TimeConflict {
        /// The offending proposed period.
        period: Period,
        /// The period it collides with.
        conflicts_with: Period,
        /// Where the colliding period came from.
        source: ConflictSource,
    },
    /// A record changed between read and write; re-read and retry.
    Conflict {
        /// The kind of record.
        entity: EntityKind,
        /// The record identifier.
        id: i64,
    },
    /// A unique value is already taken.
    Duplicate {
        /// The unique field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// The store failed.
    Store(String),
}

impl CoreError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainViolation(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidRole { .. } => ErrorKind::InvalidRole,
            Self::Forbidden { .. } | Self::BootstrapClosed => ErrorKind::Forbidden,
            Self::AlreadyAssigned { .. } | Self::ClassroomHasTeacher { .. } => {
                ErrorKind::AlreadyAssigned
            }
            Self::IncompleteAssignment { .. } | Self::Conflict { .. } => ErrorKind::Conflict,
            Self::OutOfHours { .. } => ErrorKind::OutOfHours,
            Self::InvalidDay { .. } => ErrorKind::InvalidDay,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::TimeConflict { .. } => ErrorKind::TimeConflict,
            Self::Duplicate { .. } => ErrorKind::AlreadyExists,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Returns whether re-running the whole operation may succeed.
    ///
    /// Only a plain version conflict qualifies. An incomplete assignment needs
    /// reconciliation rather than a blind retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub(crate) fn forbidden(action: Action, role: Role, reason: impl Into<String>) -> Self {
        Self::Forbidden {
            action,
            role,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::InvalidRole {
                user_id,
                expected,
                actual,
            } => write!(f, "User {user_id} is a {actual}, expected a {expected}"),
            Self::Forbidden {
                action,
                role,
                reason,
            } => write!(f, "{role} may not {action}: {reason}"),
            Self::BootstrapClosed => write!(
                f,
                "Bootstrap is only available while no users exist"
            ),
            Self::AlreadyAssigned {
                teacher_id,
                classroom_id,
            } => write!(
                f,
                "Teacher {teacher_id} is already assigned to classroom {classroom_id}"
            ),
            Self::ClassroomHasTeacher {
                classroom_id,
                teacher_id,
            } => write!(
                f,
                "Classroom {classroom_id} already has teacher {teacher_id}"
            ),
            Self::IncompleteAssignment {
                teacher_id,
                classroom_id,
                cause,
            } => write!(
                f,
                "Teacher {teacher_id} was bound to classroom {classroom_id} but the classroom was not updated: {cause}"
            ),
            Self::OutOfHours { period, hours } => write!(
                f,
                "Timetable entry {period} is outside classroom hours {hours}"
            ),
            Self::InvalidDay { period } => write!(
                f,
                "Timetable entry {period} falls on a day the classroom does not meet"
            ),
            Self::InvalidRange { period } => write!(
                f,
                "Timetable entry {period} must start before it ends"
            ),
            Self::TimeConflict {
                period,
                conflicts_with,
                source,
            } => match source {
                ConflictSource::Existing => write!(
                    f,
                    "Timetable entry {period} overlaps with existing period {conflicts_with}"
                ),
                ConflictSource::Proposed => write!(
                    f,
                    "Timetable entry {period} overlaps with proposed period {conflicts_with}"
                ),
            },
            Self::Conflict { entity, id } => write!(
                f,
                "{entity} {id} was modified concurrently; re-read and retry"
            ),
            Self::Duplicate { field, value } => {
                write!(f, "A user with {field} '{value}' already exists")
            }
            Self::Store(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Conflict { entity, id } => Self::Conflict { entity, id },
            StoreError::Duplicate { field, value } => Self::Duplicate { field, value },
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}
