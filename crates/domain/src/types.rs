// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{validate_email, validate_full_name};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The canonical numeric identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a persisted user identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The canonical numeric identifier of a classroom record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassroomId(i64);

impl ClassroomId {
    /// Wraps a persisted classroom identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ClassroomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a user holds within the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Creates classrooms and binds teachers to them.
    Principal,
    /// Serves exactly one classroom and authors its timetable.
    Teacher,
    /// Belongs to at most one classroom.
    Student,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Principal => "Principal",
            Self::Teacher => "Teacher",
            Self::Student => "Student",
        }
    }

    /// Returns whether users with this role may be bound to a classroom.
    ///
    /// Principals are never bound to a classroom.
    #[must_use]
    pub const fn can_hold_classroom(&self) -> bool {
        matches!(self, Self::Teacher | Self::Student)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "principal" => Ok(Self::Principal),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted user.
///
/// The credential hash is owned by the persistence layer and never loaded
/// into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The persisted identifier.
    pub user_id: UserId,
    /// The user's full name.
    pub full_name: String,
    /// The user's email address (unique, stored lowercase).
    pub email: String,
    /// The user's role.
    pub role: Role,
    /// The classroom this user is bound to, if any.
    ///
    /// Only Teachers and Students ever carry a value here.
    pub assigned_classroom: Option<ClassroomId>,
    /// Optimistic concurrency version, bumped by every successful save.
    pub version: i64,
}

impl User {
    /// Returns whether the user currently has a classroom binding.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assigned_classroom.is_some()
    }

    /// Returns whether the user is bound to the given classroom.
    #[must_use]
    pub fn is_assigned_to(&self, classroom_id: ClassroomId) -> bool {
        self.assigned_classroom == Some(classroom_id)
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    full_name: String,
    email: String,
    role: Role,
}

impl NewUser {
    /// Creates and validates a new user.
    ///
    /// The name is trimmed and the email is trimmed and lowercased so that
    /// uniqueness is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the email is malformed.
    pub fn new(full_name: &str, email: &str, role: Role) -> Result<Self, DomainError> {
        let full_name: String = full_name.trim().to_string();
        let email: String = email.trim().to_lowercase();
        validate_full_name(&full_name)?;
        validate_email(&email)?;
        Ok(Self {
            full_name,
            email,
            role,
        })
    }

    /// Returns the full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
