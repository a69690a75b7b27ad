// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The record store consumed by the engine.

use roster_domain::{Classroom, ClassroomId, NewClassroom, NewUser, Role, User, UserId};

use crate::error::EntityKind;

/// Errors reported by an `EntityStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record does not exist.
    NotFound {
        /// The kind of record.
        entity: EntityKind,
        /// The missing identifier.
        id: i64,
    },
    /// The record's version no longer matches the one that was read.
    Conflict {
        /// The kind of record.
        entity: EntityKind,
        /// The record identifier.
        id: i64,
    },
    /// A unique constraint rejected the write.
    Duplicate {
        /// The unique field.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Conflict { entity, id } => {
                write!(f, "{entity} {id} was modified concurrently")
            }
            Self::Duplicate { field, value } => write!(f, "Duplicate {field}: '{value}'"),
            Self::Backend(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistent storage for users and classrooms.
///
/// Each save is all-or-nothing for a single record. `save_user` and
/// `save_classroom` are compare-and-swap writes: the record's `version` must
/// equal the stored version or the save fails with `StoreError::Conflict`.
/// On success the stored version is incremented and the saved record is
/// returned with its new version.
pub trait EntityStore {
    /// Loads a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such user exists.
    fn find_user_by_id(&mut self, user_id: UserId) -> Result<User, StoreError>;

    /// Loads every user whose identifier is in `user_ids` and whose role is `role`.
    ///
    /// Identifiers that do not exist or belong to a user with another role are
    /// silently skipped. Results follow the order of `user_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error only on backend failure.
    fn find_users_by_ids_and_role(
        &mut self,
        user_ids: &[UserId],
        role: Role,
    ) -> Result<Vec<User>, StoreError>;

    /// Loads a classroom by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such classroom exists.
    fn find_classroom_by_id(&mut self, classroom_id: ClassroomId)
    -> Result<Classroom, StoreError>;

    /// Writes a user if its version is current.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on a stale version and
    /// `StoreError::NotFound` if the user no longer exists.
    fn save_user(&mut self, user: &User) -> Result<User, StoreError>;

    /// Writes a classroom if its version is current.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on a stale version and
    /// `StoreError::NotFound` if the classroom no longer exists.
    fn save_classroom(&mut self, classroom: &Classroom) -> Result<Classroom, StoreError>;

    /// Inserts a new user with the given plain-text password.
    ///
    /// The store is responsible for hashing the password.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the email is taken.
    fn create_user(&mut self, user: &NewUser, password: &str) -> Result<User, StoreError>;

    /// Inserts a new classroom with no teacher, students or periods.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    fn create_classroom(&mut self, classroom: &NewClassroom) -> Result<Classroom, StoreError>;

    /// Lists every classroom ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    fn list_classrooms(&mut self) -> Result<Vec<Classroom>, StoreError>;

    /// Lists every user ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    fn list_users(&mut self) -> Result<Vec<User>, StoreError>;

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    fn count_users(&mut self) -> Result<i64, StoreError>;
}
