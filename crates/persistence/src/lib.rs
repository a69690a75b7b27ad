// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Roster school scheduling system.
//!
//! Built on Diesel over `SQLite`. [`Persistence`] implements the engine's
//! [`roster::EntityStore`] and additionally owns credentials and login
//! sessions, which the engine never sees.
//!
//! ## Concurrency
//!
//! Every `users` and `classrooms` row carries a `version` column. Updates
//! filter on the version that was read and bump it; an update that matches no
//! row on an existing record is a version conflict. This holds across
//! processes sharing one database file, not only within one `Persistence`.
//!
//! ## Testing
//!
//! `new_in_memory()` gives each caller a private shared-cache in-memory
//! database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use roster_domain::{Classroom, ClassroomId, NewClassroom, NewUser, Role, User, UserId};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::{CredentialData, PeriodData, SessionData};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` persistence adapter.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_roster_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_user(
        &mut self,
        user: &NewUser,
        password: &str,
    ) -> Result<User, PersistenceError> {
        let user_id: i64 = mutations::users::create_user(&mut self.conn, user, password)?;
        self.get_user(UserId::new(user_id))
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if the user does not exist.
    pub fn get_user(&mut self, user_id: UserId) -> Result<User, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id.value())?
            .ok_or(PersistenceError::UserNotFound(user_id.value()))
    }

    /// Retrieves the users with the given IDs and role, in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_users_by_ids_and_role(
        &mut self,
        user_ids: &[UserId],
        role: Role,
    ) -> Result<Vec<User>, PersistenceError> {
        let ids: Vec<i64> = user_ids.iter().map(|id| id.value()).collect();
        queries::users::get_users_by_ids_and_role(&mut self.conn, &ids, role)
    }

    /// Writes a user with a version check and returns it with its new version.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VersionConflict` on a stale version.
    pub fn update_user(&mut self, user: &User) -> Result<User, PersistenceError> {
        let version: i64 = mutations::users::update_user(&mut self.conn, user)?;
        Ok(User {
            version,
            ..user.clone()
        })
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    /// Retrieves login credentials by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_credentials_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<CredentialData>, PersistenceError> {
        queries::users::get_credentials_by_email(&mut self.conn, email)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    // ========================================================================
    // Classrooms
    // ========================================================================

    /// Creates a classroom and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_classroom(
        &mut self,
        classroom: &NewClassroom,
    ) -> Result<Classroom, PersistenceError> {
        let classroom_id: i64 = mutations::classrooms::create_classroom(&mut self.conn, classroom)?;
        self.get_classroom(ClassroomId::new(classroom_id))
    }

    /// Retrieves a classroom by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ClassroomNotFound` if it does not exist.
    pub fn get_classroom(&mut self, classroom_id: ClassroomId) -> Result<Classroom, PersistenceError> {
        queries::classrooms::get_classroom_by_id(&mut self.conn, classroom_id.value())?
            .ok_or(PersistenceError::ClassroomNotFound(classroom_id.value()))
    }

    /// Writes a classroom with a version check and returns it with its new version.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VersionConflict` on a stale version.
    pub fn update_classroom(&mut self, classroom: &Classroom) -> Result<Classroom, PersistenceError> {
        let version: i64 = mutations::classrooms::update_classroom(&mut self.conn, classroom)?;
        Ok(Classroom {
            version,
            ..classroom.clone()
        })
    }

    /// Lists all classrooms.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_classrooms(&mut self) -> Result<Vec<Classroom>, PersistenceError> {
        queries::classrooms::list_classrooms(&mut self.conn)
    }

    // ========================================================================
    // Session Management
    // ========================================================================

    /// Creates a new session for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions that expired before `now` (ISO 8601 UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    /// Deletes all sessions for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_sessions_for_user(&mut self, user_id: i64) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_sessions_for_user(&mut self.conn, user_id)
    }
}
