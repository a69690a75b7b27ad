// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and credential queries.
//!
//! The `UserRow` projection leaves out `password_hash`. The hash
//! is only read through `get_credentials_by_email` during login.

use std::collections::HashMap;
use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;
use roster_domain::{ClassroomId, Role, User, UserId};
use tracing::debug;

use crate::data_models::CredentialData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    full_name: String,
    email: String,
    role: String,
    classroom_id: Option<i64>,
    version: i64,
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = Role::from_str(&row.role).map_err(|e| {
            PersistenceError::CorruptRecord(format!("user {}: {e}", row.user_id))
        })?;
        Ok(Self {
            user_id: UserId::new(row.user_id),
            full_name: row.full_name,
            email: row.email,
            role,
            assigned_classroom: row.classroom_id.map(ClassroomId::new),
            version: row.version,
        })
    }
}

/// Diesel Queryable struct for credential lookups.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct CredentialRow {
    user_id: i64,
    email: String,
    password_hash: String,
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(User::try_from).transpose()
}

/// Retrieves the users with the given IDs and role.
///
/// Missing IDs and users with another role are skipped. The result follows
/// the order of `user_ids`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn get_users_by_ids_and_role(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
    role: Role,
) -> Result<Vec<User>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<UserRow> = users::table
        .filter(users::user_id.eq_any(user_ids))
        .filter(users::role.eq(role.as_str()))
        .select(UserRow::as_select())
        .load(conn)?;

    let mut by_id: HashMap<i64, User> = HashMap::with_capacity(rows.len());
    for row in rows {
        let user: User = User::try_from(row)?;
        by_id.insert(user.user_id.value(), user);
    }

    Ok(user_ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Lists all users ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    rows.into_iter().map(User::try_from).collect()
}

/// Counts all users.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table.count().get_result(conn)?)
}

/// Returns whether a user row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn user_exists(conn: &mut SqliteConnection, user_id: i64) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        users::table.filter(users::user_id.eq(user_id)),
    ))
    .get_result(conn)?)
}

/// Retrieves login credentials by email.
///
/// The lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if no user has this email.
pub fn get_credentials_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<CredentialData>, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    debug!(email = %normalized_email, "Looking up credentials by email");

    let row: Option<CredentialRow> = users::table
        .filter(users::email.eq(&normalized_email))
        .select(CredentialRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| CredentialData {
        user_id: row.user_id,
        email: row.email,
        password_hash: row.password_hash,
    }))
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Password verification failed: {e}")))
}
