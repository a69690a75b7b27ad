// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use roster::EntityKind;
use roster_domain::{ClassroomId, NewUser, User};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::users::user_exists;

/// Creates a new user.
///
/// The password is hashed with bcrypt before it is stored.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is taken, or an
/// error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    user: &NewUser,
    password: &str,
) -> Result<i64, PersistenceError> {
    info!(email = %user.email(), role = %user.role(), "Creating user");

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::full_name.eq(user.full_name()),
            users::email.eq(user.email()),
            users::role.eq(user.role().as_str()),
            users::password_hash.eq(&password_hash),
        ))
        .execute(conn)
        .map_err(|e| map_unique_email(e, user.email()))?;

    let user_id: i64 = get_last_insert_rowid(conn)?;

    info!(user_id, "User created");
    Ok(user_id)
}

/// Writes a user if the stored version matches `user.version`.
///
/// Returns the new version.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the stored version differs,
/// `PersistenceError::UserNotFound` if the user does not exist, or an error
/// if the update fails.
pub fn update_user(conn: &mut SqliteConnection, user: &User) -> Result<i64, PersistenceError> {
    let user_id: i64 = user.user_id.value();

    debug!(user_id, version = user.version, "Updating user");

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .filter(users::version.eq(user.version))
        .set((
            users::full_name.eq(&user.full_name),
            users::email.eq(&user.email),
            users::role.eq(user.role.as_str()),
            users::classroom_id.eq(user.assigned_classroom.map(ClassroomId::value)),
            users::version.eq(users::version + 1),
        ))
        .execute(conn)
        .map_err(|e| map_unique_email(e, &user.email))?;

    if rows_affected == 0 {
        if user_exists(conn, user_id)? {
            return Err(PersistenceError::VersionConflict {
                entity: EntityKind::User,
                id: user_id,
            });
        }
        return Err(PersistenceError::UserNotFound(user_id));
    }

    Ok(user.version + 1)
}

fn map_unique_email(err: DieselError, email: &str) -> PersistenceError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PersistenceError::DuplicateEmail(email.to_string())
        }
        other => PersistenceError::from(other),
    }
}
