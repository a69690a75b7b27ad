// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{NewUser, Role, User, UserId};

use crate::error::CoreError;
use crate::policy::{Action, Actor, authorize};
use crate::store::EntityStore;

/// Registers a new user.
///
/// Principals may register any role. Teachers may register Students only.
/// New users never start with a classroom binding.
///
/// Password strength is a transport concern and is checked before this call.
///
/// # Errors
///
/// - `Forbidden` if the actor may not register users, or a Teacher attempts
///   to register a non-Student.
/// - `Duplicate` if the email is already registered.
pub fn register_user<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    user: &NewUser,
    password: &str,
) -> Result<User, CoreError> {
    authorize(actor, Action::RegisterUser)?;

    if actor.role == Role::Teacher && user.role() != Role::Student {
        return Err(CoreError::forbidden(
            Action::RegisterUser,
            actor.role,
            format!("teachers may only register students, not a {}", user.role()),
        ));
    }

    let created: User = store.create_user(user, password)?;
    tracing::info!(
        actor_id = %actor.user_id,
        user_id = %created.user_id,
        role = %created.role,
        "Registered user"
    );
    Ok(created)
}

/// Lists every user.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Principal or Teacher.
pub fn list_users<S: EntityStore>(store: &mut S, actor: &Actor) -> Result<Vec<User>, CoreError> {
    authorize(actor, Action::ListUsers)?;
    Ok(store.list_users()?)
}

/// Loads a single user.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Principal or Teacher, and
/// `NotFound` if the user does not exist.
pub fn get_user<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    user_id: UserId,
) -> Result<User, CoreError> {
    authorize(actor, Action::ViewUser)?;
    Ok(store.find_user_by_id(user_id)?)
}

/// Creates the first Principal of an empty installation.
///
/// There is no actor: this is the only way to create a user before anyone
/// can log in.
///
/// # Errors
///
/// - `BootstrapClosed` if any user already exists.
/// - `InvalidRole` if `user` is not a Principal.
pub fn bootstrap_principal<S: EntityStore>(
    store: &mut S,
    user: &NewUser,
    password: &str,
) -> Result<User, CoreError> {
    if store.count_users()? > 0 {
        tracing::warn!("Rejected bootstrap: users already exist");
        return Err(CoreError::BootstrapClosed);
    }

    if user.role() != Role::Principal {
        return Err(CoreError::InvalidRole {
            user_id: UserId::new(0),
            expected: Role::Principal,
            actual: user.role(),
        });
    }

    let created: User = store.create_user(user, password)?;
    tracing::info!(user_id = %created.user_id, "Created first principal");
    Ok(created)
}
