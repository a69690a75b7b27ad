// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{Classroom, NewClassroom};

use crate::error::CoreError;
use crate::policy::{Action, Actor, authorize};
use crate::store::EntityStore;

/// Creates a classroom with no teacher, students or periods.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Principal.
pub fn create_classroom<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    classroom: &NewClassroom,
) -> Result<Classroom, CoreError> {
    authorize(actor, Action::CreateClassroom)?;

    let created: Classroom = store.create_classroom(classroom)?;
    tracing::info!(
        actor_id = %actor.user_id,
        classroom_id = %created.classroom_id,
        name = %created.name,
        hours = %created.hours,
        "Created classroom"
    );
    Ok(created)
}
