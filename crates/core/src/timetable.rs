// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timetable batch validation and commit.

use roster_domain::{Classroom, ClassroomId, Period, User, validate_subject};

use crate::error::{ConflictSource, CoreError};
use crate::policy::{Action, Actor, authorize};
use crate::store::EntityStore;

/// Validates a proposed batch against a classroom's current state.
///
/// Every proposed period is first checked on its own (subject, operating
/// hours, active day, start before end). Only when the whole batch passes
/// those checks are overlaps examined: each proposed period against every
/// existing period, then against every earlier period of the batch.
/// Periods on different days never conflict and touching periods do not
/// overlap.
///
/// # Errors
///
/// Returns the first failure found. `OutOfHours`, `InvalidDay` and
/// `InvalidRange` identify the offending period; `TimeConflict` also names
/// the period it collides with and whether that period is stored or proposed.
pub fn validate_timetable(classroom: &Classroom, proposed: &[Period]) -> Result<(), CoreError> {
    for period in proposed {
        validate_subject(&period.subject)?;

        if !classroom.hours.contains(period.start, period.end) {
            return Err(CoreError::OutOfHours {
                period: period.clone(),
                hours: classroom.hours,
            });
        }
        if !classroom.is_active_day(period.day) {
            return Err(CoreError::InvalidDay {
                period: period.clone(),
            });
        }
        if !period.has_valid_range() {
            return Err(CoreError::InvalidRange {
                period: period.clone(),
            });
        }
    }

    for (index, period) in proposed.iter().enumerate() {
        if let Some(existing) = classroom.timetable.iter().find(|p| p.overlaps(period)) {
            return Err(CoreError::TimeConflict {
                period: period.clone(),
                conflicts_with: existing.clone(),
                source: ConflictSource::Existing,
            });
        }
        if let Some(earlier) = proposed[..index].iter().find(|p| p.overlaps(period)) {
            return Err(CoreError::TimeConflict {
                period: period.clone(),
                conflicts_with: earlier.clone(),
                source: ConflictSource::Proposed,
            });
        }
    }

    Ok(())
}

/// Adds a batch of periods to a classroom timetable.
///
/// Only the teacher bound to the classroom may author its timetable. The
/// classroom is read fresh, the batch validated against it, and the result
/// saved with the version that was read. Either every period is committed or
/// none are. An empty batch leaves the classroom untouched.
///
/// # Errors
///
/// - `Forbidden` if the actor is not a Teacher or is not bound to this classroom.
/// - `NotFound` if the classroom does not exist.
/// - Any error from [`validate_timetable`].
/// - `Conflict` if the classroom changed between the read and the save.
pub fn create_timetable<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    classroom_id: ClassroomId,
    proposed: Vec<Period>,
) -> Result<Classroom, CoreError> {
    authorize(actor, Action::CreateTimetable)?;

    let author: User = store.find_user_by_id(actor.user_id)?;
    if author.role != actor.role || !author.is_assigned_to(classroom_id) {
        tracing::warn!(
            actor_id = %actor.user_id,
            classroom_id = %classroom_id,
            "Teacher attempted to edit a classroom they are not bound to"
        );
        return Err(CoreError::forbidden(
            Action::CreateTimetable,
            actor.role,
            format!("not the teacher of classroom {classroom_id}"),
        ));
    }

    let mut classroom: Classroom = store.find_classroom_by_id(classroom_id)?;

    if let Err(err) = validate_timetable(&classroom, &proposed) {
        tracing::warn!(
            classroom_id = %classroom_id,
            error = %err,
            "Rejected timetable batch"
        );
        return Err(err);
    }

    if proposed.is_empty() {
        return Ok(classroom);
    }

    let added: usize = proposed.len();
    classroom.timetable.extend(proposed);
    let classroom: Classroom = store.save_classroom(&classroom)?;

    tracing::info!(
        actor_id = %actor.user_id,
        classroom_id = %classroom_id,
        added,
        total = classroom.timetable.len(),
        "Committed timetable batch"
    );

    Ok(classroom)
}
