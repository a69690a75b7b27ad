// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Classroom mutations.
//!
//! Membership, weekdays and the timetable are stored as JSON documents on the
//! classroom row, so every classroom write replaces them as one unit.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roster::EntityKind;
use roster_domain::{Classroom, NewClassroom, Period, UserId, Weekday};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::PeriodData;
use crate::diesel_schema::classrooms;
use crate::error::PersistenceError;
use crate::queries::classrooms::classroom_exists;

fn encode_days(days: &[Weekday]) -> Result<String, PersistenceError> {
    let names: Vec<String> = days.iter().map(ToString::to_string).collect();
    Ok(serde_json::to_string(&names)?)
}

fn encode_students(students: &[UserId]) -> Result<String, PersistenceError> {
    let ids: Vec<i64> = students.iter().map(|id| id.value()).collect();
    Ok(serde_json::to_string(&ids)?)
}

fn encode_timetable(timetable: &[Period]) -> Result<String, PersistenceError> {
    let periods: Vec<PeriodData> = timetable.iter().map(PeriodData::from).collect();
    Ok(serde_json::to_string(&periods)?)
}

/// Creates a new classroom with no teacher, students or periods.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_classroom(
    conn: &mut SqliteConnection,
    classroom: &NewClassroom,
) -> Result<i64, PersistenceError> {
    info!(name = %classroom.name(), hours = %classroom.hours(), "Creating classroom");

    diesel::insert_into(classrooms::table)
        .values((
            classrooms::name.eq(classroom.name()),
            classrooms::start_time.eq(classroom.hours().start().to_string()),
            classrooms::end_time.eq(classroom.hours().end().to_string()),
            classrooms::days_json.eq(encode_days(classroom.days())?),
            classrooms::students_json.eq("[]"),
            classrooms::timetable_json.eq("[]"),
        ))
        .execute(conn)?;

    let classroom_id: i64 = get_last_insert_rowid(conn)?;

    info!(classroom_id, "Classroom created");
    Ok(classroom_id)
}

/// Writes a classroom if the stored version matches `classroom.version`.
///
/// Returns the new version.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the stored version differs,
/// `PersistenceError::ClassroomNotFound` if the classroom does not exist, or
/// an error if the update fails.
pub fn update_classroom(
    conn: &mut SqliteConnection,
    classroom: &Classroom,
) -> Result<i64, PersistenceError> {
    let classroom_id: i64 = classroom.classroom_id.value();

    debug!(classroom_id, version = classroom.version, "Updating classroom");

    let rows_affected: usize = diesel::update(classrooms::table)
        .filter(classrooms::classroom_id.eq(classroom_id))
        .filter(classrooms::version.eq(classroom.version))
        .set((
            classrooms::name.eq(&classroom.name),
            classrooms::start_time.eq(classroom.hours.start().to_string()),
            classrooms::end_time.eq(classroom.hours.end().to_string()),
            classrooms::days_json.eq(encode_days(&classroom.days)?),
            classrooms::teacher_id.eq(classroom.teacher.map(UserId::value)),
            classrooms::students_json.eq(encode_students(&classroom.students)?),
            classrooms::timetable_json.eq(encode_timetable(&classroom.timetable)?),
            classrooms::version.eq(classrooms::version + 1),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        if classroom_exists(conn, classroom_id)? {
            return Err(PersistenceError::VersionConflict {
                entity: EntityKind::Classroom,
                id: classroom_id,
            });
        }
        return Err(PersistenceError::ClassroomNotFound(classroom_id));
    }

    Ok(classroom.version + 1)
}
