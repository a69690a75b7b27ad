// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;
use roster_domain::{
    Classroom, ClassroomId, OperatingHours, Period, TimeOfDay, UserId, Weekday, parse_weekday,
};
use tracing::debug;

use crate::data_models::PeriodData;
use crate::diesel_schema::classrooms;
use crate::error::PersistenceError;

/// Diesel Queryable struct for classroom rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = classrooms)]
struct ClassroomRow {
    classroom_id: i64,
    name: String,
    start_time: String,
    end_time: String,
    days_json: String,
    teacher_id: Option<i64>,
    students_json: String,
    timetable_json: String,
    version: i64,
}

impl TryFrom<ClassroomRow> for Classroom {
    type Error = PersistenceError;

    fn try_from(row: ClassroomRow) -> Result<Self, Self::Error> {
        let classroom_id: i64 = row.classroom_id;
        let corrupt = |e: &dyn std::fmt::Display| {
            PersistenceError::CorruptRecord(format!("classroom {classroom_id}: {e}"))
        };

        let start: TimeOfDay = TimeOfDay::from_str(&row.start_time).map_err(|e| corrupt(&e))?;
        let end: TimeOfDay = TimeOfDay::from_str(&row.end_time).map_err(|e| corrupt(&e))?;
        let hours: OperatingHours = OperatingHours::new(start, end).map_err(|e| corrupt(&e))?;

        let day_names: Vec<String> = serde_json::from_str(&row.days_json)?;
        let days: Vec<Weekday> = day_names
            .iter()
            .map(|name| parse_weekday(name))
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt(&e))?;

        let student_ids: Vec<i64> = serde_json::from_str(&row.students_json)?;
        let periods: Vec<PeriodData> = serde_json::from_str(&row.timetable_json)?;
        let timetable: Vec<Period> = periods
            .into_iter()
            .map(Period::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            classroom_id: ClassroomId::new(classroom_id),
            name: row.name,
            hours,
            days,
            teacher: row.teacher_id.map(UserId::new),
            students: student_ids.into_iter().map(UserId::new).collect(),
            timetable,
            version: row.version,
        })
    }
}

/// Retrieves a classroom by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the classroom is not found.
pub fn get_classroom_by_id(
    conn: &mut SqliteConnection,
    classroom_id: i64,
) -> Result<Option<Classroom>, PersistenceError> {
    debug!(classroom_id, "Looking up classroom by ID");

    let row: Option<ClassroomRow> = classrooms::table
        .filter(classrooms::classroom_id.eq(classroom_id))
        .select(ClassroomRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Classroom::try_from).transpose()
}

/// Lists all classrooms ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_classrooms(conn: &mut SqliteConnection) -> Result<Vec<Classroom>, PersistenceError> {
    let rows: Vec<ClassroomRow> = classrooms::table
        .order(classrooms::classroom_id.asc())
        .select(ClassroomRow::as_select())
        .load(conn)?;

    rows.into_iter().map(Classroom::try_from).collect()
}

/// Returns whether a classroom row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn classroom_exists(
    conn: &mut SqliteConnection,
    classroom_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        classrooms::table.filter(classrooms::classroom_id.eq(classroom_id)),
    ))
    .get_result(conn)?)
}
