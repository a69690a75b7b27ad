// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Weekday;

use crate::error::DomainError;
use crate::schedule::{OperatingHours, Period};
use crate::types::{ClassroomId, UserId};
use crate::validation::validate_classroom_name;

/// A persisted classroom.
///
/// The classroom owns its student set and timetable. Teacher and student
/// references are identifiers only; the matching back-reference lives on the
/// `User` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classroom {
    /// The persisted identifier.
    pub classroom_id: ClassroomId,
    /// Display name.
    pub name: String,
    /// Daily operating window.
    pub hours: OperatingHours,
    /// Active weekdays, without duplicates, in creation order.
    pub days: Vec<Weekday>,
    /// The bound teacher, if any.
    pub teacher: Option<UserId>,
    /// Bound students in insertion order. Never contains duplicates.
    pub students: Vec<UserId>,
    /// Scheduled periods.
    pub timetable: Vec<Period>,
    /// Optimistic concurrency version, bumped by every successful save.
    pub version: i64,
}

impl Classroom {
    /// Returns whether the classroom meets on the given weekday.
    #[must_use]
    pub fn is_active_day(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Returns whether the student is a member of this classroom.
    #[must_use]
    pub fn has_student(&self, student_id: UserId) -> bool {
        self.students.contains(&student_id)
    }

    /// Adds a student to the membership set.
    ///
    /// Returns `false` if the student was already a member.
    pub fn add_student(&mut self, student_id: UserId) -> bool {
        if self.has_student(student_id) {
            return false;
        }
        self.students.push(student_id);
        true
    }

    /// Removes a student from the membership set.
    ///
    /// Returns `false` if the student was not a member.
    pub fn remove_student(&mut self, student_id: UserId) -> bool {
        let before: usize = self.students.len();
        self.students.retain(|id| *id != student_id);
        self.students.len() != before
    }
}

/// A classroom that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassroom {
    name: String,
    hours: OperatingHours,
    days: Vec<Weekday>,
}

impl NewClassroom {
    /// Creates and validates a new classroom.
    ///
    /// Repeated weekdays are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or no weekday is given.
    pub fn new(name: &str, hours: OperatingHours, days: &[Weekday]) -> Result<Self, DomainError> {
        let name: String = name.trim().to_string();
        validate_classroom_name(&name)?;

        let mut unique_days: Vec<Weekday> = Vec::with_capacity(days.len());
        for day in days {
            if !unique_days.contains(day) {
                unique_days.push(*day);
            }
        }
        if unique_days.is_empty() {
            return Err(DomainError::NoActiveDays);
        }

        Ok(Self {
            name,
            hours,
            days: unique_days,
        })
    }

    /// Returns the classroom name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the operating hours.
    #[must_use]
    pub const fn hours(&self) -> OperatingHours {
        self.hours
    }

    /// Returns the active weekdays.
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}
