// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::schedule::TimeOfDay;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A person's full name is empty or invalid.
    InvalidName(String),
    /// An email address is empty or malformed.
    InvalidEmail(String),
    /// A role string does not name a known role.
    InvalidRole(String),
    /// A period subject label is empty.
    InvalidSubject(String),
    /// A classroom name is empty.
    InvalidClassroomName(String),
    /// A time-of-day string could not be parsed.
    InvalidTimeOfDay {
        /// The rejected input.
        value: String,
        /// Why the input was rejected.
        reason: String,
    },
    /// A weekday string does not name a day of the week.
    InvalidWeekday(String),
    /// Operating hours must open strictly before they close.
    InvalidOperatingHours {
        /// The opening time.
        start: TimeOfDay,
        /// The closing time.
        end: TimeOfDay,
    },
    /// A classroom must be active on at least one weekday.
    NoActiveDays,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidRole(value) => write!(
                f,
                "Invalid role: '{value}'. Must be one of Principal, Teacher, Student"
            ),
            Self::InvalidSubject(msg) => write!(f, "Invalid subject: {msg}"),
            Self::InvalidClassroomName(msg) => write!(f, "Invalid classroom name: {msg}"),
            Self::InvalidTimeOfDay { value, reason } => {
                write!(f, "Invalid time of day '{value}': {reason}")
            }
            Self::InvalidWeekday(value) => write!(f, "Invalid weekday: '{value}'"),
            Self::InvalidOperatingHours { start, end } => write!(
                f,
                "Operating hours must start before they end, got {start}-{end}"
            ),
            Self::NoActiveDays => write!(f, "A classroom must be active on at least one day"),
        }
    }
}

impl std::error::Error for DomainError {}
