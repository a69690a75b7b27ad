// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod classroom;
mod error;
mod schedule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use classroom::{Classroom, NewClassroom};
pub use error::DomainError;
pub use schedule::{OperatingHours, Period, TimeOfDay, parse_weekday};
pub use types::{ClassroomId, NewUser, Role, User, UserId};
pub use validation::{validate_classroom_name, validate_email, validate_full_name, validate_subject};

/// Weekday type used for classroom active days and period days.
pub use time::Weekday;
