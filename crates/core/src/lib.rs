// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The classroom assignment and timetable-conflict engine.
//!
//! Every operation in this crate takes the acting user explicitly and runs
//! against an [`EntityStore`]. Authorization through the access policy is
//! always checked before any record is written, and every write carries the
//! version that was read so that a concurrent modification surfaces as
//! [`CoreError::Conflict`] instead of a lost update.

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

mod assignment;
mod classrooms;
mod error;
mod policy;
mod queries;
mod store;
mod timetable;
mod users;

#[cfg(test)]
mod tests;

pub use assignment::{
    ReconcileOutcome, StudentAssignment, TeacherAssignment, assign_students, assign_teacher,
    reconcile_teacher_assignment,
};
pub use classrooms::create_classroom;
pub use error::{ConflictSource, CoreError, EntityKind, ErrorKind};
pub use policy::{Action, Actor, allowed_roles, authorize, is_allowed};
pub use queries::{
    ClassroomDetails, list_classroom_students, list_classrooms, own_classroom_details,
    view_timetable,
};
pub use store::{EntityStore, StoreError};
pub use timetable::{create_timetable, validate_timetable};
pub use users::{bootstrap_principal, get_user, list_users, register_user};
