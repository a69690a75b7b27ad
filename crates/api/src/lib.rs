// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Roster school scheduling system.
//!
//! Transport-agnostic: the server crate owns HTTP. This crate owns request
//! and response shapes, session authentication, the password policy,
//! conflict retries, and the translation of engine errors into [`ApiError`].

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod retry;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    assign_students, assign_teacher, bootstrap_status, create_classroom, create_first_principal,
    create_timetable, current_user, get_user, list_classroom_students, list_classrooms,
    list_users, login, logout, own_classroom, reconcile_teacher_assignment, register_user,
    view_timetable,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AssignStudentsRequest, AssignStudentsResponse, AssignTeacherRequest, AssignTeacherResponse,
    BootstrapStatusResponse, ClassroomDetailsResponse, ClassroomInfo, CreateClassroomRequest,
    CreateClassroomResponse, CreateFirstPrincipalRequest, CreateTimetableRequest,
    CurrentUserResponse, ListClassroomStudentsResponse, ListClassroomsResponse, ListUsersResponse,
    LoginRequest, LoginResponse, PeriodInfo, ReconcileAssignmentResponse, RegisterUserRequest,
    RegisterUserResponse, TimetableResponse, UserInfo,
};
pub use retry::RetryPolicy;
