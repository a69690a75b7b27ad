// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Times are `HH:MM` strings and weekdays are English day names. Parsing into
//! domain types happens in the handlers.

use roster_domain::{Classroom, Period, User};
use serde::{Deserialize, Serialize};

/// A user as exposed by the API. Credential hashes are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The user's identifier.
    pub user_id: i64,
    /// The user's full name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// `Principal`, `Teacher` or `Student`.
    pub role: String,
    /// The classroom the user is bound to.
    pub classroom_id: Option<i64>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.value(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            classroom_id: user.assigned_classroom.map(|id| id.value()),
        }
    }
}

/// One timetable period, in requests and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInfo {
    /// The subject taught.
    pub subject: String,
    /// The weekday name.
    pub day: String,
    /// Start time, `HH:MM`.
    pub start_time: String,
    /// End time, `HH:MM`, exclusive.
    pub end_time: String,
}

impl From<&Period> for PeriodInfo {
    fn from(period: &Period) -> Self {
        Self {
            subject: period.subject.clone(),
            day: period.day.to_string(),
            start_time: period.start.to_string(),
            end_time: period.end.to_string(),
        }
    }
}

/// A classroom as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomInfo {
    /// The classroom's identifier.
    pub classroom_id: i64,
    /// The classroom's name.
    pub name: String,
    /// Opening time, `HH:MM`.
    pub start_time: String,
    /// Closing time, `HH:MM`.
    pub end_time: String,
    /// The weekdays the classroom meets.
    pub days: Vec<String>,
    /// The assigned teacher.
    pub teacher_id: Option<i64>,
    /// The assigned students.
    pub student_ids: Vec<i64>,
    /// The timetable.
    pub timetable: Vec<PeriodInfo>,
}

impl From<&Classroom> for ClassroomInfo {
    fn from(classroom: &Classroom) -> Self {
        Self {
            classroom_id: classroom.classroom_id.value(),
            name: classroom.name.clone(),
            start_time: classroom.hours.start().to_string(),
            end_time: classroom.hours.end().to_string(),
            days: classroom.days.iter().map(ToString::to_string).collect(),
            teacher_id: classroom.teacher.map(|id| id.value()),
            student_ids: classroom.students.iter().map(|id| id.value()).collect(),
            timetable: classroom.timetable.iter().map(PeriodInfo::from).collect(),
        }
    }
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The user's email address.
    pub email: String,
    /// The user's password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    /// The logged-in user.
    pub user: UserInfo,
    /// Session expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// API response for the current-user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    /// The authenticated user, freshly loaded.
    pub user: UserInfo,
}

/// API response describing whether first-principal bootstrap is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapStatusResponse {
    /// True while no users exist.
    pub needs_bootstrap: bool,
}

/// API request to create the first principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirstPrincipalRequest {
    /// The principal's full name.
    pub full_name: String,
    /// The principal's email address.
    pub email: String,
    /// The initial password.
    pub password: String,
    /// Password confirmation (must match `password`).
    pub password_confirmation: String,
}

/// API request to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    /// The user's full name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// `Principal`, `Teacher` or `Student`.
    pub role: String,
    /// The initial password.
    pub password: String,
    /// Password confirmation (must match `password`).
    pub password_confirmation: String,
}

/// API response for a created user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    /// The created user.
    pub user: UserInfo,
    /// A success message.
    pub message: String,
}

/// API response for listing users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// All users.
    pub users: Vec<UserInfo>,
}

/// API request to create a classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClassroomRequest {
    /// The classroom name.
    pub name: String,
    /// Opening time, `HH:MM`.
    pub start_time: String,
    /// Closing time, `HH:MM`.
    pub end_time: String,
    /// The weekdays the classroom meets.
    pub days: Vec<String>,
}

/// API response for a created classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClassroomResponse {
    /// The created classroom.
    pub classroom: ClassroomInfo,
    /// A success message.
    pub message: String,
}

/// API response for listing classrooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListClassroomsResponse {
    /// All classrooms.
    pub classrooms: Vec<ClassroomInfo>,
}

/// API request to assign a teacher to a classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTeacherRequest {
    /// The teacher to assign.
    pub teacher_id: i64,
}

/// API response for a teacher assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTeacherResponse {
    /// The assigned teacher.
    pub teacher: UserInfo,
    /// The classroom after the assignment.
    pub classroom: ClassroomInfo,
    /// A success message.
    pub message: String,
}

/// API response for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileAssignmentResponse {
    /// The teacher that was reconciled.
    pub teacher_id: i64,
    /// `unassigned`, `consistent`, `completed` or `released`.
    pub outcome: String,
    /// The classroom the teacher is bound to afterwards.
    pub classroom_id: Option<i64>,
    /// A human-readable summary.
    pub message: String,
}

/// API request to assign students to a classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignStudentsRequest {
    /// The students to assign. Unknown ids and non-students are skipped.
    pub student_ids: Vec<i64>,
}

/// API response for a student assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignStudentsResponse {
    /// The classroom after the assignment.
    pub classroom: ClassroomInfo,
    /// The students that were resolved and bound.
    pub assigned: Vec<UserInfo>,
    /// A success message.
    pub message: String,
}

/// API request to add periods to a classroom timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTimetableRequest {
    /// The periods to add as one batch.
    pub periods: Vec<PeriodInfo>,
}

/// API response carrying a classroom timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableResponse {
    /// The classroom.
    pub classroom_id: i64,
    /// The classroom's full timetable.
    pub periods: Vec<PeriodInfo>,
}

/// API response for a student's own classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomDetailsResponse {
    /// The classroom.
    pub classroom: ClassroomInfo,
    /// The classroom's teacher.
    pub teacher: Option<UserInfo>,
    /// The classroom's students.
    pub students: Vec<UserInfo>,
}

/// API response for listing a classroom's students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListClassroomStudentsResponse {
    /// The classroom.
    pub classroom_id: i64,
    /// Its students.
    pub students: Vec<UserInfo>,
}
