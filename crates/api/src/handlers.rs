// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers parse request DTOs into domain types, run the engine operation
//! against the store with the caller as actor, and shape the result into a
//! response DTO. Authorization is enforced by the engine, before any read
//! that could leak data.

use std::str::FromStr;

use roster::{
    Actor, ClassroomDetails, CoreError, ReconcileOutcome, StudentAssignment, TeacherAssignment,
};
use roster_domain::{
    Classroom, ClassroomId, NewClassroom, NewUser, OperatingHours, Period, Role, TimeOfDay, User,
    UserId, Weekday, parse_weekday,
};
use roster_persistence::{Persistence, SessionData};
use time::Duration;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AssignStudentsRequest, AssignStudentsResponse, AssignTeacherRequest, AssignTeacherResponse,
    BootstrapStatusResponse, ClassroomDetailsResponse, ClassroomInfo, CreateClassroomRequest,
    CreateClassroomResponse, CreateFirstPrincipalRequest, CreateTimetableRequest,
    CurrentUserResponse, ListClassroomStudentsResponse, ListClassroomsResponse, ListUsersResponse,
    LoginRequest, LoginResponse, PeriodInfo, ReconcileAssignmentResponse, RegisterUserRequest,
    RegisterUserResponse, TimetableResponse, UserInfo,
};
use crate::retry::RetryPolicy;

// ============================================================================
// Parsing
// ============================================================================

fn parse_time(field: &str, value: &str) -> Result<TimeOfDay, ApiError> {
    TimeOfDay::from_str(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_role(value: &str) -> Result<Role, ApiError> {
    Role::from_str(value).map_err(translate_domain_error)
}

fn parse_period(info: &PeriodInfo) -> Result<Period, ApiError> {
    let day: Weekday = parse_weekday(&info.day).map_err(translate_domain_error)?;
    let start: TimeOfDay = parse_time("start_time", &info.start_time)?;
    let end: TimeOfDay = parse_time("end_time", &info.end_time)?;
    Ok(Period::new(info.subject.clone(), day, start, end))
}

fn parse_new_user(full_name: &str, email: &str, role: Role) -> Result<NewUser, ApiError> {
    NewUser::new(full_name, email, role).map_err(translate_domain_error)
}

fn parse_new_classroom(request: &CreateClassroomRequest) -> Result<NewClassroom, ApiError> {
    let start: TimeOfDay = parse_time("start_time", &request.start_time)?;
    let end: TimeOfDay = parse_time("end_time", &request.end_time)?;
    let hours: OperatingHours = OperatingHours::new(start, end).map_err(translate_domain_error)?;
    let days: Vec<Weekday> = request
        .days
        .iter()
        .map(|day| parse_weekday(day))
        .collect::<Result<_, _>>()
        .map_err(translate_domain_error)?;
    NewClassroom::new(&request.name, hours, &days).map_err(translate_domain_error)
}

fn user_ids(ids: &[i64]) -> Vec<UserId> {
    ids.iter().copied().map(UserId::new).collect()
}

fn internal(context: &str, err: impl std::fmt::Display) -> ApiError {
    ApiError::Internal {
        message: format!("{context}: {err}"),
    }
}

fn validate_password(
    new_user: &NewUser,
    password: &str,
    confirmation: &str,
) -> Result<(), ApiError> {
    PasswordPolicy::default().validate(
        password,
        confirmation,
        new_user.email(),
        new_user.full_name(),
    )?;
    Ok(())
}

// ============================================================================
// Sessions and bootstrap
// ============================================================================

/// Authenticates a user and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be stored.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_ttl: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, user, session): (String, User, SessionData) =
        AuthenticationService::login(persistence, &request.email, &request.password, session_ttl)?;

    Ok(LoginResponse {
        session_token,
        user: UserInfo::from(&user),
        expires_at: session.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the authenticated user's current record.
///
/// # Errors
///
/// Returns an error if the user can no longer be loaded.
pub fn current_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<CurrentUserResponse, ApiError> {
    let user: User = persistence
        .get_user(actor.user_id)
        .map_err(|e| internal("Failed to load current user", e))?;

    Ok(CurrentUserResponse {
        user: UserInfo::from(&user),
    })
}

/// Reports whether the system still needs its first principal.
///
/// # Errors
///
/// Returns an error if the user count cannot be read.
pub fn bootstrap_status(persistence: &mut Persistence) -> Result<BootstrapStatusResponse, ApiError> {
    let user_count: i64 = persistence
        .count_users()
        .map_err(|e| internal("Failed to count users", e))?;

    Ok(BootstrapStatusResponse {
        needs_bootstrap: user_count == 0,
    })
}

/// Creates the first principal while no users exist.
///
/// # Errors
///
/// Returns an error if users already exist, a field is invalid, or the
/// password violates the policy.
pub fn create_first_principal(
    persistence: &mut Persistence,
    request: &CreateFirstPrincipalRequest,
) -> Result<RegisterUserResponse, ApiError> {
    let new_user: NewUser = parse_new_user(&request.full_name, &request.email, Role::Principal)?;
    validate_password(&new_user, &request.password, &request.password_confirmation)?;

    let user: User = roster::bootstrap_principal(persistence, &new_user, &request.password)
        .map_err(translate_core_error)?;

    info!(user_id = %user.user_id, "First principal created");
    Ok(RegisterUserResponse {
        message: format!("Created principal '{}'", user.email),
        user: UserInfo::from(&user),
    })
}

// ============================================================================
// Users
// ============================================================================

/// Registers a user.
///
/// Principals may register any role; teachers may register students only.
///
/// # Errors
///
/// Returns an error if the actor may not register this role, a field is
/// invalid, the email is taken, or the password violates the policy.
pub fn register_user(
    persistence: &mut Persistence,
    request: &RegisterUserRequest,
    actor: &AuthenticatedActor,
) -> Result<RegisterUserResponse, ApiError> {
    let role: Role = parse_role(&request.role)?;
    let new_user: NewUser = parse_new_user(&request.full_name, &request.email, role)?;
    validate_password(&new_user, &request.password, &request.password_confirmation)?;

    let user: User =
        roster::register_user(persistence, &actor.to_actor(), &new_user, &request.password)
            .map_err(translate_core_error)?;

    Ok(RegisterUserResponse {
        message: format!("Registered {} '{}'", user.role, user.email),
        user: UserInfo::from(&user),
    })
}

/// Lists all users.
///
/// # Errors
///
/// Returns an error if the actor may not list users.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    let users: Vec<User> =
        roster::list_users(persistence, &actor.to_actor()).map_err(translate_core_error)?;

    Ok(ListUsersResponse {
        users: users.iter().map(UserInfo::from).collect(),
    })
}

/// Loads one user.
///
/// # Errors
///
/// Returns an error if the actor may not view users or the user does not exist.
pub fn get_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    user_id: i64,
) -> Result<UserInfo, ApiError> {
    let user: User = roster::get_user(persistence, &actor.to_actor(), UserId::new(user_id))
        .map_err(translate_core_error)?;
    Ok(UserInfo::from(&user))
}

// ============================================================================
// Classrooms and assignments
// ============================================================================

/// Creates a classroom.
///
/// # Errors
///
/// Returns an error if the actor is not a principal or a field is invalid.
pub fn create_classroom(
    persistence: &mut Persistence,
    request: &CreateClassroomRequest,
    actor: &AuthenticatedActor,
) -> Result<CreateClassroomResponse, ApiError> {
    let new_classroom: NewClassroom = parse_new_classroom(request)?;

    let classroom: Classroom =
        roster::create_classroom(persistence, &actor.to_actor(), &new_classroom)
            .map_err(translate_core_error)?;

    Ok(CreateClassroomResponse {
        message: format!("Created classroom '{}'", classroom.name),
        classroom: ClassroomInfo::from(&classroom),
    })
}

/// Lists all classrooms.
///
/// # Errors
///
/// Returns an error if the actor is not a principal.
pub fn list_classrooms(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListClassroomsResponse, ApiError> {
    let classrooms: Vec<Classroom> =
        roster::list_classrooms(persistence, &actor.to_actor()).map_err(translate_core_error)?;

    Ok(ListClassroomsResponse {
        classrooms: classrooms.iter().map(ClassroomInfo::from).collect(),
    })
}

fn assign_teacher_response(assignment: &TeacherAssignment) -> AssignTeacherResponse {
    AssignTeacherResponse {
        message: format!(
            "Assigned teacher {} to classroom '{}'",
            assignment.teacher.user_id, assignment.classroom.name
        ),
        teacher: UserInfo::from(&assignment.teacher),
        classroom: ClassroomInfo::from(&assignment.classroom),
    }
}

/// Assigns a teacher to a classroom.
///
/// Version conflicts on the first write are retried. If the teacher was bound
/// but the classroom write failed, the assignment is reconciled immediately:
/// it either completes, or the teacher's binding is released and the request
/// fails with a conflict.
///
/// # Errors
///
/// Returns an error if the actor is not a principal, either record is missing,
/// the teacher or classroom is already assigned, or the assignment could not
/// be completed.
pub fn assign_teacher(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    classroom_id: i64,
    request: &AssignTeacherRequest,
    retry: RetryPolicy,
) -> Result<AssignTeacherResponse, ApiError> {
    let core_actor: Actor = actor.to_actor();
    let teacher_id: UserId = UserId::new(request.teacher_id);
    let classroom_id: ClassroomId = ClassroomId::new(classroom_id);

    let result: Result<TeacherAssignment, CoreError> = retry.run("assign_teacher", || {
        roster::assign_teacher(persistence, &core_actor, teacher_id, classroom_id)
    });

    match result {
        Ok(assignment) => Ok(assign_teacher_response(&assignment)),
        Err(err @ CoreError::IncompleteAssignment { .. }) => {
            warn!(
                teacher_id = %teacher_id,
                classroom_id = %classroom_id,
                error = %err,
                "Reconciling incomplete teacher assignment"
            );
            let outcome: ReconcileOutcome =
                roster::reconcile_teacher_assignment(persistence, &core_actor, teacher_id)
                    .map_err(translate_core_error)?;

            match outcome {
                ReconcileOutcome::Completed(assignment) => Ok(assign_teacher_response(&assignment)),
                ReconcileOutcome::Consistent => {
                    let teacher: User = persistence
                        .get_user(teacher_id)
                        .map_err(|e| internal("Failed to reload teacher", e))?;
                    let classroom: Classroom = persistence
                        .get_classroom(classroom_id)
                        .map_err(|e| internal("Failed to reload classroom", e))?;
                    Ok(assign_teacher_response(&TeacherAssignment { teacher, classroom }))
                }
                ReconcileOutcome::Released { .. } | ReconcileOutcome::Unassigned => {
                    Err(ApiError::Conflict {
                        message: format!(
                            "Classroom {classroom_id} changed during assignment; teacher {teacher_id} was released, retry the request"
                        ),
                    })
                }
            }
        }
        Err(err) => Err(translate_core_error(err)),
    }
}

/// Repairs a teacher whose assignment was only half written.
///
/// # Errors
///
/// Returns an error if the actor is not a principal or the user is not a teacher.
pub fn reconcile_teacher_assignment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    teacher_id: i64,
    retry: RetryPolicy,
) -> Result<ReconcileAssignmentResponse, ApiError> {
    let core_actor: Actor = actor.to_actor();
    let teacher_id: UserId = UserId::new(teacher_id);

    let outcome: ReconcileOutcome = retry
        .run("reconcile_teacher_assignment", || {
            roster::reconcile_teacher_assignment(persistence, &core_actor, teacher_id)
        })
        .map_err(translate_core_error)?;

    let (label, classroom_id, message): (&str, Option<i64>, String) = match outcome {
        ReconcileOutcome::Unassigned => (
            "unassigned",
            None,
            format!("Teacher {teacher_id} has no classroom"),
        ),
        ReconcileOutcome::Consistent => {
            let teacher: User = persistence
                .get_user(teacher_id)
                .map_err(|e| internal("Failed to reload teacher", e))?;
            (
                "consistent",
                teacher.assigned_classroom.map(ClassroomId::value),
                format!("Teacher {teacher_id} and their classroom agree"),
            )
        }
        ReconcileOutcome::Completed(assignment) => (
            "completed",
            Some(assignment.classroom.classroom_id.value()),
            format!(
                "Completed assignment of teacher {teacher_id} to classroom '{}'",
                assignment.classroom.name
            ),
        ),
        ReconcileOutcome::Released { held_by } => (
            "released",
            None,
            held_by.map_or_else(
                || format!("Teacher {teacher_id} was bound to a missing classroom and was released"),
                |holder| {
                    format!("Teacher {teacher_id} was released; the classroom belongs to teacher {holder}")
                },
            ),
        ),
    };

    Ok(ReconcileAssignmentResponse {
        teacher_id: teacher_id.value(),
        outcome: label.to_string(),
        classroom_id,
        message,
    })
}

/// Assigns students to a classroom, moving them from any previous classroom.
///
/// # Errors
///
/// Returns an error if the actor may not assign students or the classroom is missing.
pub fn assign_students(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    classroom_id: i64,
    request: &AssignStudentsRequest,
    retry: RetryPolicy,
) -> Result<AssignStudentsResponse, ApiError> {
    let core_actor: Actor = actor.to_actor();
    let classroom_id: ClassroomId = ClassroomId::new(classroom_id);
    let student_ids: Vec<UserId> = user_ids(&request.student_ids);

    let assignment: StudentAssignment = retry
        .run("assign_students", || {
            roster::assign_students(persistence, &core_actor, classroom_id, &student_ids)
        })
        .map_err(translate_core_error)?;

    Ok(AssignStudentsResponse {
        message: format!(
            "Assigned {} student(s) to classroom '{}'",
            assignment.students.len(),
            assignment.classroom.name
        ),
        classroom: ClassroomInfo::from(&assignment.classroom),
        assigned: assignment.students.iter().map(UserInfo::from).collect(),
    })
}

// ============================================================================
// Timetables and student views
// ============================================================================

/// Adds a batch of periods to the teacher's own classroom.
///
/// The batch is accepted or rejected as a whole.
///
/// # Errors
///
/// Returns an error if the actor is not the classroom's teacher, a period is
/// malformed, or any period fails timetable validation.
pub fn create_timetable(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    classroom_id: i64,
    request: &CreateTimetableRequest,
    retry: RetryPolicy,
) -> Result<TimetableResponse, ApiError> {
    let core_actor: Actor = actor.to_actor();
    let classroom_id: ClassroomId = ClassroomId::new(classroom_id);
    let periods: Vec<Period> = request
        .periods
        .iter()
        .map(parse_period)
        .collect::<Result<_, _>>()?;

    let classroom: Classroom = retry
        .run("create_timetable", || {
            roster::create_timetable(persistence, &core_actor, classroom_id, periods.clone())
        })
        .map_err(translate_core_error)?;

    Ok(TimetableResponse {
        classroom_id: classroom.classroom_id.value(),
        periods: classroom.timetable.iter().map(PeriodInfo::from).collect(),
    })
}

/// Returns the acting student's classroom with its teacher and classmates.
///
/// # Errors
///
/// Returns an error if the actor is not a student or has no classroom.
pub fn own_classroom(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ClassroomDetailsResponse, ApiError> {
    let details: ClassroomDetails = roster::own_classroom_details(persistence, &actor.to_actor())
        .map_err(|err| match err {
            CoreError::NotFound { id: 0, .. } => ApiError::ResourceNotFound {
                resource_type: String::from("Classroom"),
                message: String::from("You are not assigned to a classroom"),
            },
            other => translate_core_error(other),
        })?;

    Ok(ClassroomDetailsResponse {
        classroom: ClassroomInfo::from(&details.classroom),
        teacher: details.teacher.as_ref().map(UserInfo::from),
        students: details.students.iter().map(UserInfo::from).collect(),
    })
}

/// Lists the students of the acting student's classroom.
///
/// # Errors
///
/// Returns an error unless the actor is a student of `classroom_id`.
pub fn list_classroom_students(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    classroom_id: i64,
) -> Result<ListClassroomStudentsResponse, ApiError> {
    let students: Vec<User> = roster::list_classroom_students(
        persistence,
        &actor.to_actor(),
        ClassroomId::new(classroom_id),
    )
    .map_err(translate_core_error)?;

    Ok(ListClassroomStudentsResponse {
        classroom_id,
        students: students.iter().map(UserInfo::from).collect(),
    })
}

/// Returns the timetable of the acting student's classroom.
///
/// # Errors
///
/// Returns an error unless the actor is a student of `classroom_id`.
pub fn view_timetable(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    classroom_id: i64,
) -> Result<TimetableResponse, ApiError> {
    let periods: Vec<Period> =
        roster::view_timetable(persistence, &actor.to_actor(), ClassroomId::new(classroom_id))
            .map_err(translate_core_error)?;

    Ok(TimetableResponse {
        classroom_id,
        periods: periods.iter().map(PeriodInfo::from).collect(),
    })
}
