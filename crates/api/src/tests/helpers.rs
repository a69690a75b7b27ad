// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use roster_persistence::Persistence;

use crate::{
    AssignStudentsRequest, AssignTeacherRequest, AuthenticatedActor, ClassroomInfo,
    CreateClassroomRequest, CreateFirstPrincipalRequest, PeriodInfo, RegisterUserRequest,
    RetryPolicy, UserInfo, assign_students, assign_teacher, create_classroom,
    create_first_principal, register_user,
};

pub const TEST_PASSWORD: &str = "Ch@lkB0ard-42";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_retry() -> RetryPolicy {
    RetryPolicy::new(2)
}

fn email_for(full_name: &str) -> String {
    format!("{}@school.test", full_name.to_lowercase().replace(' ', "."))
}

pub fn create_test_principal(persistence: &mut Persistence) -> AuthenticatedActor {
    let request = CreateFirstPrincipalRequest {
        full_name: String::from("Grace Hopper"),
        email: email_for("Grace Hopper"),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
    };
    let response = create_first_principal(persistence, &request).unwrap();
    actor_for(&response.user)
}

pub fn create_register_request(full_name: &str, role: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        full_name: full_name.to_string(),
        email: email_for(full_name),
        role: role.to_string(),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
    }
}

pub fn create_test_user(
    persistence: &mut Persistence,
    principal: &AuthenticatedActor,
    full_name: &str,
    role: &str,
) -> UserInfo {
    register_user(
        persistence,
        &create_register_request(full_name, role),
        principal,
    )
    .unwrap()
    .user
}

pub fn actor_for(user: &UserInfo) -> AuthenticatedActor {
    AuthenticatedActor::new(
        roster_domain::UserId::new(user.user_id),
        user.email.clone(),
        user.role.parse().unwrap(),
    )
}

pub fn create_classroom_request(name: &str, days: &[&str]) -> CreateClassroomRequest {
    CreateClassroomRequest {
        name: name.to_string(),
        start_time: String::from("08:00"),
        end_time: String::from("15:00"),
        days: days.iter().map(ToString::to_string).collect(),
    }
}

pub fn create_test_classroom(
    persistence: &mut Persistence,
    principal: &AuthenticatedActor,
    name: &str,
) -> ClassroomInfo {
    create_classroom(
        persistence,
        &create_classroom_request(name, &["Monday", "Wednesday"]),
        principal,
    )
    .unwrap()
    .classroom
}

pub fn period(subject: &str, day: &str, start: &str, end: &str) -> PeriodInfo {
    PeriodInfo {
        subject: subject.to_string(),
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

/// A classroom with an assigned teacher and one assigned student.
pub struct TestSchool {
    pub principal: AuthenticatedActor,
    pub teacher: AuthenticatedActor,
    pub student: AuthenticatedActor,
    pub classroom_id: i64,
}

pub fn create_test_school(persistence: &mut Persistence) -> TestSchool {
    let principal: AuthenticatedActor = create_test_principal(persistence);
    let teacher: UserInfo = create_test_user(persistence, &principal, "Alan Turing", "Teacher");
    let student: UserInfo = create_test_user(persistence, &principal, "Kid One", "Student");
    let classroom: ClassroomInfo = create_test_classroom(persistence, &principal, "Room 1");

    assign_teacher(
        persistence,
        &principal,
        classroom.classroom_id,
        &AssignTeacherRequest {
            teacher_id: teacher.user_id,
        },
        create_test_retry(),
    )
    .unwrap();
    assign_students(
        persistence,
        &principal,
        classroom.classroom_id,
        &AssignStudentsRequest {
            student_ids: vec![student.user_id],
        },
        create_test_retry(),
    )
    .unwrap();

    TestSchool {
        principal,
        teacher: actor_for(&teacher),
        student: actor_for(&student),
        classroom_id: classroom.classroom_id,
    }
}
