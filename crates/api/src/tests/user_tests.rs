// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for user registration and lookup.

use crate::tests::helpers::{
    actor_for, create_register_request, create_test_persistence, create_test_principal,
    create_test_user,
};
use crate::{ApiError, get_user, list_users, register_user};

#[test]
fn test_principal_registers_any_role() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);

    for (name, role) in [
        ("Second Principal", "Principal"),
        ("Alan Turing", "teacher"),
        ("Kid One", "STUDENT"),
    ] {
        let response = register_user(
            &mut persistence,
            &create_register_request(name, role),
            &principal,
        )
        .unwrap();
        assert_eq!(response.user.full_name, name);
        assert_eq!(response.user.classroom_id, None);
    }

    assert_eq!(
        list_users(&mut persistence, &principal).unwrap().users.len(),
        4
    );
}

#[test]
fn test_teacher_registers_students_only() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);
    let teacher = actor_for(&create_test_user(
        &mut persistence,
        &principal,
        "Alan Turing",
        "Teacher",
    ));

    let student = register_user(
        &mut persistence,
        &create_register_request("Kid One", "Student"),
        &teacher,
    );
    let colleague = register_user(
        &mut persistence,
        &create_register_request("Other Teacher", "Teacher"),
        &teacher,
    );

    assert!(student.is_ok());
    assert_eq!(colleague.unwrap_err().kind(), "Forbidden");
}

#[test]
fn test_student_cannot_register_or_list_users() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);
    let student = actor_for(&create_test_user(
        &mut persistence,
        &principal,
        "Kid One",
        "Student",
    ));

    let register = register_user(
        &mut persistence,
        &create_register_request("Kid Two", "Student"),
        &student,
    );
    let list = list_users(&mut persistence, &student);

    assert_eq!(register.unwrap_err().kind(), "Forbidden");
    assert_eq!(list.unwrap_err().kind(), "Forbidden");
}

#[test]
fn test_duplicate_email_is_already_exists() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);
    create_test_user(&mut persistence, &principal, "Kid One", "Student");

    let err = register_user(
        &mut persistence,
        &create_register_request("Kid One", "Student"),
        &principal,
    )
    .unwrap_err();

    assert_eq!(err.kind(), "AlreadyExists");
}

#[test]
fn test_unknown_role_is_invalid_input() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);

    let err = register_user(
        &mut persistence,
        &create_register_request("Someone", "Janitor"),
        &principal,
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "role"));
}

#[test]
fn test_get_user() {
    let mut persistence = create_test_persistence();
    let principal = create_test_principal(&mut persistence);
    let teacher = create_test_user(&mut persistence, &principal, "Alan Turing", "Teacher");

    let found = get_user(&mut persistence, &principal, teacher.user_id).unwrap();
    let missing = get_user(&mut persistence, &principal, 9_999).unwrap_err();

    assert_eq!(found, teacher);
    assert!(matches!(missing, ApiError::ResourceNotFound { .. }));
}
