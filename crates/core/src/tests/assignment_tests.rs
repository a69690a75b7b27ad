// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{ClassroomId, Role, UserId};

use crate::{
    CoreError, EntityKind, ErrorKind, ReconcileOutcome, assign_students, assign_teacher,
    reconcile_teacher_assignment,
};

use super::helpers::{
    InMemoryStore, actor_for, create_test_classroom, create_test_principal, create_test_user,
};

// ============================================================================
// assign_teacher
// ============================================================================

#[test]
fn test_assign_teacher_binds_both_records() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");

    let result =
        assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id).unwrap();

    assert_eq!(result.teacher.assigned_classroom, Some(classroom.classroom_id));
    assert_eq!(result.classroom.teacher, Some(teacher.user_id));
    assert_eq!(
        store.user(teacher.user_id).assigned_classroom,
        Some(classroom.classroom_id)
    );
    assert_eq!(
        store.classroom(classroom.classroom_id).teacher,
        Some(teacher.user_id)
    );
}

#[test]
fn test_assign_teacher_missing_teacher_is_not_found() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");

    let err = assign_teacher(&mut store, &principal, UserId::new(999), classroom.classroom_id)
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::NotFound {
            entity: EntityKind::User,
            id: 999
        }
    );
}

#[test]
fn test_assign_teacher_missing_classroom_is_not_found() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);

    let err =
        assign_teacher(&mut store, &principal, teacher.user_id, ClassroomId::new(42)).unwrap_err();

    assert_eq!(
        err,
        CoreError::NotFound {
            entity: EntityKind::Classroom,
            id: 42
        }
    );
}

#[test]
fn test_assign_teacher_rejects_student() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let student = create_test_user(&mut store, "Sam Student", Role::Student);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let writes_before = store.writes;

    let err = assign_teacher(&mut store, &principal, student.user_id, classroom.classroom_id)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRole);
    assert_eq!(store.writes, writes_before);
}

#[test]
fn test_assign_teacher_requires_principal() {
    let mut store = InMemoryStore::new();
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let writes_before = store.writes;

    let err = assign_teacher(
        &mut store,
        &actor_for(&teacher),
        teacher.user_id,
        classroom.classroom_id,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(store.writes, writes_before);
}

#[test]
fn test_reassigning_assigned_teacher_fails_without_touching_classroom() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let room_one = create_test_classroom(&mut store, "Room 1");
    let room_two = create_test_classroom(&mut store, "Room 2");
    assign_teacher(&mut store, &principal, teacher.user_id, room_one.classroom_id).unwrap();
    let room_two_before = store.classroom(room_two.classroom_id);

    let err = assign_teacher(&mut store, &principal, teacher.user_id, room_two.classroom_id)
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::AlreadyAssigned {
            teacher_id: teacher.user_id,
            classroom_id: room_one.classroom_id,
        }
    );
    assert_eq!(store.classroom(room_two.classroom_id), room_two_before);
}

#[test]
fn test_assigning_teacher_to_same_classroom_twice_fails() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id).unwrap();

    let err = assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyAssigned);
}

#[test]
fn test_classroom_with_teacher_rejects_second_teacher() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let first = create_test_user(&mut store, "First Teacher", Role::Teacher);
    let second = create_test_user(&mut store, "Second Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    assign_teacher(&mut store, &principal, first.user_id, classroom.classroom_id).unwrap();

    let err = assign_teacher(&mut store, &principal, second.user_id, classroom.classroom_id)
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::ClassroomHasTeacher {
            classroom_id: classroom.classroom_id,
            teacher_id: first.user_id,
        }
    );
    assert_eq!(err.kind(), ErrorKind::AlreadyAssigned);
    assert_eq!(store.user(second.user_id).assigned_classroom, None);
}

#[test]
fn test_at_most_one_teacher_per_classroom_after_many_attempts() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let rooms: Vec<_> = (0..3)
        .map(|i| create_test_classroom(&mut store, &format!("Room {i}")))
        .collect();
    let teachers: Vec<_> = (0..4)
        .map(|i| create_test_user(&mut store, &format!("Teacher {i}"), Role::Teacher))
        .collect();

    for teacher in &teachers {
        for room in &rooms {
            let _ = assign_teacher(&mut store, &principal, teacher.user_id, room.classroom_id);
        }
    }

    for room in &rooms {
        let stored = store.classroom(room.classroom_id);
        let holders: Vec<_> = teachers
            .iter()
            .filter(|t| store.user(t.user_id).assigned_classroom == Some(room.classroom_id))
            .collect();
        assert!(holders.len() <= 1);
        if let Some(holder) = holders.first() {
            assert_eq!(stored.teacher, Some(holder.user_id));
        }
    }
}

#[test]
fn test_failed_classroom_write_reports_incomplete_assignment() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    store.fail_classroom_saves = 1;

    let err = assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id)
        .unwrap_err();

    assert!(matches!(err, CoreError::IncompleteAssignment { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(!err.is_retryable());
    assert_eq!(
        store.user(teacher.user_id).assigned_classroom,
        Some(classroom.classroom_id)
    );
    assert_eq!(store.classroom(classroom.classroom_id).teacher, None);
}

#[test]
fn test_failed_teacher_write_writes_nothing() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    store.fail_user_saves = 1;

    let err = assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id)
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(store.user(teacher.user_id).assigned_classroom, None);
    assert_eq!(store.classroom(classroom.classroom_id).teacher, None);
}

// ============================================================================
// reconcile_teacher_assignment
// ============================================================================

#[test]
fn test_reconcile_completes_half_applied_assignment() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    store.fail_classroom_saves = 1;
    let _ = assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id);

    let outcome = reconcile_teacher_assignment(&mut store, &principal, teacher.user_id).unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Completed(_)));
    assert_eq!(
        store.classroom(classroom.classroom_id).teacher,
        Some(teacher.user_id)
    );
}

#[test]
fn test_reconcile_releases_teacher_when_classroom_taken() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let first = create_test_user(&mut store, "First Teacher", Role::Teacher);
    let second = create_test_user(&mut store, "Second Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    store.fail_classroom_saves = 1;
    let _ = assign_teacher(&mut store, &principal, first.user_id, classroom.classroom_id);
    // The classroom side is still empty, so another writer claims it.
    let mut claimed = store.classroom(classroom.classroom_id);
    claimed.teacher = Some(second.user_id);
    crate::EntityStore::save_classroom(&mut store, &claimed).unwrap();

    let outcome = reconcile_teacher_assignment(&mut store, &principal, first.user_id).unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Released {
            held_by: Some(second.user_id)
        }
    );
    assert_eq!(store.user(first.user_id).assigned_classroom, None);
    assert_eq!(
        store.classroom(classroom.classroom_id).teacher,
        Some(second.user_id)
    );
}

#[test]
fn test_reconcile_releases_teacher_of_missing_classroom() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    assign_teacher(&mut store, &principal, teacher.user_id, classroom.classroom_id).unwrap();
    store.remove_classroom(classroom.classroom_id);

    let outcome = reconcile_teacher_assignment(&mut store, &principal, teacher.user_id).unwrap();

    assert_eq!(outcome, ReconcileOutcome::Released { held_by: None });
    assert_eq!(store.user(teacher.user_id).assigned_classroom, None);
}

#[test]
fn test_reconcile_consistent_and_unassigned() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let bound = create_test_user(&mut store, "Bound Teacher", Role::Teacher);
    let free = create_test_user(&mut store, "Free Teacher", Role::Teacher);
    let classroom = create_test_classroom(&mut store, "Room 1");
    assign_teacher(&mut store, &principal, bound.user_id, classroom.classroom_id).unwrap();
    let writes_before = store.writes;

    assert_eq!(
        reconcile_teacher_assignment(&mut store, &principal, bound.user_id).unwrap(),
        ReconcileOutcome::Consistent
    );
    assert_eq!(
        reconcile_teacher_assignment(&mut store, &principal, free.user_id).unwrap(),
        ReconcileOutcome::Unassigned
    );
    assert_eq!(store.writes, writes_before);
}

// ============================================================================
// assign_students
// ============================================================================

#[test]
fn test_assign_students_binds_each_student() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);
    let bob = create_test_user(&mut store, "Bob Student", Role::Student);

    let result = assign_students(
        &mut store,
        &principal,
        classroom.classroom_id,
        &[alice.user_id, bob.user_id],
    )
    .unwrap();

    assert_eq!(result.students.len(), 2);
    assert_eq!(result.classroom.students, vec![alice.user_id, bob.user_id]);
    for student in [&alice, &bob] {
        assert!(store.user(student.user_id).is_assigned_to(classroom.classroom_id));
    }
}

#[test]
fn test_assign_students_skips_non_students_and_unknown_ids() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);

    let result = assign_students(
        &mut store,
        &principal,
        classroom.classroom_id,
        &[alice.user_id, teacher.user_id, UserId::new(404)],
    )
    .unwrap();

    assert_eq!(result.students.len(), 1);
    assert_eq!(result.students[0].user_id, alice.user_id);
    assert_eq!(store.user(teacher.user_id).assigned_classroom, None);
}

#[test]
fn test_assign_students_twice_does_not_duplicate() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);
    let bob = create_test_user(&mut store, "Bob Student", Role::Student);
    let ids = [alice.user_id, bob.user_id];

    assign_students(&mut store, &principal, classroom.classroom_id, &ids).unwrap();
    let writes_after_first = store.writes;
    let second = assign_students(&mut store, &principal, classroom.classroom_id, &ids).unwrap();

    assert_eq!(second.classroom.students.len(), 2);
    assert_eq!(store.classroom(classroom.classroom_id).students.len(), 2);
    assert_eq!(store.writes, writes_after_first);
}

#[test]
fn test_assign_students_collapses_repeated_ids() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);

    let result = assign_students(
        &mut store,
        &principal,
        classroom.classroom_id,
        &[alice.user_id, alice.user_id],
    )
    .unwrap();

    assert_eq!(result.students.len(), 1);
    assert_eq!(result.classroom.students, vec![alice.user_id]);
}

#[test]
fn test_moving_student_prunes_old_classroom() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let room_one = create_test_classroom(&mut store, "Room 1");
    let room_two = create_test_classroom(&mut store, "Room 2");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);
    let bob = create_test_user(&mut store, "Bob Student", Role::Student);
    assign_students(
        &mut store,
        &principal,
        room_one.classroom_id,
        &[alice.user_id, bob.user_id],
    )
    .unwrap();

    assign_students(&mut store, &principal, room_two.classroom_id, &[alice.user_id]).unwrap();

    assert_eq!(store.classroom(room_one.classroom_id).students, vec![bob.user_id]);
    assert_eq!(
        store.classroom(room_two.classroom_id).students,
        vec![alice.user_id]
    );
    assert!(store.user(alice.user_id).is_assigned_to(room_two.classroom_id));
}

#[test]
fn test_assign_students_missing_classroom_is_not_found() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);

    let err = assign_students(&mut store, &principal, ClassroomId::new(9), &[alice.user_id])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.user(alice.user_id).assigned_classroom, None);
}

#[test]
fn test_student_cannot_assign_students() {
    let mut store = InMemoryStore::new();
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);

    let err = assign_students(
        &mut store,
        &actor_for(&alice),
        classroom.classroom_id,
        &[alice.user_id],
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn test_teacher_can_assign_students() {
    let mut store = InMemoryStore::new();
    let classroom = create_test_classroom(&mut store, "Room 1");
    let teacher = create_test_user(&mut store, "Tess Teacher", Role::Teacher);
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);

    let result = assign_students(
        &mut store,
        &actor_for(&teacher),
        classroom.classroom_id,
        &[alice.user_id],
    )
    .unwrap();

    assert_eq!(result.students.len(), 1);
}

#[test]
fn test_assign_students_retry_after_conflict_converges() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let alice = create_test_user(&mut store, "Alice Student", Role::Student);
    store.fail_classroom_saves = 1;

    let err = assign_students(&mut store, &principal, classroom.classroom_id, &[alice.user_id])
        .unwrap_err();
    assert!(err.is_retryable());

    let result =
        assign_students(&mut store, &principal, classroom.classroom_id, &[alice.user_id]).unwrap();

    assert_eq!(result.classroom.students, vec![alice.user_id]);
    assert!(store.user(alice.user_id).is_assigned_to(classroom.classroom_id));
}

#[test]
fn test_empty_student_list_changes_nothing() {
    let mut store = InMemoryStore::new();
    let principal = create_test_principal(&mut store);
    let classroom = create_test_classroom(&mut store, "Room 1");
    let writes_before = store.writes;

    let result = assign_students(&mut store, &principal, classroom.classroom_id, &[]).unwrap();

    assert!(result.students.is_empty());
    assert_eq!(store.writes, writes_before);
}
