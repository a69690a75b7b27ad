// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{Classroom, ClassroomId, Role, User, Weekday};

use crate::PersistenceError;
use crate::tests::{
    create_test_classroom, create_test_period, create_test_persistence, create_test_user, t,
};

#[test]
fn test_create_classroom_starts_empty() {
    let mut persistence = create_test_persistence();

    let classroom: Classroom = create_test_classroom(&mut persistence, "Room 1");

    assert_eq!(classroom.name, "Room 1");
    assert_eq!(classroom.hours.start(), t(8, 0));
    assert_eq!(classroom.hours.end(), t(15, 0));
    assert_eq!(
        classroom.days,
        vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
    );
    assert_eq!(classroom.teacher, None);
    assert!(classroom.students.is_empty());
    assert!(classroom.timetable.is_empty());
    assert_eq!(classroom.version, 0);
}

#[test]
fn test_get_classroom_not_found() {
    let mut persistence = create_test_persistence();

    let result = persistence.get_classroom(ClassroomId::new(12));

    assert!(matches!(
        result,
        Err(PersistenceError::ClassroomNotFound(12))
    ));
}

#[test]
fn test_classroom_documents_survive_a_write() {
    let mut persistence = create_test_persistence();
    let teacher: User = create_test_user(&mut persistence, "Alan Turing", Role::Teacher);
    let student: User = create_test_user(&mut persistence, "Kid One", Role::Student);
    let mut classroom: Classroom = create_test_classroom(&mut persistence, "Room 1");

    classroom.teacher = Some(teacher.user_id);
    classroom.add_student(student.user_id);
    classroom.timetable = vec![
        create_test_period("Math", Weekday::Monday, (8, 0), (9, 0)),
        create_test_period("Art", Weekday::Wednesday, (13, 30), (14, 45)),
    ];
    persistence.update_classroom(&classroom).unwrap();

    let reloaded: Classroom = persistence.get_classroom(classroom.classroom_id).unwrap();
    assert_eq!(reloaded.teacher, Some(teacher.user_id));
    assert_eq!(reloaded.students, vec![student.user_id]);
    assert_eq!(reloaded.timetable, classroom.timetable);
    assert_eq!(reloaded.version, 1);
}

#[test]
fn test_update_classroom_with_stale_version_conflicts() {
    let mut persistence = create_test_persistence();
    let classroom: Classroom = create_test_classroom(&mut persistence, "Room 1");

    let mut first: Classroom = classroom.clone();
    let mut second: Classroom = classroom;

    first
        .timetable
        .push(create_test_period("Math", Weekday::Monday, (8, 0), (9, 0)));
    persistence.update_classroom(&first).unwrap();

    second
        .timetable
        .push(create_test_period("Music", Weekday::Monday, (8, 30), (9, 30)));
    let result = persistence.update_classroom(&second);

    assert!(matches!(
        result,
        Err(PersistenceError::VersionConflict { .. })
    ));
    let stored: Classroom = persistence.get_classroom(first.classroom_id).unwrap();
    assert_eq!(stored.timetable, first.timetable);
}

#[test]
fn test_update_missing_classroom_is_not_found() {
    let mut persistence = create_test_persistence();
    let mut classroom: Classroom = create_test_classroom(&mut persistence, "Room 1");
    classroom.classroom_id = ClassroomId::new(99);

    let result = persistence.update_classroom(&classroom);

    assert!(matches!(
        result,
        Err(PersistenceError::ClassroomNotFound(99))
    ));
}

#[test]
fn test_list_classrooms() {
    let mut persistence = create_test_persistence();
    create_test_classroom(&mut persistence, "Room 1");
    create_test_classroom(&mut persistence, "Room 2");

    let names: Vec<String> = persistence
        .list_classrooms()
        .unwrap()
        .into_iter()
        .map(|classroom| classroom.name)
        .collect();

    assert_eq!(names, vec!["Room 1", "Room 2"]);
}
