// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{Classroom, ClassroomId, Period, Role, User};

use crate::error::{CoreError, EntityKind};
use crate::policy::{Action, Actor, authorize};
use crate::store::EntityStore;

/// A classroom together with the users bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomDetails {
    /// The classroom record.
    pub classroom: Classroom,
    /// The bound teacher, if any.
    pub teacher: Option<User>,
    /// The bound students, in membership order.
    pub students: Vec<User>,
}

/// Lists every classroom.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Principal.
pub fn list_classrooms<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
) -> Result<Vec<Classroom>, CoreError> {
    authorize(actor, Action::ListClassrooms)?;
    Ok(store.list_classrooms()?)
}

/// Returns the classroom the acting student is bound to.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Student, and `NotFound` if the
/// student has no classroom.
pub fn own_classroom_details<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
) -> Result<ClassroomDetails, CoreError> {
    authorize(actor, Action::ViewOwnClassroom)?;

    let student: User = store.find_user_by_id(actor.user_id)?;
    let Some(classroom_id) = student.assigned_classroom else {
        tracing::debug!(student_id = %actor.user_id, "Student has no classroom");
        return Err(CoreError::NotFound {
            entity: EntityKind::Classroom,
            id: 0,
        });
    };

    let classroom: Classroom = store.find_classroom_by_id(classroom_id)?;
    let teacher: Option<User> = match classroom.teacher {
        Some(teacher_id) => store
            .find_users_by_ids_and_role(&[teacher_id], Role::Teacher)?
            .into_iter()
            .next(),
        None => None,
    };
    let students: Vec<User> =
        store.find_users_by_ids_and_role(&classroom.students, Role::Student)?;

    Ok(ClassroomDetails {
        classroom,
        teacher,
        students,
    })
}

/// Lists the students of the acting student's own classroom.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Student bound to `classroom_id`.
pub fn list_classroom_students<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    classroom_id: ClassroomId,
) -> Result<Vec<User>, CoreError> {
    let classroom: Classroom =
        load_own_classroom(store, actor, Action::ListClassroomStudents, classroom_id)?;
    Ok(store.find_users_by_ids_and_role(&classroom.students, Role::Student)?)
}

/// Returns the timetable of the acting student's own classroom.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor is a Student bound to `classroom_id`.
pub fn view_timetable<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    classroom_id: ClassroomId,
) -> Result<Vec<Period>, CoreError> {
    let classroom: Classroom =
        load_own_classroom(store, actor, Action::ViewTimetable, classroom_id)?;
    Ok(classroom.timetable)
}

fn load_own_classroom<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    action: Action,
    classroom_id: ClassroomId,
) -> Result<Classroom, CoreError> {
    authorize(actor, action)?;

    let student: User = store.find_user_by_id(actor.user_id)?;
    if !student.is_assigned_to(classroom_id) {
        return Err(CoreError::forbidden(
            action,
            actor.role,
            format!("not a member of classroom {classroom_id}"),
        ));
    }

    Ok(store.find_classroom_by_id(classroom_id)?)
}
