// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Teacher and student classroom bindings.
//!
//! A binding is stored twice: once on the `User` and once on the `Classroom`.
//! The store has no multi-record transaction, so every operation here checks
//! all preconditions first and then writes in a fixed order. Each write is
//! version-checked, which turns concurrent edits into `CoreError::Conflict`.

use std::collections::BTreeMap;

use roster_domain::{Classroom, ClassroomId, Role, User, UserId};

use crate::error::{CoreError, EntityKind};
use crate::policy::{Action, Actor, authorize};
use crate::store::EntityStore;

/// The records written by a successful teacher assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherAssignment {
    /// The teacher with its new classroom binding.
    pub teacher: User,
    /// The classroom with its new teacher.
    pub classroom: Classroom,
}

/// The records written by a student assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAssignment {
    /// The target classroom after the assignment.
    pub classroom: Classroom,
    /// Every student that resolved and is now bound to the classroom.
    pub students: Vec<User>,
}

/// What `reconcile_teacher_assignment` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The teacher has no classroom binding; nothing to do.
    Unassigned,
    /// Both records already agree.
    Consistent,
    /// The classroom side was missing and has been written.
    Completed(TeacherAssignment),
    /// The classroom belongs to someone else or no longer exists, so the
    /// teacher's binding was cleared.
    Released {
        /// The teacher currently holding the classroom, if any.
        held_by: Option<UserId>,
    },
}

/// Binds a teacher to a classroom.
///
/// Writes the teacher first, then the classroom. If the classroom write fails
/// after the teacher write succeeded, the error is
/// `CoreError::IncompleteAssignment` and the caller should run
/// [`reconcile_teacher_assignment`].
///
/// # Errors
///
/// - `Forbidden` if the actor is not a Principal.
/// - `NotFound` if the teacher or classroom does not exist.
/// - `InvalidRole` if the user is not a Teacher.
/// - `AlreadyAssigned` if the teacher already has a classroom, or the
///   classroom already has another teacher.
/// - `Conflict` if the teacher record changed since it was read.
pub fn assign_teacher<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    teacher_id: UserId,
    classroom_id: ClassroomId,
) -> Result<TeacherAssignment, CoreError> {
    authorize(actor, Action::AssignTeacher)?;

    let mut teacher: User = store.find_user_by_id(teacher_id)?;
    let mut classroom: Classroom = store.find_classroom_by_id(classroom_id)?;

    if teacher.role != Role::Teacher {
        return Err(CoreError::InvalidRole {
            user_id: teacher_id,
            expected: Role::Teacher,
            actual: teacher.role,
        });
    }

    if let Some(existing) = teacher.assigned_classroom {
        return Err(CoreError::AlreadyAssigned {
            teacher_id,
            classroom_id: existing,
        });
    }

    if let Some(holder) = classroom.teacher {
        return Err(CoreError::ClassroomHasTeacher {
            classroom_id,
            teacher_id: holder,
        });
    }

    teacher.assigned_classroom = Some(classroom_id);
    let teacher: User = store.save_user(&teacher)?;

    classroom.teacher = Some(teacher_id);
    let classroom: Classroom = match store.save_classroom(&classroom) {
        Ok(saved) => saved,
        Err(err) => {
            tracing::warn!(
                teacher_id = %teacher_id,
                classroom_id = %classroom_id,
                error = %err,
                "Teacher saved but classroom write failed; assignment needs reconciliation"
            );
            return Err(CoreError::IncompleteAssignment {
                teacher_id,
                classroom_id,
                cause: Box::new(err.into()),
            });
        }
    };

    tracing::info!(
        actor_id = %actor.user_id,
        teacher_id = %teacher_id,
        classroom_id = %classroom_id,
        "Assigned teacher to classroom"
    );

    Ok(TeacherAssignment { teacher, classroom })
}

/// Repairs a teacher binding left half-written by [`assign_teacher`].
///
/// Re-reads both records and makes them agree:
/// - if the classroom has no teacher, the classroom write is completed;
/// - if the classroom is held by another teacher or is gone, the teacher's
///   binding is cleared;
/// - otherwise nothing is written.
///
/// # Errors
///
/// - `Forbidden` if the actor is not a Principal.
/// - `NotFound` if the teacher does not exist.
/// - `InvalidRole` if the user is not a Teacher.
/// - `Conflict` if either record changed concurrently.
pub fn reconcile_teacher_assignment<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    teacher_id: UserId,
) -> Result<ReconcileOutcome, CoreError> {
    authorize(actor, Action::ReconcileAssignment)?;

    let mut teacher: User = store.find_user_by_id(teacher_id)?;
    if teacher.role != Role::Teacher {
        return Err(CoreError::InvalidRole {
            user_id: teacher_id,
            expected: Role::Teacher,
            actual: teacher.role,
        });
    }

    let Some(classroom_id) = teacher.assigned_classroom else {
        return Ok(ReconcileOutcome::Unassigned);
    };

    let mut classroom: Classroom = match store.find_classroom_by_id(classroom_id) {
        Ok(classroom) => classroom,
        Err(err) => {
            let err: CoreError = err.into();
            if !matches!(
                err,
                CoreError::NotFound {
                    entity: EntityKind::Classroom,
                    ..
                }
            ) {
                return Err(err);
            }
            teacher.assigned_classroom = None;
            store.save_user(&teacher)?;
            tracing::warn!(
                teacher_id = %teacher_id,
                classroom_id = %classroom_id,
                "Released teacher bound to a missing classroom"
            );
            return Ok(ReconcileOutcome::Released { held_by: None });
        }
    };

    match classroom.teacher {
        Some(holder) if holder == teacher_id => Ok(ReconcileOutcome::Consistent),
        Some(holder) => {
            teacher.assigned_classroom = None;
            store.save_user(&teacher)?;
            tracing::warn!(
                teacher_id = %teacher_id,
                classroom_id = %classroom_id,
                held_by = %holder,
                "Released teacher from a classroom held by another teacher"
            );
            Ok(ReconcileOutcome::Released {
                held_by: Some(holder),
            })
        }
        None => {
            classroom.teacher = Some(teacher_id);
            let classroom: Classroom = store.save_classroom(&classroom)?;
            tracing::info!(
                teacher_id = %teacher_id,
                classroom_id = %classroom_id,
                "Completed half-applied teacher assignment"
            );
            Ok(ReconcileOutcome::Completed(TeacherAssignment { teacher, classroom }))
        }
    }
}

/// Binds a set of students to a classroom.
///
/// Identifiers that do not resolve to a Student are skipped. Repeated
/// identifiers are processed once. A student bound to another classroom is
/// moved: they are removed from the old classroom's student set and then
/// bound to the new one.
///
/// Students already bound to the classroom are not rewritten, so running the
/// same call twice leaves the same result and a failed call can be retried.
///
/// # Errors
///
/// - `Forbidden` if the actor is neither a Principal nor a Teacher.
/// - `NotFound` if the classroom does not exist.
/// - `Conflict` if any touched record changed concurrently.
pub fn assign_students<S: EntityStore>(
    store: &mut S,
    actor: &Actor,
    classroom_id: ClassroomId,
    student_ids: &[UserId],
) -> Result<StudentAssignment, CoreError> {
    authorize(actor, Action::AssignStudents)?;

    let mut classroom: Classroom = store.find_classroom_by_id(classroom_id)?;

    let mut requested: Vec<UserId> = Vec::with_capacity(student_ids.len());
    for id in student_ids {
        if !requested.contains(id) {
            requested.push(*id);
        }
    }

    let resolved: Vec<User> = store.find_users_by_ids_and_role(&requested, Role::Student)?;
    if resolved.len() < requested.len() {
        tracing::debug!(
            classroom_id = %classroom_id,
            requested = requested.len(),
            resolved = resolved.len(),
            "Skipping ids that are not students"
        );
    }

    // Old classroom -> students leaving it.
    let mut departures: BTreeMap<ClassroomId, Vec<UserId>> = BTreeMap::new();
    for student in &resolved {
        if let Some(previous) = student
            .assigned_classroom
            .filter(|previous| *previous != classroom_id)
        {
            departures.entry(previous).or_default().push(student.user_id);
        }
    }

    for (previous_id, leaving) in &departures {
        prune_students(store, *previous_id, leaving)?;
    }

    let mut students: Vec<User> = Vec::with_capacity(resolved.len());
    for mut student in resolved {
        if !student.is_assigned_to(classroom_id) {
            student.assigned_classroom = Some(classroom_id);
            student = store.save_user(&student)?;
        }
        students.push(student);
    }

    let mut changed: bool = false;
    for student in &students {
        changed |= classroom.add_student(student.user_id);
    }
    if changed {
        classroom = store.save_classroom(&classroom)?;
    }

    tracing::info!(
        actor_id = %actor.user_id,
        classroom_id = %classroom_id,
        students = students.len(),
        moved = departures.values().map(Vec::len).sum::<usize>(),
        "Assigned students to classroom"
    );

    Ok(StudentAssignment {
        classroom,
        students,
    })
}

/// Removes departing students from their previous classroom.
///
/// A previous classroom that no longer exists has nothing to prune.
fn prune_students<S: EntityStore>(
    store: &mut S,
    classroom_id: ClassroomId,
    leaving: &[UserId],
) -> Result<(), CoreError> {
    let mut previous: Classroom = match store.find_classroom_by_id(classroom_id) {
        Ok(classroom) => classroom,
        Err(err) => {
            let err: CoreError = err.into();
            if matches!(
                err,
                CoreError::NotFound {
                    entity: EntityKind::Classroom,
                    ..
                }
            ) {
                return Ok(());
            }
            return Err(err);
        }
    };

    let mut changed: bool = false;
    for student_id in leaving {
        changed |= previous.remove_student(*student_id);
    }
    if changed {
        store.save_classroom(&previous)?;
    }
    Ok(())
}
