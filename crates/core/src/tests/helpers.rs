// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use roster_domain::{
    Classroom, ClassroomId, NewClassroom, NewUser, OperatingHours, Period, Role, TimeOfDay, User,
    UserId, Weekday,
};

use crate::{Actor, EntityKind, EntityStore, StoreError};

/// An `EntityStore` backed by maps, with version checks and fault injection.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: BTreeMap<i64, User>,
    classrooms: BTreeMap<i64, Classroom>,
    next_user_id: i64,
    next_classroom_id: i64,
    /// Number of upcoming `save_classroom` calls that fail with `Conflict`.
    pub fail_classroom_saves: usize,
    /// Number of upcoming `save_user` calls that fail with `Conflict`.
    pub fail_user_saves: usize,
    /// Total successful writes, used to assert that rejected calls wrote nothing.
    pub writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, user_id: UserId) -> User {
        self.users[&user_id.value()].clone()
    }

    pub fn classroom(&self, classroom_id: ClassroomId) -> Classroom {
        self.classrooms[&classroom_id.value()].clone()
    }

    pub fn remove_classroom(&mut self, classroom_id: ClassroomId) {
        self.classrooms.remove(&classroom_id.value());
    }
}

impl EntityStore for InMemoryStore {
    fn find_user_by_id(&mut self, user_id: UserId) -> Result<User, StoreError> {
        self.users
            .get(&user_id.value())
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: EntityKind::User,
                id: user_id.value(),
            })
    }

    fn find_users_by_ids_and_role(
        &mut self,
        user_ids: &[UserId],
        role: Role,
    ) -> Result<Vec<User>, StoreError> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(&id.value()))
            .filter(|user| user.role == role)
            .cloned()
            .collect())
    }

    fn find_classroom_by_id(
        &mut self,
        classroom_id: ClassroomId,
    ) -> Result<Classroom, StoreError> {
        self.classrooms
            .get(&classroom_id.value())
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Classroom,
                id: classroom_id.value(),
            })
    }

    fn save_user(&mut self, user: &User) -> Result<User, StoreError> {
        let id = user.user_id.value();
        let conflict = StoreError::Conflict {
            entity: EntityKind::User,
            id,
        };
        if self.fail_user_saves > 0 {
            self.fail_user_saves -= 1;
            return Err(conflict);
        }
        let stored = self.users.get_mut(&id).ok_or(StoreError::NotFound {
            entity: EntityKind::User,
            id,
        })?;
        if stored.version != user.version {
            return Err(conflict);
        }
        let mut saved = user.clone();
        saved.version += 1;
        *stored = saved.clone();
        self.writes += 1;
        Ok(saved)
    }

    fn save_classroom(&mut self, classroom: &Classroom) -> Result<Classroom, StoreError> {
        let id = classroom.classroom_id.value();
        let conflict = StoreError::Conflict {
            entity: EntityKind::Classroom,
            id,
        };
        if self.fail_classroom_saves > 0 {
            self.fail_classroom_saves -= 1;
            return Err(conflict);
        }
        let stored = self.classrooms.get_mut(&id).ok_or(StoreError::NotFound {
            entity: EntityKind::Classroom,
            id,
        })?;
        if stored.version != classroom.version {
            return Err(conflict);
        }
        let mut saved = classroom.clone();
        saved.version += 1;
        *stored = saved.clone();
        self.writes += 1;
        Ok(saved)
    }

    fn create_user(&mut self, user: &NewUser, _password: &str) -> Result<User, StoreError> {
        if self.users.values().any(|u| u.email == user.email()) {
            return Err(StoreError::Duplicate {
                field: String::from("email"),
                value: user.email().to_string(),
            });
        }
        self.next_user_id += 1;
        let created = User {
            user_id: UserId::new(self.next_user_id),
            full_name: user.full_name().to_string(),
            email: user.email().to_string(),
            role: user.role(),
            assigned_classroom: None,
            version: 0,
        };
        self.users.insert(self.next_user_id, created.clone());
        self.writes += 1;
        Ok(created)
    }

    fn create_classroom(&mut self, classroom: &NewClassroom) -> Result<Classroom, StoreError> {
        self.next_classroom_id += 1;
        let created = Classroom {
            classroom_id: ClassroomId::new(self.next_classroom_id),
            name: classroom.name().to_string(),
            hours: classroom.hours(),
            days: classroom.days().to_vec(),
            teacher: None,
            students: Vec::new(),
            timetable: Vec::new(),
            version: 0,
        };
        self.classrooms
            .insert(self.next_classroom_id, created.clone());
        self.writes += 1;
        Ok(created)
    }

    fn list_classrooms(&mut self) -> Result<Vec<Classroom>, StoreError> {
        Ok(self.classrooms.values().cloned().collect())
    }

    fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.values().cloned().collect())
    }

    fn count_users(&mut self) -> Result<i64, StoreError> {
        Ok(i64::try_from(self.users.len()).unwrap())
    }
}

pub fn t(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::from_hm(hour, minute).unwrap()
}

pub fn create_test_period(subject: &str, day: Weekday, start: (u8, u8), end: (u8, u8)) -> Period {
    Period::new(
        subject.to_string(),
        day,
        t(start.0, start.1),
        t(end.0, end.1),
    )
}

/// A classroom open 08:00-15:00, Monday to Friday.
pub fn create_test_classroom(store: &mut InMemoryStore, name: &str) -> Classroom {
    let hours = OperatingHours::new(t(8, 0), t(15, 0)).unwrap();
    let new_classroom = NewClassroom::new(
        name,
        hours,
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ],
    )
    .unwrap();
    store.create_classroom(&new_classroom).unwrap()
}

pub fn create_test_user(store: &mut InMemoryStore, name: &str, role: Role) -> User {
    let email = format!("{}@school.test", name.to_lowercase().replace(' ', "."));
    let new_user = NewUser::new(name, &email, role).unwrap();
    store.create_user(&new_user, "Secret-Password-1").unwrap()
}

pub fn actor_for(user: &User) -> Actor {
    Actor::new(user.user_id, user.role)
}

pub fn create_test_principal(store: &mut InMemoryStore) -> Actor {
    let principal = create_test_user(store, "Pat Principal", Role::Principal);
    actor_for(&principal)
}
