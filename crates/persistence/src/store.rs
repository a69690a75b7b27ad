// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster::{EntityStore, StoreError};
use roster_domain::{Classroom, ClassroomId, NewClassroom, NewUser, Role, User, UserId};

use crate::Persistence;

impl EntityStore for Persistence {
    fn find_user_by_id(&mut self, user_id: UserId) -> Result<User, StoreError> {
        Ok(self.get_user(user_id)?)
    }

    fn find_users_by_ids_and_role(
        &mut self,
        user_ids: &[UserId],
        role: Role,
    ) -> Result<Vec<User>, StoreError> {
        Ok(self.get_users_by_ids_and_role(user_ids, role)?)
    }

    fn find_classroom_by_id(
        &mut self,
        classroom_id: ClassroomId,
    ) -> Result<Classroom, StoreError> {
        Ok(self.get_classroom(classroom_id)?)
    }

    fn save_user(&mut self, user: &User) -> Result<User, StoreError> {
        Ok(self.update_user(user)?)
    }

    fn save_classroom(&mut self, classroom: &Classroom) -> Result<Classroom, StoreError> {
        Ok(self.update_classroom(classroom)?)
    }

    fn create_user(&mut self, user: &NewUser, password: &str) -> Result<User, StoreError> {
        Ok(Self::create_user(self, user, password)?)
    }

    fn create_classroom(&mut self, classroom: &NewClassroom) -> Result<Classroom, StoreError> {
        Ok(Self::create_classroom(self, classroom)?)
    }

    fn list_classrooms(&mut self) -> Result<Vec<Classroom>, StoreError> {
        Ok(Self::list_classrooms(self)?)
    }

    fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        Ok(Self::list_users(self)?)
    }

    fn count_users(&mut self) -> Result<i64, StoreError> {
        Ok(Self::count_users(self)?)
    }
}
