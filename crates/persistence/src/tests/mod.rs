// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod classroom_tests;

use roster_domain::{
    Classroom, NewClassroom, NewUser, OperatingHours, Period, Role, TimeOfDay, User, Weekday,
};

use crate::Persistence;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn t(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::from_hm(hour, minute).unwrap()
}

pub fn create_test_new_user(name: &str, role: Role) -> NewUser {
    let email: String = format!("{}@school.test", name.to_lowercase().replace(' ', "."));
    NewUser::new(name, &email, role).unwrap()
}

pub fn create_test_user(persistence: &mut Persistence, name: &str, role: Role) -> User {
    persistence
        .create_user(&create_test_new_user(name, role), TEST_PASSWORD)
        .unwrap()
}

pub fn create_test_new_classroom(name: &str) -> NewClassroom {
    let hours: OperatingHours = OperatingHours::new(t(8, 0), t(15, 0)).unwrap();
    NewClassroom::new(
        name,
        hours,
        &[Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
    )
    .unwrap()
}

pub fn create_test_classroom(persistence: &mut Persistence, name: &str) -> Classroom {
    persistence
        .create_classroom(&create_test_new_classroom(name))
        .unwrap()
}

pub fn create_test_period(subject: &str, day: Weekday, start: (u8, u8), end: (u8, u8)) -> Period {
    Period::new(
        subject.to_string(),
        day,
        t(start.0, start.1),
        t(end.0, end.1),
    )
}
