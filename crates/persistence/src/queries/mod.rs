// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `users`: users and login credentials
//! - `classrooms`: classrooms with their membership and timetable
//! - `sessions`: login sessions

pub mod classrooms;
pub mod sessions;
pub mod users;
