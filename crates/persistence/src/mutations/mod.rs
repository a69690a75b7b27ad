// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! `users` and `classrooms` updates are compare-and-swap on the `version`
//! column. Sessions are plain inserts and deletes.

pub mod classrooms;
pub mod sessions;
pub mod users;
