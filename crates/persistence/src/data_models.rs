// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use roster_domain::{Period, TimeOfDay, Weekday, parse_weekday};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Serializable representation of a timetable `Period`.
///
/// Stored inside `classrooms.timetable_json`. Times are `HH:MM` and the day is
/// the full English weekday name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodData {
    pub subject: String,
    pub day: String,
    pub start: String,
    pub end: String,
}

impl From<&Period> for PeriodData {
    fn from(period: &Period) -> Self {
        Self {
            subject: period.subject.clone(),
            day: period.day.to_string(),
            start: period.start.to_string(),
            end: period.end.to_string(),
        }
    }
}

impl TryFrom<PeriodData> for Period {
    type Error = PersistenceError;

    fn try_from(data: PeriodData) -> Result<Self, Self::Error> {
        let day: Weekday = parse_weekday(&data.day)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        let start: TimeOfDay = TimeOfDay::from_str(&data.start)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        let end: TimeOfDay = TimeOfDay::from_str(&data.end)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(Self::new(data.subject, day, start, end))
    }
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// ISO 8601 expiry timestamp.
    pub expires_at: String,
}

/// The credential material for a user, loaded only for login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}
