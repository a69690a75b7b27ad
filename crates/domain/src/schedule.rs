// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-of-day values, operating hours, and timetable periods.

use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Time, Weekday};

use crate::error::DomainError;

/// Wire format for times of day (`HH:MM`, 24-hour clock).
const TIME_OF_DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// A wall-clock time of day with minute precision.
///
/// Ordering follows the clock, so `08:00 < 08:30 < 15:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(Time);

impl TimeOfDay {
    /// Creates a time of day from an hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is not in `0..24` or the minute not in `0..60`.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, DomainError> {
        Time::from_hms(hour, minute, 0)
            .map(Self)
            .map_err(|e| DomainError::InvalidTimeOfDay {
                value: format!("{hour}:{minute}"),
                reason: e.to_string(),
            })
    }

    /// Returns the hour component.
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.0.hour()
    }

    /// Returns the minute component.
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl FromStr for TimeOfDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Time::parse(s.trim(), TIME_OF_DAY_FORMAT)
            .map(Self)
            .map_err(|e| DomainError::InvalidTimeOfDay {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parses a weekday name.
///
/// Accepts full English names and three-letter abbreviations, case-insensitively
/// (`"Monday"`, `"mon"`, `"WED"`).
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekday` if the input names no weekday.
pub fn parse_weekday(value: &str) -> Result<Weekday, DomainError> {
    match value.trim().to_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        "sunday" | "sun" => Ok(Weekday::Sunday),
        _ => Err(DomainError::InvalidWeekday(value.to_string())),
    }
}

/// The daily window during which a classroom may hold periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl OperatingHours {
    /// Creates an operating-hours window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperatingHours` unless `start < end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidOperatingHours { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the opening time.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// Returns the closing time.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Returns whether `[start, end]` lies inside this window.
    ///
    /// A span may begin exactly at opening and finish exactly at closing.
    #[must_use]
    pub fn contains(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        start >= self.start && end <= self.end
    }
}

impl std::fmt::Display for OperatingHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A single scheduled block in a classroom timetable.
///
/// Periods have no identity of their own; two periods with the same subject,
/// day and span are the same period. Construction does not check that
/// `start < end` so that the timetable validator can report the range error
/// alongside the other period checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// The subject taught in this period.
    pub subject: String,
    /// The weekday the period falls on.
    pub day: Weekday,
    /// When the period starts.
    pub start: TimeOfDay,
    /// When the period ends.
    pub end: TimeOfDay,
}

impl Period {
    /// Creates a new period.
    #[must_use]
    pub const fn new(subject: String, day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            subject,
            day,
            start,
            end,
        }
    }

    /// Returns whether the period starts strictly before it ends.
    #[must_use]
    pub fn has_valid_range(&self) -> bool {
        self.start < self.end
    }

    /// Returns whether two periods collide.
    ///
    /// Periods on different days never collide. On the same day the spans are
    /// treated as half-open, so a period ending at 10:00 and one starting at
    /// 10:00 do not collide.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && !(self.end <= other.start || self.start >= other.end)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {} {}-{}",
            self.subject, self.day, self.start, self.end
        )
    }
}
