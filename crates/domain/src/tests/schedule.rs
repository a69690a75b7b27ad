// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Weekday;

use crate::{DomainError, OperatingHours, Period, TimeOfDay, parse_weekday};

fn t(value: &str) -> TimeOfDay {
    value.parse().unwrap()
}

fn period(subject: &str, day: Weekday, start: &str, end: &str) -> Period {
    Period::new(String::from(subject), day, t(start), t(end))
}

#[test]
fn test_time_of_day_parses_and_displays() {
    let time: TimeOfDay = t("08:05");
    assert_eq!(time.hour(), 8);
    assert_eq!(time.minute(), 5);
    assert_eq!(time.to_string(), "08:05");
}

#[test]
fn test_time_of_day_rejects_garbage() {
    for bad in ["", "8", "25:00", "10:75", "noon"] {
        assert!(
            matches!(
                bad.parse::<TimeOfDay>(),
                Err(DomainError::InvalidTimeOfDay { .. })
            ),
            "expected '{bad}' to be rejected"
        );
    }
}

#[test]
fn test_time_of_day_orders_by_clock() {
    assert!(t("08:00") < t("08:30"));
    assert!(t("14:59") < t("15:00"));
}

#[test]
fn test_parse_weekday_accepts_names_and_abbreviations() {
    assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Monday);
    assert_eq!(parse_weekday("wed").unwrap(), Weekday::Wednesday);
    assert_eq!(parse_weekday("SUNDAY").unwrap(), Weekday::Sunday);
    assert!(matches!(
        parse_weekday("Someday"),
        Err(DomainError::InvalidWeekday(_))
    ));
}

#[test]
fn test_operating_hours_require_start_before_end() {
    assert!(OperatingHours::new(t("08:00"), t("15:00")).is_ok());
    assert!(matches!(
        OperatingHours::new(t("15:00"), t("08:00")),
        Err(DomainError::InvalidOperatingHours { .. })
    ));
    assert!(matches!(
        OperatingHours::new(t("08:00"), t("08:00")),
        Err(DomainError::InvalidOperatingHours { .. })
    ));
}

#[test]
fn test_operating_hours_contains_inclusive_bounds() {
    let hours: OperatingHours = OperatingHours::new(t("08:00"), t("15:00")).unwrap();
    assert!(hours.contains(t("08:00"), t("15:00")));
    assert!(hours.contains(t("09:00"), t("10:00")));
    assert!(!hours.contains(t("07:59"), t("09:00")));
    assert!(!hours.contains(t("14:00"), t("15:01")));
}

#[test]
fn test_overlap_is_symmetric() {
    let a: Period = period("Math", Weekday::Monday, "09:00", "10:00");
    let others: [Period; 5] = [
        period("Science", Weekday::Monday, "09:30", "10:30"),
        period("Art", Weekday::Monday, "10:00", "11:00"),
        period("Music", Weekday::Monday, "08:00", "12:00"),
        period("History", Weekday::Monday, "08:00", "09:00"),
        period("Math", Weekday::Tuesday, "09:00", "10:00"),
    ];
    for b in &others {
        assert_eq!(a.overlaps(b), b.overlaps(&a), "asymmetric for {b}");
    }
}

#[test]
fn test_touching_periods_do_not_overlap() {
    let first: Period = period("Math", Weekday::Monday, "09:00", "10:00");
    let second: Period = period("Science", Weekday::Monday, "10:00", "11:00");
    assert!(!first.overlaps(&second));
    assert!(!second.overlaps(&first));
}

#[test]
fn test_partial_and_containing_overlaps() {
    let base: Period = period("Math", Weekday::Monday, "09:00", "10:00");
    assert!(base.overlaps(&period("Science", Weekday::Monday, "09:30", "10:30")));
    assert!(base.overlaps(&period("Art", Weekday::Monday, "09:15", "09:45")));
    assert!(base.overlaps(&period("Music", Weekday::Monday, "08:00", "12:00")));
}

#[test]
fn test_different_days_never_overlap() {
    let monday: Period = period("Math", Weekday::Monday, "09:00", "10:00");
    let tuesday: Period = period("Math", Weekday::Tuesday, "09:00", "10:00");
    assert!(!monday.overlaps(&tuesday));
}

#[test]
fn test_period_range_check() {
    assert!(period("Math", Weekday::Monday, "09:00", "10:00").has_valid_range());
    assert!(!period("Math", Weekday::Monday, "10:00", "10:00").has_valid_range());
    assert!(!period("Math", Weekday::Monday, "11:00", "10:00").has_valid_range());
}

#[test]
fn test_period_display() {
    let p: Period = period("Math", Weekday::Monday, "08:00", "09:00");
    assert_eq!(p.to_string(), "Math on Monday 08:00-09:00");
}
