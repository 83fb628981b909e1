//! Resolution of named date windows into concrete intervals.
//!
//! Windows are resolved against a caller-supplied "now" so filtering stays a
//! pure function of its inputs. Weeks are ISO weeks starting on Monday;
//! months follow calendar boundaries.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use shared::DateWindow;

use super::validation::ValidationError;

/// Half-open interval `[start, end)`; a `None` bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateInterval {
    /// Interval covering the whole days `first` through `last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: Some(start_of(first)),
            end: Some(start_of(last + Duration::days(1))),
        }
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| start <= timestamp)
            && self.end.map_or(true, |end| timestamp < end)
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if end <= start)
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn week_interval(monday: NaiveDate) -> DateInterval {
    DateInterval {
        start: Some(start_of(monday)),
        end: Some(start_of(monday + Duration::days(7))),
    }
}

fn month_interval(first: NaiveDate) -> DateInterval {
    let next = first.checked_add_months(Months::new(1));
    DateInterval {
        start: Some(start_of(first)),
        end: next.map(start_of),
    }
}

/// Resolve a window into an interval; `None` means the window imposes no constraint
pub fn resolve(window: &DateWindow, now: NaiveDateTime) -> Option<DateInterval> {
    let today = now.date();
    let interval = match window {
        DateWindow::All => return None,
        DateWindow::Today => DateInterval::days(today, today),
        DateWindow::Tomorrow => {
            let day = today + Duration::days(1);
            DateInterval::days(day, day)
        }
        DateWindow::Yesterday => {
            let day = today - Duration::days(1);
            DateInterval::days(day, day)
        }
        DateWindow::ThisWeek => week_interval(week_start(today)),
        DateWindow::NextWeek => week_interval(week_start(today) + Duration::days(7)),
        DateWindow::LastWeek => week_interval(week_start(today) - Duration::days(7)),
        DateWindow::ThisMonth => month_interval(month_start(today)),
        DateWindow::NextMonth => {
            let first = month_start(today).checked_add_months(Months::new(1))?;
            month_interval(first)
        }
        DateWindow::LastMonth => {
            let first = month_start(today).checked_sub_months(Months::new(1))?;
            month_interval(first)
        }
        DateWindow::Custom { from, to } => {
            let start = from.map(start_of);
            let end = to.map(|last| start_of(last + Duration::days(1)));
            match (start, end) {
                // A reversed range matches nothing
                (Some(start), Some(end)) if end <= start => DateInterval {
                    start: Some(start),
                    end: Some(start),
                },
                _ => DateInterval { start, end },
            }
        }
    };
    Some(interval)
}

/// Reject windows that cannot match anything because they are malformed
pub fn validate(window: &DateWindow) -> Result<(), ValidationError> {
    if let DateWindow::Custom {
        from: Some(from),
        to: Some(to),
    } = window
    {
        if to < from {
            return Err(ValidationError::InvalidDateRange);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Wednesday, June 18 2025
    fn now() -> NaiveDateTime {
        dt(2025, 6, 18, 14, 30)
    }

    #[test]
    fn test_all_is_unconstrained() {
        assert_eq!(resolve(&DateWindow::All, now()), None);
    }

    #[test]
    fn test_single_day_windows() {
        let today = resolve(&DateWindow::Today, now()).unwrap();
        assert_eq!(today, DateInterval::days(date(2025, 6, 18), date(2025, 6, 18)));
        assert!(today.contains(dt(2025, 6, 18, 0, 0)));
        assert!(today.contains(dt(2025, 6, 18, 23, 59)));
        assert!(!today.contains(dt(2025, 6, 19, 0, 0)));
        assert!(!today.contains(dt(2025, 6, 17, 23, 59)));

        let tomorrow = resolve(&DateWindow::Tomorrow, now()).unwrap();
        assert!(tomorrow.contains(dt(2025, 6, 19, 8, 0)));

        let yesterday = resolve(&DateWindow::Yesterday, now()).unwrap();
        assert!(yesterday.contains(dt(2025, 6, 17, 8, 0)));
        assert!(!yesterday.contains(dt(2025, 6, 18, 8, 0)));
    }

    #[test]
    fn test_week_windows_start_on_monday() {
        let this_week = resolve(&DateWindow::ThisWeek, now()).unwrap();
        assert_eq!(this_week.start, Some(dt(2025, 6, 16, 0, 0)));
        assert_eq!(this_week.end, Some(dt(2025, 6, 23, 0, 0)));

        let next_week = resolve(&DateWindow::NextWeek, now()).unwrap();
        assert_eq!(next_week.start, Some(dt(2025, 6, 23, 0, 0)));

        let last_week = resolve(&DateWindow::LastWeek, now()).unwrap();
        assert_eq!(last_week.start, Some(dt(2025, 6, 9, 0, 0)));
        assert_eq!(last_week.end, Some(dt(2025, 6, 16, 0, 0)));
    }

    #[test]
    fn test_week_on_sunday_belongs_to_previous_monday() {
        let sunday = dt(2025, 6, 22, 20, 0);
        let week = resolve(&DateWindow::ThisWeek, sunday).unwrap();
        assert_eq!(week.start, Some(dt(2025, 6, 16, 0, 0)));
        assert!(week.contains(sunday));
    }

    #[test]
    fn test_month_windows_roll_over_years() {
        let december = dt(2025, 12, 10, 9, 0);

        let this_month = resolve(&DateWindow::ThisMonth, december).unwrap();
        assert_eq!(this_month.start, Some(dt(2025, 12, 1, 0, 0)));
        assert_eq!(this_month.end, Some(dt(2026, 1, 1, 0, 0)));

        let next_month = resolve(&DateWindow::NextMonth, december).unwrap();
        assert_eq!(next_month.start, Some(dt(2026, 1, 1, 0, 0)));
        assert_eq!(next_month.end, Some(dt(2026, 2, 1, 0, 0)));

        let january = dt(2026, 1, 31, 9, 0);
        let last_month = resolve(&DateWindow::LastMonth, january).unwrap();
        assert_eq!(last_month.start, Some(dt(2025, 12, 1, 0, 0)));
        assert_eq!(last_month.end, Some(dt(2026, 1, 1, 0, 0)));
    }

    #[test]
    fn test_custom_range_is_inclusive_of_both_days() {
        let window = DateWindow::Custom {
            from: Some(date(2025, 6, 1)),
            to: Some(date(2025, 6, 3)),
        };
        let interval = resolve(&window, now()).unwrap();
        assert!(interval.contains(dt(2025, 6, 1, 0, 0)));
        assert!(interval.contains(dt(2025, 6, 3, 23, 59)));
        assert!(!interval.contains(dt(2025, 6, 4, 0, 0)));
        assert!(!interval.contains(dt(2025, 5, 31, 23, 59)));
    }

    #[test]
    fn test_custom_range_open_ends() {
        let from_only = DateWindow::Custom {
            from: Some(date(2025, 6, 1)),
            to: None,
        };
        let interval = resolve(&from_only, now()).unwrap();
        assert!(interval.contains(dt(2099, 1, 1, 0, 0)));
        assert!(!interval.contains(dt(2025, 5, 31, 12, 0)));

        let unbounded = DateWindow::Custom { from: None, to: None };
        assert!(resolve(&unbounded, now()).unwrap().contains(dt(1990, 1, 1, 0, 0)));
    }

    #[test]
    fn test_reversed_custom_range() {
        let window = DateWindow::Custom {
            from: Some(date(2025, 6, 10)),
            to: Some(date(2025, 6, 1)),
        };
        let interval = resolve(&window, now()).unwrap();
        assert!(interval.is_empty());
        assert!(!interval.contains(dt(2025, 6, 10, 0, 0)));
        assert!(!interval.contains(dt(2025, 6, 5, 0, 0)));
        assert_eq!(validate(&window), Err(ValidationError::InvalidDateRange));
        assert_eq!(validate(&DateWindow::ThisWeek), Ok(()));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for window in [
            DateWindow::Today,
            DateWindow::ThisWeek,
            DateWindow::LastMonth,
        ] {
            assert_eq!(resolve(&window, now()), resolve(&window, now()));
        }
    }
}
