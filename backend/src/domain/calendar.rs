//! Calendar domain logic for the dashboard.
//!
//! This module contains all business logic related to calendar operations,
//! date calculations, and organizing jobs and tasks by day. The UI should
//! only handle presentation concerns; cell counts and decorations are
//! computed here.

use chrono::{Datelike, NaiveDate};
use shared::{
    CalendarDay, CalendarDayType, CalendarFocusDate, CalendarMonth, DayAgenda, DayDecoration, Job,
    JobStatus, Task, TaskPriority,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::validation::ValidationError;

/// Calendar service that handles all calendar-related business logic
#[derive(Clone)]
pub struct CalendarService {
    /// Current focus date for calendar navigation (month/year only)
    /// This is kept in memory and not persisted
    current_focus_date: Arc<Mutex<CalendarFocusDate>>,
}

/// Jobs and tasks falling on one day of the month being rendered
#[derive(Default)]
struct DayBucket<'a> {
    jobs: Vec<&'a Job>,
    tasks: Vec<&'a Task>,
}

impl CalendarService {
    /// Create a new CalendarService focused on the current month
    pub fn new() -> Self {
        Self::with_focus(CalendarFocusDate::default())
    }

    pub fn with_focus(focus: CalendarFocusDate) -> Self {
        Self {
            current_focus_date: Arc::new(Mutex::new(focus)),
        }
    }

    /// Generate a Monday-start calendar month with per-day job and task counts
    pub fn generate_calendar_month(
        &self,
        month: u32,
        year: i32,
        jobs: &[Job],
        tasks: &[Task],
    ) -> Result<CalendarMonth, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        let days_in_month = self.days_in_month(month, year);
        let first_day = self.first_day_of_month(month, year);
        let buckets = self.group_by_day(month, year, jobs, tasks);

        let mut calendar_days = Vec::with_capacity(42);

        for _ in 0..first_day {
            calendar_days.push(Self::padding_day(CalendarDayType::PaddingBefore));
        }

        for day in 1..=days_in_month {
            let (job_count, task_count, decoration) = match buckets.get(&day) {
                Some(bucket) => (
                    bucket.jobs.len(),
                    bucket.tasks.len(),
                    day_decoration(&bucket.jobs, &bucket.tasks),
                ),
                None => (0, 0, DayDecoration::None),
            };
            calendar_days.push(CalendarDay {
                day,
                day_type: CalendarDayType::MonthDay,
                job_count,
                task_count,
                decoration,
            });
        }

        while calendar_days.len() % 7 != 0 {
            calendar_days.push(Self::padding_day(CalendarDayType::PaddingAfter));
        }

        debug!(
            "Generated calendar for {}/{}: {} cells, {} days with records",
            month,
            year,
            calendar_days.len(),
            buckets.len()
        );

        Ok(CalendarMonth {
            month,
            year,
            days: calendar_days,
            first_day_of_week: first_day,
        })
    }

    fn padding_day(day_type: CalendarDayType) -> CalendarDay {
        CalendarDay {
            day: 0,
            day_type,
            job_count: 0,
            task_count: 0,
            decoration: DayDecoration::None,
        }
    }

    /// Group jobs and tasks by day of month for a specific month and year
    fn group_by_day<'a>(
        &self,
        month: u32,
        year: i32,
        jobs: &'a [Job],
        tasks: &'a [Task],
    ) -> HashMap<u32, DayBucket<'a>> {
        let mut buckets: HashMap<u32, DayBucket<'a>> = HashMap::new();

        for job in jobs {
            let date = job.date.date();
            if date.month() == month && date.year() == year {
                buckets.entry(date.day()).or_default().jobs.push(job);
            }
        }
        for task in tasks {
            let date = task.due_date.date();
            if date.month() == month && date.year() == year {
                buckets.entry(date.day()).or_default().tasks.push(task);
            }
        }

        buckets
    }

    /// Jobs and tasks occurring on `date`, ordered by time of day
    pub fn day_agenda(&self, date: NaiveDate, jobs: &[Job], tasks: &[Task]) -> DayAgenda {
        let mut day_jobs: Vec<Job> = jobs.iter().filter(|j| j.date.date() == date).cloned().collect();
        let mut day_tasks: Vec<Task> = tasks.iter().filter(|t| t.due_date.date() == date).cloned().collect();
        day_jobs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        day_tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));

        DayAgenda {
            date,
            jobs: day_jobs,
            tasks: day_tasks,
        }
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Column of the first day of the month (0 = Monday, ..., 6 = Sunday)
    pub fn first_day_of_month(&self, month: u32, year: i32) -> u32 {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| date.weekday().num_days_from_monday())
            .unwrap_or(0)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Format a date for human-readable display
    pub fn format_date_for_display(&self, date: NaiveDate) -> String {
        format!("{} {}, {}", self.month_name(date.month()), date.day(), date.year())
    }

    /// Month before the given one
    pub fn previous_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month <= 1 {
            (12, current_year - 1)
        } else {
            (current_month - 1, current_year)
        }
    }

    /// Month after the given one
    pub fn next_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month >= 12 {
            (1, current_year + 1)
        } else {
            (current_month + 1, current_year)
        }
    }

    fn focus(&self) -> MutexGuard<'_, CalendarFocusDate> {
        self.current_focus_date
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the current focus date for calendar navigation
    pub fn get_focus_date(&self) -> CalendarFocusDate {
        self.focus().clone()
    }

    /// Set the focus date for calendar navigation
    pub fn set_focus_date(&self, month: u32, year: i32) -> Result<CalendarFocusDate, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        let new_focus_date = CalendarFocusDate { month, year };
        *self.focus() = new_focus_date.clone();
        Ok(new_focus_date)
    }

    /// Move the focus one month back
    pub fn navigate_previous_month(&self) -> CalendarFocusDate {
        let mut focus = self.focus();
        let (month, year) = self.previous_month(focus.month, focus.year);
        *focus = CalendarFocusDate { month, year };
        focus.clone()
    }

    /// Move the focus one month forward
    pub fn navigate_next_month(&self) -> CalendarFocusDate {
        let mut focus = self.focus();
        let (month, year) = self.next_month(focus.month, focus.year);
        *focus = CalendarFocusDate { month, year };
        focus.clone()
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a day's colour: in-progress job, then open high-priority task, then
/// anything still scheduled or open.
pub fn day_decoration(jobs: &[&Job], tasks: &[&Task]) -> DayDecoration {
    if jobs.iter().any(|job| job.status == JobStatus::InProgress) {
        DayDecoration::InProgress
    } else if tasks
        .iter()
        .any(|task| task.priority == TaskPriority::High && task.status.is_open())
    {
        DayDecoration::HighPriority
    } else if jobs.iter().any(|job| job.status == JobStatus::Scheduled)
        || tasks.iter().any(|task| task.status.is_open())
    {
        DayDecoration::Scheduled
    } else {
        DayDecoration::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockDataset;
    use shared::TaskStatus;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
    }

    fn month_day(calendar: &CalendarMonth, day: u32) -> &CalendarDay {
        calendar
            .days
            .iter()
            .find(|d| d.day == day && d.day_type == CalendarDayType::MonthDay)
            .unwrap()
    }

    #[test]
    fn test_days_in_month() {
        let service = CalendarService::new();

        assert_eq!(service.days_in_month(1, 2025), 31);
        assert_eq!(service.days_in_month(4, 2025), 30);
        assert_eq!(service.days_in_month(2, 2025), 28);
        assert_eq!(service.days_in_month(2, 2024), 29);
    }

    #[test]
    fn test_is_leap_year() {
        let service = CalendarService::new();

        assert!(!service.is_leap_year(2025));
        assert!(service.is_leap_year(2024));
        assert!(!service.is_leap_year(1900));
        assert!(service.is_leap_year(2000));
    }

    #[test]
    fn test_month_name_and_display() {
        let service = CalendarService::new();

        assert_eq!(service.month_name(6), "June");
        assert_eq!(service.month_name(13), "Invalid Month");
        assert_eq!(service.format_date_for_display(anchor()), "June 18, 2025");
    }

    #[test]
    fn test_grid_is_monday_aligned() {
        let service = CalendarService::new();
        // June 1 2025 is a Sunday
        let calendar = service.generate_calendar_month(6, 2025, &[], &[]).unwrap();

        assert_eq!(calendar.first_day_of_week, 6);
        let padding_before = calendar
            .days
            .iter()
            .filter(|d| d.day_type == CalendarDayType::PaddingBefore)
            .count();
        assert_eq!(padding_before, 6);
        assert_eq!(calendar.days.len() % 7, 0);
        assert_eq!(
            calendar.days.iter().filter(|d| d.day_type == CalendarDayType::MonthDay).count(),
            30
        );
        assert_eq!(calendar.days.last().map(|d| d.day_type), Some(CalendarDayType::PaddingAfter));
    }

    #[test]
    fn test_invalid_month_rejected() {
        let service = CalendarService::new();
        assert_eq!(
            service.generate_calendar_month(13, 2025, &[], &[]),
            Err(ValidationError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_counts_and_decorations() {
        let service = CalendarService::new();
        let data = MockDataset::anchored_at(anchor());
        let calendar = service
            .generate_calendar_month(6, 2025, &data.jobs, &data.tasks)
            .unwrap();

        // Anchor day: in-progress water heater job outranks everything
        let today = month_day(&calendar, 18);
        assert_eq!(today.job_count, 2);
        assert_eq!(today.task_count, 1);
        assert_eq!(today.decoration, DayDecoration::InProgress);

        // June 20: open high-priority permit task only
        let permit_day = month_day(&calendar, 20);
        assert_eq!(permit_day.job_count, 0);
        assert_eq!(permit_day.decoration, DayDecoration::HighPriority);

        // June 19: scheduled job plus a medium task
        assert_eq!(month_day(&calendar, 19).decoration, DayDecoration::Scheduled);

        // June 9: completed job only
        let done_day = month_day(&calendar, 9);
        assert_eq!(done_day.job_count, 1);
        assert_eq!(done_day.decoration, DayDecoration::None);

        // Empty day
        assert_eq!(month_day(&calendar, 2).job_count, 0);
        assert_eq!(month_day(&calendar, 2).decoration, DayDecoration::None);
    }

    #[test]
    fn test_day_counts_sum_to_records_in_month() {
        let service = CalendarService::new();
        let data = MockDataset::anchored_at(anchor());

        for (month, year) in [(5, 2025), (6, 2025), (7, 2025)] {
            let calendar = service
                .generate_calendar_month(month, year, &data.jobs, &data.tasks)
                .unwrap();
            let job_total: usize = calendar.days.iter().map(|d| d.job_count).sum();
            let task_total: usize = calendar.days.iter().map(|d| d.task_count).sum();

            let expected_jobs = data
                .jobs
                .iter()
                .filter(|j| j.date.month() == month && j.date.year() == year)
                .count();
            let expected_tasks = data
                .tasks
                .iter()
                .filter(|t| t.due_date.month() == month && t.due_date.year() == year)
                .count();
            assert_eq!(job_total, expected_jobs);
            assert_eq!(task_total, expected_tasks);
        }
    }

    #[test]
    fn test_decoration_precedence() {
        let data = MockDataset::anchored_at(anchor());
        let in_progress = data.jobs.iter().find(|j| j.status == JobStatus::InProgress).unwrap();
        let scheduled = data.jobs.iter().find(|j| j.status == JobStatus::Scheduled).unwrap();
        let high_open = data
            .tasks
            .iter()
            .find(|t| t.priority == TaskPriority::High && t.status == TaskStatus::Todo)
            .unwrap();
        let done = data.tasks.iter().find(|t| t.status == TaskStatus::Done).unwrap();

        assert_eq!(day_decoration(&[scheduled, in_progress], &[high_open]), DayDecoration::InProgress);
        assert_eq!(day_decoration(&[scheduled], &[high_open]), DayDecoration::HighPriority);
        assert_eq!(day_decoration(&[scheduled], &[done]), DayDecoration::Scheduled);
        assert_eq!(day_decoration(&[], &[done]), DayDecoration::None);
        assert_eq!(day_decoration(&[], &[]), DayDecoration::None);
    }

    #[test]
    fn test_day_agenda_sorted_by_time() {
        let service = CalendarService::new();
        let data = MockDataset::anchored_at(anchor());
        let agenda = service.day_agenda(anchor(), &data.jobs, &data.tasks);

        let job_ids: Vec<&str> = agenda.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(job_ids, vec!["job-5", "job-6"]);
        assert_eq!(agenda.tasks.len(), 1);
        assert_eq!(agenda.tasks[0].id, "task-1");
    }

    #[test]
    fn test_navigation() {
        let service = CalendarService::new();

        assert_eq!(service.previous_month(6, 2025), (5, 2025));
        assert_eq!(service.previous_month(1, 2025), (12, 2024));
        assert_eq!(service.next_month(6, 2025), (7, 2025));
        assert_eq!(service.next_month(12, 2025), (1, 2026));
    }

    #[test]
    fn test_set_focus_date() {
        let service = CalendarService::new();

        let focus = service.set_focus_date(6, 2025).unwrap();
        assert_eq!(focus, CalendarFocusDate { month: 6, year: 2025 });
        assert_eq!(service.get_focus_date(), focus);

        assert_eq!(service.set_focus_date(13, 2025), Err(ValidationError::InvalidMonth(13)));
        assert_eq!(service.set_focus_date(0, 2025), Err(ValidationError::InvalidMonth(0)));
        // Failed updates leave the focus untouched
        assert_eq!(service.get_focus_date(), focus);
    }

    #[test]
    fn test_navigate_months_with_rollover() {
        let service = CalendarService::with_focus(CalendarFocusDate { month: 1, year: 2025 });

        let focus = service.navigate_previous_month();
        assert_eq!(focus, CalendarFocusDate { month: 12, year: 2024 });

        let focus = service.navigate_next_month();
        assert_eq!(focus, CalendarFocusDate { month: 1, year: 2025 });

        service.set_focus_date(12, 2025).unwrap();
        assert_eq!(service.navigate_next_month(), CalendarFocusDate { month: 1, year: 2026 });
    }
}
