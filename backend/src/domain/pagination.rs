//! Sorting and cursor pagination for list views.

use chrono::NaiveDateTime;
use shared::{FilterState, Job, JobStatus, ListResponse, PaginationInfo, SortDirection, SortField, SortOrder, Task, TaskStatus, Transaction};
use std::cmp::Ordering;

use super::filter::{self, Filterable};
use super::validation::ValidationError;
use crate::storage::Entity;

/// Ordering of records for table columns
pub trait Sortable {
    fn compare_by(&self, other: &Self, field: SortField) -> Ordering;
}

fn job_status_rank(status: JobStatus) -> u8 {
    match status {
        JobStatus::InProgress => 0,
        JobStatus::Scheduled => 1,
        JobStatus::Completed => 2,
        JobStatus::Cancelled => 3,
    }
}

fn task_status_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::InProgress => 0,
        TaskStatus::Todo => 1,
        TaskStatus::Done => 2,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl Sortable for Job {
    fn compare_by(&self, other: &Self, field: SortField) -> Ordering {
        match field {
            SortField::Date => self.date.cmp(&other.date),
            SortField::Amount => self.amount.total_cmp(&other.amount),
            SortField::Title => compare_text(&self.title, &other.title),
            SortField::Status => job_status_rank(self.status).cmp(&job_status_rank(other.status)),
        }
    }
}

impl Sortable for Task {
    fn compare_by(&self, other: &Self, field: SortField) -> Ordering {
        match field {
            SortField::Date => self.due_date.cmp(&other.due_date),
            // Tasks carry no amount; priority is the closest "weight"
            SortField::Amount => self.priority.cmp(&other.priority),
            SortField::Title => compare_text(&self.title, &other.title),
            SortField::Status => task_status_rank(self.status).cmp(&task_status_rank(other.status)),
        }
    }
}

impl Sortable for Transaction {
    fn compare_by(&self, other: &Self, field: SortField) -> Ordering {
        match field {
            SortField::Date => self.date.cmp(&other.date),
            SortField::Amount => self.signed_amount().total_cmp(&other.signed_amount()),
            SortField::Title => compare_text(&self.description, &other.description),
            SortField::Status => self.transaction_type.label().cmp(other.transaction_type.label()),
        }
    }
}

/// Sort in place; ties fall back to date, then id, so pages are stable
pub fn sort_records<T>(records: &mut [T], order: SortOrder)
where
    T: Sortable + Filterable + Entity,
{
    records.sort_by(|a, b| {
        let primary = a.compare_by(b, order.field);
        let ordering = primary
            .then_with(|| a.timestamp().cmp(&b.timestamp()))
            .then_with(|| a.id().cmp(b.id()));
        match order.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Take one page of already-sorted records, starting after the `after` cursor
pub fn paginate<T: Entity>(
    records: Vec<T>,
    after: Option<&str>,
    limit: usize,
) -> Result<(Vec<T>, PaginationInfo), ValidationError> {
    let start = match after {
        Some(cursor) => {
            let position = records
                .iter()
                .position(|record| record.id() == cursor)
                .ok_or_else(|| ValidationError::InvalidCursor(cursor.to_string()))?;
            position + 1
        }
        None => 0,
    };

    // Take one extra record to determine if there are more results
    let mut page: Vec<T> = records.into_iter().skip(start).take(limit + 1).collect();
    let has_more = page.len() > limit;
    if has_more {
        page.truncate(limit);
    }
    let next_cursor = if has_more {
        page.last().map(|record| record.id().to_string())
    } else {
        None
    };

    Ok((page, PaginationInfo { has_more, next_cursor }))
}

/// Filter, sort and paginate a collection in one go
pub fn list_page<T>(
    records: Vec<T>,
    filter_state: &FilterState<T::Status>,
    order: SortOrder,
    after: Option<&str>,
    limit: usize,
    now: NaiveDateTime,
) -> Result<ListResponse<T>, ValidationError>
where
    T: Filterable + Sortable + Entity,
{
    filter::validate_filter(filter_state)?;
    let mut matched = filter::retain(records, filter_state, now);
    let total_matched = matched.len();
    sort_records(&mut matched, order);
    let (items, pagination) = paginate(matched, after, limit)?;
    Ok(ListResponse {
        items,
        total_matched,
        pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockDataset;
    use chrono::NaiveDate;
    use shared::{DateWindow, JobFilter, TransactionFilter};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn dataset() -> MockDataset {
        MockDataset::anchored_at(now().date())
    }

    #[test]
    fn test_sort_by_date_descending_by_default() {
        let mut jobs = dataset().jobs;
        sort_records(&mut jobs, SortOrder::default());
        assert!(jobs.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(jobs[0].id, "job-11");
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let mut transactions = dataset().transactions;
        sort_records(
            &mut transactions,
            SortOrder {
                field: SortField::Amount,
                direction: SortDirection::Ascending,
            },
        );
        // Largest expense first when sorting signed amounts ascending
        assert_eq!(transactions[0].id, "tx-10");
        assert_eq!(transactions.last().map(|t| t.id.as_str()), Some("tx-7"));
    }

    #[test]
    fn test_sort_by_status_groups_in_progress_first() {
        let mut jobs = dataset().jobs;
        sort_records(
            &mut jobs,
            SortOrder {
                field: SortField::Status,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(jobs[0].status, JobStatus::InProgress);
        assert_eq!(jobs.last().map(|j| j.status), Some(JobStatus::Cancelled));
    }

    #[test]
    fn test_paginate_walks_all_pages() {
        let mut jobs = dataset().jobs;
        sort_records(&mut jobs, SortOrder::default());
        let total = jobs.len();

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let (page, info) = paginate(jobs.clone(), cursor.as_deref(), 5).unwrap();
            assert!(page.len() <= 5);
            seen.extend(page.into_iter().map(|j| j.id));
            if !info.has_more {
                assert!(info.next_cursor.is_none());
                break;
            }
            cursor = info.next_cursor;
        }
        assert_eq!(seen.len(), total);
        assert_eq!(seen, jobs.iter().map(|j| j.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn test_paginate_exact_fit_has_no_more() {
        let jobs: Vec<Job> = dataset().jobs.into_iter().take(4).collect();
        let (page, info) = paginate(jobs, None, 4).unwrap();
        assert_eq!(page.len(), 4);
        assert!(!info.has_more);
    }

    #[test]
    fn test_paginate_unknown_cursor() {
        let err = paginate(dataset().jobs, Some("job-404"), 5).unwrap_err();
        assert_eq!(err, ValidationError::InvalidCursor("job-404".to_string()));
    }

    #[test]
    fn test_list_page_reports_total_before_paging() {
        let filter = JobFilter {
            date_window: DateWindow::ThisWeek,
            ..Default::default()
        };
        let response = list_page(dataset().jobs, &filter, SortOrder::default(), None, 2, now()).unwrap();
        // June 16-22: job-4, job-5, job-6, job-7, job-8
        assert_eq!(response.total_matched, 5);
        assert_eq!(response.items.len(), 2);
        assert!(response.pagination.has_more);
    }

    #[test]
    fn test_list_page_rejects_invalid_filter() {
        let filter = TransactionFilter {
            amount: shared::AmountRange {
                min: Some(10.0),
                max: Some(1.0),
            },
            ..Default::default()
        };
        let err = list_page(dataset().transactions, &filter, SortOrder::default(), None, 10, now()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmountRange);
    }
}
