//! Multi-dimensional record filtering.
//!
//! A [`FilterState`] is the conjunction of its active dimensions: search
//! text, technician, category, job source, status, payment method, date
//! window and amount range. Inside one dimension the selected values are
//! alternatives. An inactive dimension (empty selection, blank search,
//! `DateWindow::All`, open amount range) matches every record.
//!
//! When a dimension is active and the record has no value for it, for
//! example an unassigned job under a technician filter, the record is
//! excluded.

use chrono::NaiveDateTime;
use shared::{AmountRange, DateWindow, FilterState, Job, JobStatus, PaymentMethod, Task, TaskStatus, Transaction, TransactionType};

use super::date_window;
use super::validation::ValidationError;

/// A record the dashboard filters can be applied to
pub trait Filterable {
    type Status: PartialEq;

    /// The timestamp date windows are evaluated against
    fn timestamp(&self) -> NaiveDateTime;

    /// Free-text fields searched by the search box
    fn search_fields(&self) -> Vec<&str>;

    fn technician_id(&self) -> Option<&str> {
        None
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn source_id(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<&Self::Status> {
        None
    }

    fn payment_method(&self) -> Option<PaymentMethod> {
        None
    }

    fn amount(&self) -> Option<f64> {
        None
    }
}

/// A pure predicate over records, evaluated at a given "now"
pub trait RecordPredicate<T> {
    fn matches(&self, record: &T, now: NaiveDateTime) -> bool;

    /// Conjunction with another predicate
    fn and<P>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
        P: RecordPredicate<T>,
    {
        And(self, other)
    }
}

/// Both predicates must match
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<T, A, B> RecordPredicate<T> for And<A, B>
where
    A: RecordPredicate<T>,
    B: RecordPredicate<T>,
{
    fn matches(&self, record: &T, now: NaiveDateTime) -> bool {
        self.0.matches(record, now) && self.1.matches(record, now)
    }
}

impl<T, P> RecordPredicate<T> for &P
where
    P: RecordPredicate<T> + ?Sized,
{
    fn matches(&self, record: &T, now: NaiveDateTime) -> bool {
        (**self).matches(record, now)
    }
}

impl<T> RecordPredicate<T> for FilterState<T::Status>
where
    T: Filterable,
{
    fn matches(&self, record: &T, now: NaiveDateTime) -> bool {
        matches_search(&self.search, record)
            && selection_matches(&self.technician_ids, record.technician_id())
            && selection_matches(&self.categories, record.category())
            && selection_matches(&self.source_ids, record.source_id())
            && selection_matches(&self.statuses, record.status())
            && selection_matches(&self.payment_methods, record.payment_method().as_ref())
            && amount_matches(&self.amount, record.amount())
            && date_window::resolve(&self.date_window, now)
                .map_or(true, |interval| interval.contains(record.timestamp()))
    }
}

fn matches_search<T: Filterable>(search: &str, record: &T) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn selection_matches<A, B>(selection: &[A], value: Option<&B>) -> bool
where
    A: PartialEq<B>,
    B: ?Sized,
{
    if selection.is_empty() {
        return true;
    }
    match value {
        Some(value) => selection.iter().any(|selected| selected == value),
        None => false,
    }
}

fn amount_matches(range: &AmountRange, amount: Option<f64>) -> bool {
    if range.is_open() {
        return true;
    }
    match amount {
        Some(amount) => {
            range.min.map_or(true, |min| amount >= min) && range.max.map_or(true, |max| amount <= max)
        }
        None => false,
    }
}

/// Keep the records matching `predicate`, preserving input order
pub fn apply<'a, T, P>(records: &'a [T], predicate: &P, now: NaiveDateTime) -> Vec<&'a T>
where
    P: RecordPredicate<T> + ?Sized,
{
    records
        .iter()
        .filter(|record| predicate.matches(record, now))
        .collect()
}

/// Owned variant of [`apply`]
pub fn retain<T, P>(records: Vec<T>, predicate: &P, now: NaiveDateTime) -> Vec<T>
where
    P: RecordPredicate<T> + ?Sized,
{
    records
        .into_iter()
        .filter(|record| predicate.matches(record, now))
        .collect()
}

/// Reject filter states that are malformed rather than merely empty
pub fn validate_filter<S>(filter: &FilterState<S>) -> Result<(), ValidationError> {
    date_window::validate(&filter.date_window)?;
    if let (Some(min), Some(max)) = (filter.amount.min, filter.amount.max) {
        if min > max {
            return Err(ValidationError::InvalidAmountRange);
        }
    }
    Ok(())
}

/// Whether any dimension of the filter is active
pub fn is_active<S>(filter: &FilterState<S>) -> bool {
    !filter.search.trim().is_empty()
        || !filter.technician_ids.is_empty()
        || !filter.categories.is_empty()
        || !filter.source_ids.is_empty()
        || !filter.statuses.is_empty()
        || !filter.payment_methods.is_empty()
        || !matches!(
            filter.date_window,
            DateWindow::All | DateWindow::Custom { from: None, to: None }
        )
        || !filter.amount.is_open()
}

impl Filterable for Job {
    type Status = JobStatus;

    fn timestamp(&self) -> NaiveDateTime {
        self.date
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.category.as_str()];
        fields.extend(self.notes.as_deref());
        fields.extend(self.address.as_deref());
        fields
    }

    fn technician_id(&self) -> Option<&str> {
        self.technician_id.as_deref()
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    fn status(&self) -> Option<&JobStatus> {
        Some(&self.status)
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

impl Filterable for Task {
    type Status = TaskStatus;

    fn timestamp(&self) -> NaiveDateTime {
        self.due_date
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.category.as_deref());
        fields
    }

    fn technician_id(&self) -> Option<&str> {
        self.assignee_id.as_deref()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status(&self) -> Option<&TaskStatus> {
        Some(&self.status)
    }
}

impl Filterable for Transaction {
    type Status = TransactionType;

    fn timestamp(&self) -> NaiveDateTime {
        self.date
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.category.as_str()]
    }

    fn technician_id(&self) -> Option<&str> {
        self.technician_id.as_deref()
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    fn status(&self) -> Option<&TransactionType> {
        Some(&self.transaction_type)
    }

    fn payment_method(&self) -> Option<PaymentMethod> {
        Some(self.payment_method)
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}
