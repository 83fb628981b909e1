use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A customer that jobs are performed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A field technician that jobs and tasks get assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Trade or skill, e.g. "HVAC" or "Plumbing"
    pub specialty: Option<String>,
    pub is_active: bool,
}

/// Where a job came from (referral, ads, website, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSource {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A unit of field work at a client's site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub client_id: String,
    pub technician_id: Option<String>,
    pub source_id: Option<String>,
    pub category: String,
    pub status: JobStatus,
    /// Scheduled start, local wall-clock time
    pub date: NaiveDateTime,
    /// Quoted or invoiced price of the job
    pub amount: f64,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: Option<String>,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// An internal to-do item, optionally part of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub project_id: Option<String>,
    /// Technician responsible for the task
    pub assignee_id: Option<String>,
    pub category: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Check,
    BankTransfer,
    Other,
}

/// A financial transaction recorded against the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Always a non-negative magnitude; the sign comes from `transaction_type`
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub date: NaiveDateTime,
    pub job_id: Option<String>,
    pub technician_id: Option<String>,
    pub source_id: Option<String>,
}

/// Named date window used by every list filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Tomorrow,
    Yesterday,
    ThisWeek,
    NextWeek,
    LastWeek,
    ThisMonth,
    NextMonth,
    LastMonth,
    /// Whole days from `from` through `to`, both inclusive; a missing end is unbounded
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// Inclusive amount bounds; `None` leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Filter state shared by the jobs, tasks and transactions lists.
///
/// Empty selections, an empty search, `DateWindow::All` and an open amount
/// range impose no constraint. `S` is the status type of the listed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState<S> {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub technician_ids: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default = "Vec::new")]
    pub statuses: Vec<S>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub date_window: DateWindow,
    #[serde(default)]
    pub amount: AmountRange,
}

impl<S> Default for FilterState<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            technician_ids: Vec::new(),
            categories: Vec::new(),
            source_ids: Vec::new(),
            statuses: Vec::new(),
            payment_methods: Vec::new(),
            date_window: DateWindow::All,
            amount: AmountRange::default(),
        }
    }
}

pub type JobFilter = FilterState<JobStatus>;
pub type TaskFilter = FilterState<TaskStatus>;
pub type TransactionFilter = FilterState<TransactionType>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Date,
    Amount,
    /// Title for jobs and tasks, description for transactions
    Title,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Filtered, sorted, cursor-paginated list request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery<S> {
    #[serde(default)]
    pub filter: FilterState<S>,
    #[serde(default)]
    pub sort: SortOrder,
    /// Cursor for pagination - record ID to start after
    pub after: Option<String>,
    /// Maximum number of records to return
    pub limit: Option<u32>,
}

impl<S> Default for ListQuery<S> {
    fn default() -> Self {
        Self {
            filter: FilterState::default(),
            sort: SortOrder::default(),
            after: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Number of records matching the filter before pagination
    pub total_matched: usize,
    pub pagination: PaginationInfo,
}

/// Response after creating or updating a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    pub record: T,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsResponse {
    pub deleted_count: usize,
    pub success_message: String,
    pub not_found_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTechnicianRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobSourceRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub client_id: String,
    pub technician_id: Option<String>,
    pub source_id: Option<String>,
    pub category: String,
    pub date: NaiveDateTime,
    pub amount: f64,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub client_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub category: Option<String>,
    pub priority: TaskPriority,
    pub due_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: String,
    /// Positive magnitude; direction comes from `transaction_type`
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    pub payment_method: PaymentMethod,
    /// Optional date override - uses the current time if not provided
    pub date: Option<NaiveDateTime>,
    pub job_id: Option<String>,
    pub technician_id: Option<String>,
    pub source_id: Option<String>,
}

/// Type of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding cell before the first day of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Empty padding cell completing the last week row
    PaddingAfter,
}

/// Colour hint for a calendar cell, in precedence order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayDecoration {
    InProgress,
    HighPriority,
    Scheduled,
    None,
}

/// A single cell in the calendar grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    /// Day of month, 0 for padding cells
    pub day: u32,
    pub day_type: CalendarDayType,
    pub job_count: usize,
    pub task_count: usize,
    pub decoration: DayDecoration,
}

/// A calendar month laid out as Monday-start week rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub days: Vec<CalendarDay>,
    /// Column of the 1st: 0 = Monday, ..., 6 = Sunday
    pub first_day_of_week: u32,
}

/// Everything scheduled on one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub jobs: Vec<Job>,
    pub tasks: Vec<Task>,
}

/// Represents the current focus date for calendar navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarFocusDate {
    pub month: u32,
    pub year: i32,
}

impl Default for CalendarFocusDate {
    fn default() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethodTotal {
    pub payment_method: PaymentMethod,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

/// Totals over a filtered set of transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionSummary {
    pub count: usize,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub by_payment_method: Vec<PaymentMethodTotal>,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSourceStats {
    /// `None` groups jobs without a source
    pub source_id: Option<String>,
    pub source_name: String,
    pub job_count: usize,
    pub completed_count: usize,
    /// Sum of amounts of completed jobs
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicianWorkload {
    pub technician_id: String,
    pub technician_name: String,
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectProgress {
    pub project_id: String,
    pub total_tasks: usize,
    pub done_tasks: usize,
    /// 0.0 ..= 100.0; a project without tasks reports 0
    pub percent_complete: f64,
}

/// Type of amount for styling and display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AmountType {
    Positive,
    Negative,
    Zero,
}

/// A transaction row formatted for table display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedTransaction {
    pub id: String,
    pub formatted_date: String,
    pub description: String,
    pub category: String,
    pub payment_method: String,
    pub formatted_amount: String,
    pub amount_type: AmountType,
    /// Signed amount: negative for expenses
    pub raw_amount: f64,
}

/// A job row formatted for table display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedJob {
    pub id: String,
    pub formatted_date: String,
    pub title: String,
    pub client_name: String,
    pub technician_name: String,
    pub status: String,
    pub formatted_amount: String,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn is_open(&self) -> bool {
        *self != TaskStatus::Done
    }
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::Check,
        PaymentMethod::BankTransfer,
        PaymentMethod::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Check => "Check",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other => "Other",
        }
    }
}

impl Transaction {
    /// Amount with the sign applied: positive for income, negative for expenses
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Generate a record ID in format "<kind>::<uuid v4>"
pub fn generate_id(kind: &str) -> String {
    format!("{}::{}", kind, Uuid::new_v4())
}

/// Parse a generated record ID into its kind and UUID
pub fn parse_id(id: &str) -> Result<(&str, Uuid), RecordIdError> {
    let (kind, raw_uuid) = id.split_once("::").ok_or(RecordIdError::InvalidFormat)?;
    if kind.is_empty() {
        return Err(RecordIdError::InvalidFormat);
    }
    let uuid = Uuid::parse_str(raw_uuid).map_err(|_| RecordIdError::InvalidUuid)?;
    Ok((kind, uuid))
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordIdError {
    InvalidFormat,
    InvalidUuid,
}

impl fmt::Display for RecordIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIdError::InvalidFormat => write!(f, "Invalid record ID format"),
            RecordIdError::InvalidUuid => write!(f, "Invalid UUID in record ID"),
        }
    }
}

impl std::error::Error for RecordIdError {}
