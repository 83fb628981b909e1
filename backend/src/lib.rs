//! # Field Service Backend
//!
//! Contains all non-UI logic for the field service dashboard.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Business logic for jobs, tasks, the ledger and the calendar
//! - **Storage**: Repository traits and the in-memory mock collections
//! - **Config**: Display and paging settings
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (any frontend, or the snapshot binary)
//!     ↓
//! AppState (services wired to one connection)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (in-memory repositories)
//! ```

pub mod config;
pub mod domain;
pub mod storage;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::{
    CalendarMonth, DateWindow, DayAgenda, FormattedJob, JobFilter, JobSourceStats, TaskFilter,
    TransactionFilter, TransactionSummary,
};
use std::sync::Arc;
use tracing::info;

use crate::config::DashboardConfig;
use crate::domain::{
    filter, CalendarService, ClientService, Clock, JobService, JobSourceService, ProjectService,
    ReportService, TableService, TaskService, TechnicianService, TransactionService,
};
use crate::storage::{Connection, MemoryConnection, MockDataset};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState<C: Connection = MemoryConnection> {
    pub config: Arc<DashboardConfig>,
    pub clock: Arc<dyn Clock>,
    pub client_service: ClientService<C>,
    pub technician_service: TechnicianService<C>,
    pub job_source_service: JobSourceService<C>,
    pub job_service: JobService<C>,
    pub project_service: ProjectService<C>,
    pub task_service: TaskService<C>,
    pub transaction_service: TransactionService<C>,
    pub report_service: ReportService<C>,
    pub calendar_service: CalendarService,
    pub table_service: TableService,
}

/// What the dashboard home screen shows at a glance
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub today: NaiveDate,
    pub todays_jobs: Vec<FormattedJob>,
    pub week_summary: TransactionSummary,
    pub job_sources: Vec<JobSourceStats>,
    pub calendar: CalendarMonth,
}

/// Initialize the backend with all required services
///
/// With `seed_mock_data` set, storage is populated with the mock dataset
/// anchored on the clock's current day.
pub fn initialize_backend(config: DashboardConfig, clock: Arc<dyn Clock>) -> AppState {
    info!("Setting up in-memory storage");
    let connection = if config.seed_mock_data {
        MemoryConnection::seeded(MockDataset::anchored_at(clock.now().date()))
    } else {
        MemoryConnection::new()
    };
    AppState::with_connection(&connection, config, clock)
}

impl<C: Connection> AppState<C> {
    /// Wire every service to the given connection
    pub fn with_connection(connection: &C, config: DashboardConfig, clock: Arc<dyn Clock>) -> Self {
        info!("Setting up domain model");
        let config = Arc::new(config);
        let today = clock.now().date();

        Self {
            client_service: ClientService::new(connection, config.clone(), clock.clone()),
            technician_service: TechnicianService::new(connection, config.clone()),
            job_source_service: JobSourceService::new(connection, config.clone()),
            job_service: JobService::new(connection, config.clone(), clock.clone()),
            project_service: ProjectService::new(connection, config.clone()),
            task_service: TaskService::new(connection, config.clone(), clock.clone()),
            transaction_service: TransactionService::new(connection, config.clone(), clock.clone()),
            report_service: ReportService::new(connection, clock.clone()),
            calendar_service: CalendarService::with_focus(shared::CalendarFocusDate {
                month: today.month(),
                year: today.year(),
            }),
            table_service: TableService::new(config.clone()),
            config,
            clock,
        }
    }

    /// Calendar grid for a month, counting only jobs and tasks that pass the filters
    pub async fn calendar_month(
        &self,
        month: u32,
        year: i32,
        job_filter: &JobFilter,
        task_filter: &TaskFilter,
    ) -> Result<CalendarMonth> {
        let jobs = self.job_service.jobs_matching(job_filter).await?;
        filter::validate_filter(task_filter)?;
        let tasks = filter::retain(self.task_service.all_tasks().await?, task_filter, self.clock.now());
        Ok(self
            .calendar_service
            .generate_calendar_month(month, year, &jobs, &tasks)?)
    }

    /// Calendar grid for the month the calendar is focused on
    pub async fn focused_calendar(&self, job_filter: &JobFilter, task_filter: &TaskFilter) -> Result<CalendarMonth> {
        let focus = self.calendar_service.get_focus_date();
        self.calendar_month(focus.month, focus.year, job_filter, task_filter)
            .await
    }

    /// Jobs and tasks on one day
    pub async fn day_agenda(&self, date: NaiveDate) -> Result<DayAgenda> {
        let jobs = self.job_service.all_jobs().await?;
        let tasks = self.task_service.all_tasks().await?;
        Ok(self.calendar_service.day_agenda(date, &jobs, &tasks))
    }

    /// Today's jobs formatted for the job board
    pub async fn todays_jobs(&self) -> Result<Vec<FormattedJob>> {
        let mut job_filter = JobFilter::default();
        job_filter.date_window = DateWindow::Today;
        let mut jobs = self.job_service.jobs_matching(&job_filter).await?;
        jobs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let clients = self.client_service.list_clients("").await?;
        let technicians = self.technician_service.list_technicians(false).await?;
        Ok(self.table_service.format_jobs(&jobs, &clients, &technicians))
    }

    /// Build the home screen snapshot
    pub async fn snapshot(&self) -> Result<DashboardSnapshot> {
        let today = self.clock.now().date();

        let mut week = TransactionFilter::default();
        week.date_window = DateWindow::ThisWeek;
        let week_summary = self
            .transaction_service
            .summarize(&week)
            .await
            .context("Failed to summarize this week's transactions")?;

        let mut month_jobs = JobFilter::default();
        month_jobs.date_window = DateWindow::ThisMonth;
        let job_sources = self.report_service.job_source_stats(&month_jobs).await?;

        let calendar = self
            .calendar_month(today.month(), today.year(), &JobFilter::default(), &TaskFilter::default())
            .await?;

        Ok(DashboardSnapshot {
            today,
            todays_jobs: self.todays_jobs().await?,
            week_summary,
            job_sources,
            calendar,
        })
    }
}
