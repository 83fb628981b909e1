//! # Job Service
//!
//! Business logic for the job board: creating jobs against existing
//! clients, technicians and sources, the filtered and paginated job list,
//! and status and assignment changes.

use anyhow::Result;
use shared::{
    CreateJobRequest, DeleteRecordsRequest, DeleteRecordsResponse, Job, JobFilter, JobStatus,
    ListQuery, ListResponse, MutationResponse,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::clock::Clock;
use super::filter;
use super::pagination;
use super::records;
use super::validation::{optional_text, require_text, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

#[derive(Clone)]
pub struct JobService<C: Connection> {
    job_repository: C::JobRepository,
    client_repository: C::ClientRepository,
    technician_repository: C::TechnicianRepository,
    job_source_repository: C::JobSourceRepository,
    transaction_repository: C::TransactionRepository,
    config: Arc<DashboardConfig>,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> JobService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            job_repository: connection.create_job_repository(),
            client_repository: connection.create_client_repository(),
            technician_repository: connection.create_technician_repository(),
            job_source_repository: connection.create_job_source_repository(),
            transaction_repository: connection.create_transaction_repository(),
            config,
            clock,
        }
    }

    /// Create a new job in the `Scheduled` state
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<MutationResponse<Job>> {
        info!("Creating job: title={}, client={}", request.title, request.client_id);

        let max = self.config.max_text_length;
        let title = require_text("Job title", &request.title, max)?;
        let category = require_text("Category", &request.category, max)?;
        if !request.amount.is_finite() {
            return Err(ValidationError::InvalidAmount(request.amount.to_string()).into());
        }
        if request.amount < 0.0 {
            return Err(ValidationError::NegativeAmount.into());
        }

        if !self.client_repository.exists(&request.client_id).await? {
            return Err(unknown("client", &request.client_id));
        }
        let technician_id = optional_text(request.technician_id);
        if let Some(id) = &technician_id {
            if !self.technician_repository.exists(id).await? {
                return Err(unknown("technician", id));
            }
        }
        let source_id = optional_text(request.source_id);
        if let Some(id) = &source_id {
            if !self.job_source_repository.exists(id).await? {
                return Err(unknown("job source", id));
            }
        }

        let job = Job {
            id: shared::generate_id(Job::KIND),
            title,
            client_id: request.client_id,
            technician_id,
            source_id,
            category,
            status: JobStatus::Scheduled,
            date: request.date,
            amount: records::round_cents(request.amount),
            address: optional_text(request.address),
            notes: optional_text(request.notes),
        };
        self.job_repository.store(&job).await?;

        info!("Created job: {} with ID: {}", job.title, job.id);
        Ok(MutationResponse {
            record: job,
            success_message: "Job created successfully".to_string(),
        })
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let job = self.job_repository.get(job_id).await?;
        if job.is_none() {
            warn!("Job not found: {}", job_id);
        }
        Ok(job)
    }

    /// List jobs with filtering, sorting and cursor pagination
    pub async fn list_jobs(&self, query: ListQuery<JobStatus>) -> Result<ListResponse<Job>> {
        let limit = self.config.page_size(query.limit);
        info!(
            "Listing jobs: filter_active={}, after={:?}, limit={}",
            filter::is_active(&query.filter),
            query.after,
            limit
        );

        let jobs = self.job_repository.list().await?;
        let response = pagination::list_page(
            jobs,
            &query.filter,
            query.sort,
            query.after.as_deref(),
            limit,
            self.clock.now(),
        )?;

        info!(
            "Returning {} of {} matching jobs (has_more={})",
            response.items.len(),
            response.total_matched,
            response.pagination.has_more
        );
        Ok(response)
    }

    /// Every job matching the filter, in storage order
    pub async fn jobs_matching(&self, job_filter: &JobFilter) -> Result<Vec<Job>> {
        filter::validate_filter(job_filter)?;
        let jobs = self.job_repository.list().await?;
        Ok(filter::retain(jobs, job_filter, self.clock.now()))
    }

    pub async fn update_job_status(&self, job_id: &str, status: JobStatus) -> Result<MutationResponse<Job>> {
        let mut job = self.job_repository.require(job_id).await?;
        let previous = job.status;
        job.status = status;
        self.job_repository.update(&job).await?;

        info!("Job {} status: {} -> {}", job.id, previous.label(), status.label());
        Ok(MutationResponse {
            success_message: format!("Job marked as {}", status.label()),
            record: job,
        })
    }

    /// Assign a technician to a job, or clear the assignment with `None`
    pub async fn assign_technician(
        &self,
        job_id: &str,
        technician_id: Option<&str>,
    ) -> Result<MutationResponse<Job>> {
        let mut job = self.job_repository.require(job_id).await?;

        let success_message = match technician_id {
            Some(id) => {
                let technician = self
                    .technician_repository
                    .get(id)
                    .await?
                    .ok_or_else(|| unknown("technician", id))?;
                if !technician.is_active {
                    warn!("Assigning inactive technician {} to job {}", id, job_id);
                }
                job.technician_id = Some(technician.id);
                format!("Job assigned to {}", technician.name)
            }
            None => {
                job.technician_id = None;
                "Job unassigned".to_string()
            }
        };

        self.job_repository.update(&job).await?;
        Ok(MutationResponse {
            record: job,
            success_message,
        })
    }

    /// Delete multiple jobs
    ///
    /// Transactions booked against a deleted job stay in the ledger with
    /// their job link cleared.
    pub async fn delete_jobs(&self, request: DeleteRecordsRequest) -> Result<DeleteRecordsResponse> {
        info!("Deleting jobs: {:?}", request.ids);
        let requested = request.ids.clone();
        let response = records::delete_records(&self.job_repository, request, "job", "jobs").await?;

        let deleted: Vec<&String> = requested
            .iter()
            .filter(|id| !response.not_found_ids.contains(id))
            .collect();
        if !deleted.is_empty() {
            for mut transaction in self.transaction_repository.list().await? {
                if transaction.job_id.as_ref().is_some_and(|id| deleted.contains(&id)) {
                    transaction.job_id = None;
                    self.transaction_repository.update(&transaction).await?;
                    info!("Detached transaction {} from deleted job", transaction.id);
                }
            }
        }
        Ok(response)
    }

    pub async fn all_jobs(&self) -> Result<Vec<Job>> {
        self.job_repository.list().await
    }
}

fn unknown(kind: &'static str, id: &str) -> anyhow::Error {
    ValidationError::UnknownReference {
        kind,
        id: id.to_string(),
    }
    .into()
}
