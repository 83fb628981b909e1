//! Aggregate views over a filtered job set: where work comes from and who
//! is doing it.

use anyhow::Result;
use shared::{Job, JobFilter, JobSourceStats, JobStatus, TechnicianWorkload};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::clock::Clock;
use super::filter;
use super::records::round_cents;
use crate::storage::{Connection, EntityStorage};

/// Label for jobs that were not attributed to any source
pub const UNATTRIBUTED_SOURCE: &str = "Unattributed";

#[derive(Clone)]
pub struct ReportService<C: Connection> {
    job_repository: C::JobRepository,
    technician_repository: C::TechnicianRepository,
    job_source_repository: C::JobSourceRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: &C, clock: Arc<dyn Clock>) -> Self {
        Self {
            job_repository: connection.create_job_repository(),
            technician_repository: connection.create_technician_repository(),
            job_source_repository: connection.create_job_source_repository(),
            clock,
        }
    }

    async fn filtered_jobs(&self, job_filter: &JobFilter) -> Result<Vec<Job>> {
        filter::validate_filter(job_filter)?;
        let jobs = self.job_repository.list().await?;
        Ok(filter::retain(jobs, job_filter, self.clock.now()))
    }

    /// Job counts and completed revenue per source
    ///
    /// Every known source is listed, busiest first. Jobs without a source
    /// are grouped in a trailing row only when there are any.
    pub async fn job_source_stats(&self, job_filter: &JobFilter) -> Result<Vec<JobSourceStats>> {
        let jobs = self.filtered_jobs(job_filter).await?;
        let sources = self.job_source_repository.list().await?;

        let mut stats: Vec<JobSourceStats> = sources
            .into_iter()
            .map(|source| JobSourceStats {
                source_id: Some(source.id),
                source_name: source.name,
                job_count: 0,
                completed_count: 0,
                revenue: 0.0,
            })
            .collect();
        let mut unattributed = JobSourceStats {
            source_id: None,
            source_name: UNATTRIBUTED_SOURCE.to_string(),
            job_count: 0,
            completed_count: 0,
            revenue: 0.0,
        };

        for job in &jobs {
            let row = match &job.source_id {
                Some(id) => match stats.iter_mut().find(|s| s.source_id.as_deref() == Some(id.as_str())) {
                    Some(row) => row,
                    None => &mut unattributed,
                },
                None => &mut unattributed,
            };
            row.job_count += 1;
            if job.status == JobStatus::Completed {
                row.completed_count += 1;
                row.revenue += job.amount;
            }
        }

        if unattributed.job_count > 0 {
            stats.push(unattributed);
        }
        for row in &mut stats {
            row.revenue = round_cents(row.revenue);
        }
        // Stable sort keeps the unattributed row after sources with equal counts
        stats.sort_by(|a, b| b.job_count.cmp(&a.job_count));

        info!("Computed stats for {} job sources over {} jobs", stats.len(), jobs.len());
        Ok(stats)
    }

    /// Per-technician job counts by status
    ///
    /// Only technicians with at least one matching job are listed, ordered
    /// by name. Unassigned jobs are not counted.
    pub async fn technician_workload(&self, job_filter: &JobFilter) -> Result<Vec<TechnicianWorkload>> {
        let jobs = self.filtered_jobs(job_filter).await?;
        let names: HashMap<String, String> = self
            .technician_repository
            .list()
            .await?
            .into_iter()
            .map(|technician| (technician.id, technician.name))
            .collect();

        let mut workloads: HashMap<&str, TechnicianWorkload> = HashMap::new();
        for job in &jobs {
            let Some(technician_id) = job.technician_id.as_deref() else {
                continue;
            };
            let workload = workloads.entry(technician_id).or_insert_with(|| TechnicianWorkload {
                technician_id: technician_id.to_string(),
                technician_name: names
                    .get(technician_id)
                    .cloned()
                    .unwrap_or_else(|| technician_id.to_string()),
                scheduled: 0,
                in_progress: 0,
                completed: 0,
                revenue: 0.0,
            });
            match job.status {
                JobStatus::Scheduled => workload.scheduled += 1,
                JobStatus::InProgress => workload.in_progress += 1,
                JobStatus::Completed => {
                    workload.completed += 1;
                    workload.revenue += job.amount;
                }
                JobStatus::Cancelled => {}
            }
        }

        let mut result: Vec<TechnicianWorkload> = workloads
            .into_values()
            .map(|mut workload| {
                workload.revenue = round_cents(workload.revenue);
                workload
            })
            .collect();
        result.sort_by(|a, b| a.technician_name.cmp(&b.technician_name));
        Ok(result)
    }
}
