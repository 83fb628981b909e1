use anyhow::Result;
use shared::{CreateJobSourceRequest, JobSource, MutationResponse};
use std::sync::Arc;
use tracing::info;

use super::validation::{require_text, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

/// Service for the lead sources jobs are attributed to
#[derive(Clone)]
pub struct JobSourceService<C: Connection> {
    job_source_repository: C::JobSourceRepository,
    job_repository: C::JobRepository,
    transaction_repository: C::TransactionRepository,
    config: Arc<DashboardConfig>,
}

impl<C: Connection> JobSourceService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>) -> Self {
        Self {
            job_source_repository: connection.create_job_source_repository(),
            job_repository: connection.create_job_repository(),
            transaction_repository: connection.create_transaction_repository(),
            config,
        }
    }

    /// Create a job source; names are unique ignoring case
    ///
    /// The duplicate check and the insert are separate repository calls, so
    /// uniqueness is best-effort when two creates with the same name race.
    pub async fn create_job_source(
        &self,
        request: CreateJobSourceRequest,
    ) -> Result<MutationResponse<JobSource>> {
        let name = require_text("Job source name", &request.name, self.config.max_text_length)?;

        let existing = self.job_source_repository.list().await?;
        if existing
            .iter()
            .any(|source| source.name.eq_ignore_ascii_case(&name))
        {
            return Err(ValidationError::DuplicateName("job source").into());
        }

        let source = JobSource {
            id: shared::generate_id(JobSource::KIND),
            name,
            is_active: true,
        };
        self.job_source_repository.store(&source).await?;

        info!("Created job source: {} with ID: {}", source.name, source.id);
        Ok(MutationResponse {
            record: source,
            success_message: "Job source created successfully".to_string(),
        })
    }

    pub async fn get_job_source(&self, source_id: &str) -> Result<Option<JobSource>> {
        self.job_source_repository.get(source_id).await
    }

    pub async fn list_job_sources(&self) -> Result<Vec<JobSource>> {
        let mut sources = self.job_source_repository.list().await?;
        sources.sort_by_key(|source| source.name.to_lowercase());
        Ok(sources)
    }

    /// Delete a job source; jobs and transactions attributed to it become
    /// unattributed
    pub async fn delete_job_source(&self, source_id: &str) -> Result<()> {
        self.job_source_repository.require(source_id).await?;

        let mut detached = 0;
        for mut job in self.job_repository.list().await? {
            if job.source_id.as_deref() == Some(source_id) {
                job.source_id = None;
                self.job_repository.update(&job).await?;
                detached += 1;
            }
        }

        for mut transaction in self.transaction_repository.list().await? {
            if transaction.source_id.as_deref() == Some(source_id) {
                transaction.source_id = None;
                self.transaction_repository.update(&transaction).await?;
                detached += 1;
            }
        }

        self.job_source_repository.delete(source_id).await?;
        info!("Deleted job source {} ({} records detached)", source_id, detached);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryConnection, MockDataset};
    use chrono::NaiveDate;

    fn setup_test() -> (JobSourceService<MemoryConnection>, MemoryConnection) {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let connection = MemoryConnection::seeded(MockDataset::anchored_at(anchor));
        let service = JobSourceService::new(&connection, Arc::new(DashboardConfig::default()));
        (service, connection)
    }

    fn request(name: &str) -> CreateJobSourceRequest {
        CreateJobSourceRequest { name: name.to_string() }
    }

    #[tokio::test]
    async fn test_create_job_source_rejects_duplicates() {
        let (service, _) = setup_test();

        let response = service.create_job_source(request("Nextdoor")).await.unwrap();
        assert_eq!(response.record.name, "Nextdoor");

        let err = service.create_job_source(request("  google ads ")).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::DuplicateName("job source"))
        );

        let sources = service.list_job_sources().await.unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Google Ads", "Nextdoor", "Referral", "Website", "Yelp"]);
    }

    #[tokio::test]
    async fn test_delete_job_source_detaches_jobs() {
        let (service, connection) = setup_test();

        service.delete_job_source("source-4").await.unwrap();
        assert!(service.get_job_source("source-4").await.unwrap().is_none());

        let jobs = connection.create_job_repository().list().await.unwrap();
        assert!(jobs.iter().all(|job| job.source_id.as_deref() != Some("source-4")));
        let job_9 = jobs.iter().find(|job| job.id == "job-9").unwrap();
        assert_eq!(job_9.source_id, None);
    }

    #[tokio::test]
    async fn test_delete_job_source_detaches_transactions() {
        let (service, connection) = setup_test();

        service.delete_job_source("source-2").await.unwrap();

        let transactions = connection.create_transaction_repository().list().await.unwrap();
        assert!(transactions.iter().all(|t| t.source_id.as_deref() != Some("source-2")));
        let tx11 = transactions.iter().find(|t| t.id == "tx-11").unwrap();
        assert_eq!(tx11.source_id, None);
        assert_eq!(tx11.amount, 50.0);
        let tx1 = transactions.iter().find(|t| t.id == "tx-1").unwrap();
        assert_eq!(tx1.source_id.as_deref(), Some("source-1"));
    }
}
