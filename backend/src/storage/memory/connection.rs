use shared::{Client, Job, JobSource, Project, Task, Technician, Transaction};
use tracing::info;

use super::mock_data::MockDataset;
use super::repository::MemoryRepository;
use crate::storage::traits::Connection;

/// In-memory connection holding one shared repository per record kind
#[derive(Clone, Default)]
pub struct MemoryConnection {
    clients: MemoryRepository<Client>,
    technicians: MemoryRepository<Technician>,
    job_sources: MemoryRepository<JobSource>,
    jobs: MemoryRepository<Job>,
    projects: MemoryRepository<Project>,
    tasks: MemoryRepository<Task>,
    transactions: MemoryRepository<Transaction>,
}

impl MemoryConnection {
    /// Create an empty connection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connection pre-populated with a mock dataset
    pub fn seeded(dataset: MockDataset) -> Self {
        info!(
            "Seeding in-memory storage: {} clients, {} jobs, {} tasks, {} transactions",
            dataset.clients.len(),
            dataset.jobs.len(),
            dataset.tasks.len(),
            dataset.transactions.len()
        );
        Self {
            clients: MemoryRepository::with_records(dataset.clients),
            technicians: MemoryRepository::with_records(dataset.technicians),
            job_sources: MemoryRepository::with_records(dataset.job_sources),
            jobs: MemoryRepository::with_records(dataset.jobs),
            projects: MemoryRepository::with_records(dataset.projects),
            tasks: MemoryRepository::with_records(dataset.tasks),
            transactions: MemoryRepository::with_records(dataset.transactions),
        }
    }
}

impl Connection for MemoryConnection {
    type ClientRepository = MemoryRepository<Client>;
    type TechnicianRepository = MemoryRepository<Technician>;
    type JobSourceRepository = MemoryRepository<JobSource>;
    type JobRepository = MemoryRepository<Job>;
    type ProjectRepository = MemoryRepository<Project>;
    type TaskRepository = MemoryRepository<Task>;
    type TransactionRepository = MemoryRepository<Transaction>;

    fn create_client_repository(&self) -> Self::ClientRepository {
        self.clients.clone()
    }

    fn create_technician_repository(&self) -> Self::TechnicianRepository {
        self.technicians.clone()
    }

    fn create_job_source_repository(&self) -> Self::JobSourceRepository {
        self.job_sources.clone()
    }

    fn create_job_repository(&self) -> Self::JobRepository {
        self.jobs.clone()
    }

    fn create_project_repository(&self) -> Self::ProjectRepository {
        self.projects.clone()
    }

    fn create_task_repository(&self) -> Self::TaskRepository {
        self.tasks.clone()
    }

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        self.transactions.clone()
    }
}
