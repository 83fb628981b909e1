//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Client, Job, JobSource, Project, Task, Technician, Transaction};

use super::error::StorageError;

/// A record that can be kept in a repository
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable record kind, also used as the generated-id prefix
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Trait defining the interface for record storage operations
///
/// Implementations keep insertion order for `list`.
#[async_trait]
pub trait EntityStorage<T: Entity>: Send + Sync {
    /// Store a new record; fails if the id is already taken
    async fn store(&self, record: &T) -> Result<()>;

    /// Retrieve a specific record by ID
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// List all records in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record; fails if the id is unknown
    async fn update(&self, record: &T) -> Result<()>;

    /// Delete a record
    /// Returns true if the record was found and deleted, false otherwise
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Retrieve a record that must exist
    async fn require(&self, id: &str) -> Result<T> {
        self.get(id).await?.ok_or_else(|| {
            StorageError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Delete multiple records
    /// Returns the ids that were actually deleted
    async fn delete_many(&self, ids: &[String]) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for id in ids {
            if self.delete(id).await? {
                deleted.push(id.clone());
            }
        }
        Ok(deleted)
    }
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for one repository per record kind so the
/// domain layer can work with any storage backend without knowing the
/// implementation details.
pub trait Connection: Send + Sync + Clone {
    type ClientRepository: EntityStorage<Client> + Clone;
    type TechnicianRepository: EntityStorage<Technician> + Clone;
    type JobSourceRepository: EntityStorage<JobSource> + Clone;
    type JobRepository: EntityStorage<Job> + Clone;
    type ProjectRepository: EntityStorage<Project> + Clone;
    type TaskRepository: EntityStorage<Task> + Clone;
    type TransactionRepository: EntityStorage<Transaction> + Clone;

    fn create_client_repository(&self) -> Self::ClientRepository;
    fn create_technician_repository(&self) -> Self::TechnicianRepository;
    fn create_job_source_repository(&self) -> Self::JobSourceRepository;
    fn create_job_repository(&self) -> Self::JobRepository;
    fn create_project_repository(&self) -> Self::ProjectRepository;
    fn create_task_repository(&self) -> Self::TaskRepository;
    fn create_transaction_repository(&self) -> Self::TransactionRepository;
}

impl Entity for Client {
    const KIND: &'static str = "client";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Technician {
    const KIND: &'static str = "technician";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for JobSource {
    const KIND: &'static str = "job_source";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Job {
    const KIND: &'static str = "job";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Project {
    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Transaction {
    const KIND: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.id
    }
}
