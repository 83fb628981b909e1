use anyhow::Result;
use shared::{CreateTechnicianRequest, MutationResponse, Technician};
use std::sync::Arc;
use tracing::{info, warn};

use super::validation::{optional_text, require_text, validate_email, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

/// Service for managing technicians
#[derive(Clone)]
pub struct TechnicianService<C: Connection> {
    technician_repository: C::TechnicianRepository,
    job_repository: C::JobRepository,
    task_repository: C::TaskRepository,
    transaction_repository: C::TransactionRepository,
    config: Arc<DashboardConfig>,
}

impl<C: Connection> TechnicianService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>) -> Self {
        Self {
            technician_repository: connection.create_technician_repository(),
            job_repository: connection.create_job_repository(),
            task_repository: connection.create_task_repository(),
            transaction_repository: connection.create_transaction_repository(),
            config,
        }
    }

    /// Create a new technician; new technicians start active
    pub async fn create_technician(
        &self,
        request: CreateTechnicianRequest,
    ) -> Result<MutationResponse<Technician>> {
        info!("Creating technician: name={}", request.name);

        let name = require_text("Technician name", &request.name, self.config.max_text_length)?;
        let email = optional_text(request.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        let technician = Technician {
            id: shared::generate_id(Technician::KIND),
            name,
            email,
            phone: optional_text(request.phone),
            specialty: optional_text(request.specialty),
            is_active: true,
        };
        self.technician_repository.store(&technician).await?;

        info!("Created technician: {} with ID: {}", technician.name, technician.id);
        Ok(MutationResponse {
            record: technician,
            success_message: "Technician created successfully".to_string(),
        })
    }

    pub async fn get_technician(&self, technician_id: &str) -> Result<Option<Technician>> {
        let technician = self.technician_repository.get(technician_id).await?;
        if technician.is_none() {
            warn!("Technician not found: {}", technician_id);
        }
        Ok(technician)
    }

    /// List technicians by name
    pub async fn list_technicians(&self, active_only: bool) -> Result<Vec<Technician>> {
        let mut technicians: Vec<Technician> = self
            .technician_repository
            .list()
            .await?
            .into_iter()
            .filter(|technician| !active_only || technician.is_active)
            .collect();
        technicians.sort_by_key(|technician| technician.name.to_lowercase());
        Ok(technicians)
    }

    /// Activate or deactivate a technician
    ///
    /// Deactivated technicians keep their assigned jobs; they are only hidden
    /// from assignment pickers.
    pub async fn set_active(&self, technician_id: &str, is_active: bool) -> Result<Technician> {
        let mut technician = self.technician_repository.require(technician_id).await?;
        if technician.is_active != is_active {
            technician.is_active = is_active;
            self.technician_repository.update(&technician).await?;
            info!("Technician {} active={}", technician.id, is_active);
        }
        Ok(technician)
    }

    /// Delete a technician with no assigned jobs
    ///
    /// Tasks assigned to the technician become unassigned and transactions
    /// keep their amounts but lose the technician link.
    pub async fn delete_technician(&self, technician_id: &str) -> Result<()> {
        info!("Deleting technician: {}", technician_id);
        self.technician_repository.require(technician_id).await?;

        let job_count = self
            .job_repository
            .list()
            .await?
            .iter()
            .filter(|job| job.technician_id.as_deref() == Some(technician_id))
            .count();
        if job_count > 0 {
            return Err(ValidationError::StillReferenced {
                kind: "technician",
                id: technician_id.to_string(),
                count: job_count,
            }
            .into());
        }

        for mut task in self.task_repository.list().await? {
            if task.assignee_id.as_deref() == Some(technician_id) {
                task.assignee_id = None;
                self.task_repository.update(&task).await?;
                info!("Unassigned task {} from deleted technician", task.id);
            }
        }
        for mut transaction in self.transaction_repository.list().await? {
            if transaction.technician_id.as_deref() == Some(technician_id) {
                transaction.technician_id = None;
                self.transaction_repository.update(&transaction).await?;
                info!("Detached transaction {} from deleted technician", transaction.id);
            }
        }

        self.technician_repository.delete(technician_id).await?;
        Ok(())
    }
}
