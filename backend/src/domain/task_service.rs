use anyhow::Result;
use shared::{
    CreateTaskRequest, DeleteRecordsRequest, DeleteRecordsResponse, ListQuery, ListResponse,
    MutationResponse, Task, TaskStatus,
};
use std::sync::Arc;
use tracing::info;

use super::clock::Clock;
use super::pagination;
use super::records;
use super::validation::{optional_text, require_text, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

/// Service for the to-do list, both project tasks and standalone ones
#[derive(Clone)]
pub struct TaskService<C: Connection> {
    task_repository: C::TaskRepository,
    project_repository: C::ProjectRepository,
    technician_repository: C::TechnicianRepository,
    config: Arc<DashboardConfig>,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> TaskService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            task_repository: connection.create_task_repository(),
            project_repository: connection.create_project_repository(),
            technician_repository: connection.create_technician_repository(),
            config,
            clock,
        }
    }

    /// Create a task in the `Todo` state
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<MutationResponse<Task>> {
        let title = require_text("Task title", &request.title, self.config.max_text_length)?;

        let project_id = optional_text(request.project_id);
        if let Some(id) = &project_id {
            if !self.project_repository.exists(id).await? {
                return Err(ValidationError::UnknownReference {
                    kind: "project",
                    id: id.clone(),
                }
                .into());
            }
        }
        let assignee_id = optional_text(request.assignee_id);
        if let Some(id) = &assignee_id {
            if !self.technician_repository.exists(id).await? {
                return Err(ValidationError::UnknownReference {
                    kind: "technician",
                    id: id.clone(),
                }
                .into());
            }
        }

        let task = Task {
            id: shared::generate_id(Task::KIND),
            title,
            project_id,
            assignee_id,
            category: optional_text(request.category),
            priority: request.priority,
            status: TaskStatus::Todo,
            due_date: request.due_date,
        };
        self.task_repository.store(&task).await?;

        info!("Created task: {} with ID: {}", task.title, task.id);
        Ok(MutationResponse {
            record: task,
            success_message: "Task created successfully".to_string(),
        })
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.task_repository.get(task_id).await
    }

    /// List tasks with filtering, sorting and cursor pagination
    pub async fn list_tasks(&self, query: ListQuery<TaskStatus>) -> Result<ListResponse<Task>> {
        let limit = self.config.page_size(query.limit);
        let tasks = self.task_repository.list().await?;
        let response = pagination::list_page(
            tasks,
            &query.filter,
            query.sort,
            query.after.as_deref(),
            limit,
            self.clock.now(),
        )?;
        info!("Returning {} of {} matching tasks", response.items.len(), response.total_matched);
        Ok(response)
    }

    pub async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<MutationResponse<Task>> {
        let mut task = self.task_repository.require(task_id).await?;
        task.status = status;
        self.task_repository.update(&task).await?;

        info!("Task {} is now {}", task.id, status.label());
        Ok(MutationResponse {
            success_message: format!("Task marked as {}", status.label()),
            record: task,
        })
    }

    pub async fn delete_tasks(&self, request: DeleteRecordsRequest) -> Result<DeleteRecordsResponse> {
        records::delete_records(&self.task_repository, request, "task", "tasks").await
    }

    pub async fn all_tasks(&self) -> Result<Vec<Task>> {
        self.task_repository.list().await
    }
}
