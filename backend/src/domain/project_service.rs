use anyhow::Result;
use shared::{CreateProjectRequest, MutationResponse, Project, ProjectProgress, ProjectStatus, TaskStatus};
use std::sync::Arc;
use tracing::info;

use super::records::round_cents;
use super::validation::{optional_text, require_text, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

/// Service for internal projects grouping tasks
#[derive(Clone)]
pub struct ProjectService<C: Connection> {
    project_repository: C::ProjectRepository,
    task_repository: C::TaskRepository,
    client_repository: C::ClientRepository,
    config: Arc<DashboardConfig>,
}

impl<C: Connection> ProjectService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>) -> Self {
        Self {
            project_repository: connection.create_project_repository(),
            task_repository: connection.create_task_repository(),
            client_repository: connection.create_client_repository(),
            config,
        }
    }

    /// Create a project in the `Planning` state
    pub async fn create_project(&self, request: CreateProjectRequest) -> Result<MutationResponse<Project>> {
        let name = require_text("Project name", &request.name, self.config.max_text_length)?;
        if let Some(end_date) = request.end_date {
            if end_date < request.start_date {
                return Err(ValidationError::InvalidDateRange.into());
            }
        }

        let client_id = optional_text(request.client_id);
        if let Some(id) = &client_id {
            if !self.client_repository.exists(id).await? {
                return Err(ValidationError::UnknownReference {
                    kind: "client",
                    id: id.clone(),
                }
                .into());
            }
        }

        let project = Project {
            id: shared::generate_id(Project::KIND),
            name,
            client_id,
            status: ProjectStatus::Planning,
            start_date: request.start_date,
            end_date: request.end_date,
        };
        self.project_repository.store(&project).await?;

        info!("Created project: {} with ID: {}", project.name, project.id);
        Ok(MutationResponse {
            record: project,
            success_message: "Project created successfully".to_string(),
        })
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        self.project_repository.get(project_id).await
    }

    /// Projects ordered by start date
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects = self.project_repository.list().await?;
        projects.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        Ok(projects)
    }

    pub async fn set_status(&self, project_id: &str, status: ProjectStatus) -> Result<Project> {
        let mut project = self.project_repository.require(project_id).await?;
        project.status = status;
        self.project_repository.update(&project).await?;
        Ok(project)
    }

    /// Share of the project's tasks that are done
    pub async fn progress(&self, project_id: &str) -> Result<ProjectProgress> {
        self.project_repository.require(project_id).await?;

        let tasks = self.task_repository.list().await?;
        let (total_tasks, done_tasks) = tasks
            .iter()
            .filter(|task| task.project_id.as_deref() == Some(project_id))
            .fold((0, 0), |(total, done), task| {
                (total + 1, done + usize::from(task.status == TaskStatus::Done))
            });

        let percent_complete = if total_tasks == 0 {
            0.0
        } else {
            round_cents(done_tasks as f64 * 100.0 / total_tasks as f64)
        };

        Ok(ProjectProgress {
            project_id: project_id.to_string(),
            total_tasks,
            done_tasks,
            percent_complete,
        })
    }

    /// Delete a project; its tasks stay on the to-do list without a project
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.project_repository.require(project_id).await?;

        let mut detached = 0;
        for mut task in self.task_repository.list().await? {
            if task.project_id.as_deref() == Some(project_id) {
                task.project_id = None;
                self.task_repository.update(&task).await?;
                detached += 1;
            }
        }

        self.project_repository.delete(project_id).await?;
        info!("Deleted project {} ({} tasks detached)", project_id, detached);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryConnection, MockDataset};
    use chrono::NaiveDate;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
    }

    fn setup_test() -> (ProjectService<MemoryConnection>, MemoryConnection) {
        let connection = MemoryConnection::seeded(MockDataset::anchored_at(anchor()));
        let service = ProjectService::new(&connection, Arc::new(DashboardConfig::default()));
        (service, connection)
    }

    #[tokio::test]
    async fn test_create_project_validates_dates() {
        let (service, _) = setup_test();

        let err = service
            .create_project(CreateProjectRequest {
                name: "Warehouse".to_string(),
                client_id: None,
                start_date: anchor(),
                end_date: Some(anchor() - chrono::Duration::days(1)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::InvalidDateRange));

        let response = service
            .create_project(CreateProjectRequest {
                name: "Warehouse".to_string(),
                client_id: Some("client-3".to_string()),
                start_date: anchor(),
                end_date: Some(anchor()),
            })
            .await
            .unwrap();
        assert_eq!(response.record.status, ProjectStatus::Planning);

        let projects = service.list_projects().await.unwrap();
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["project-1", response.record.id.as_str(), "project-2"]);
    }

    #[tokio::test]
    async fn test_progress() {
        let (service, _) = setup_test();

        let progress = service.progress("project-1").await.unwrap();
        assert_eq!(progress.total_tasks, 3);
        assert_eq!(progress.done_tasks, 1);
        assert_eq!(progress.percent_complete, 33.33);

        let progress = service.progress("project-2").await.unwrap();
        assert_eq!(progress.percent_complete, 0.0);

        assert!(service.progress("project-9").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_project_detaches_tasks() {
        let (service, connection) = setup_test();

        service.delete_project("project-1").await.unwrap();
        assert!(service.get_project("project-1").await.unwrap().is_none());

        let tasks = connection.create_task_repository().list().await.unwrap();
        assert_eq!(tasks.len(), 8);
        assert!(tasks.iter().all(|task| task.project_id.as_deref() != Some("project-1")));
    }
}
