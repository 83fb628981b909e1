use anyhow::Result;
use shared::{Client, CreateClientRequest, MutationResponse, UpdateClientRequest};
use std::sync::Arc;
use tracing::{info, warn};

use super::clock::Clock;
use super::validation::{optional_text, require_text, validate_email, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

/// Service for managing the client list
#[derive(Clone)]
pub struct ClientService<C: Connection> {
    client_repository: C::ClientRepository,
    job_repository: C::JobRepository,
    project_repository: C::ProjectRepository,
    config: Arc<DashboardConfig>,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> ClientService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client_repository: connection.create_client_repository(),
            job_repository: connection.create_job_repository(),
            project_repository: connection.create_project_repository(),
            config,
            clock,
        }
    }

    /// Create a new client
    pub async fn create_client(&self, request: CreateClientRequest) -> Result<MutationResponse<Client>> {
        info!("Creating client: name={}", request.name);

        let name = require_text("Client name", &request.name, self.config.max_text_length)?;
        let email = optional_text(request.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        let client = Client {
            id: shared::generate_id(Client::KIND),
            name,
            email,
            phone: optional_text(request.phone),
            address: optional_text(request.address),
            created_at: self.clock.now(),
        };
        self.client_repository.store(&client).await?;

        info!("Created client: {} with ID: {}", client.name, client.id);
        Ok(MutationResponse {
            record: client,
            success_message: "Client created successfully".to_string(),
        })
    }

    /// Get a client by ID
    pub async fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        let client = self.client_repository.get(client_id).await?;
        if client.is_none() {
            warn!("Client not found: {}", client_id);
        }
        Ok(client)
    }

    /// List clients ordered by name, optionally narrowed by a search term
    /// matched against name, email, phone and address
    pub async fn list_clients(&self, search: &str) -> Result<Vec<Client>> {
        let needle = search.trim().to_lowercase();
        let mut clients: Vec<Client> = self
            .client_repository
            .list()
            .await?
            .into_iter()
            .filter(|client| {
                needle.is_empty()
                    || [
                        Some(client.name.as_str()),
                        client.email.as_deref(),
                        client.phone.as_deref(),
                        client.address.as_deref(),
                    ]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect();
        clients.sort_by_key(|client| client.name.to_lowercase());
        Ok(clients)
    }

    /// Update an existing client; absent fields are left unchanged
    pub async fn update_client(
        &self,
        client_id: &str,
        request: UpdateClientRequest,
    ) -> Result<MutationResponse<Client>> {
        info!("Updating client: {}", client_id);
        let mut client = self.client_repository.require(client_id).await?;

        if let Some(name) = request.name {
            client.name = require_text("Client name", &name, self.config.max_text_length)?;
        }
        if let Some(email) = request.email {
            let email = optional_text(Some(email));
            if let Some(email) = &email {
                validate_email(email)?;
            }
            client.email = email;
        }
        if let Some(phone) = request.phone {
            client.phone = optional_text(Some(phone));
        }
        if let Some(address) = request.address {
            client.address = optional_text(Some(address));
        }

        self.client_repository.update(&client).await?;
        Ok(MutationResponse {
            record: client,
            success_message: "Client updated successfully".to_string(),
        })
    }

    /// Delete a client that no job refers to
    ///
    /// Projects owned by the client are kept as internal projects.
    pub async fn delete_client(&self, client_id: &str) -> Result<()> {
        info!("Deleting client: {}", client_id);
        let client = self.client_repository.require(client_id).await?;

        let job_count = self
            .job_repository
            .list()
            .await?
            .iter()
            .filter(|job| job.client_id == client_id)
            .count();
        if job_count > 0 {
            return Err(ValidationError::StillReferenced {
                kind: "client",
                id: client_id.to_string(),
                count: job_count,
            }
            .into());
        }

        for mut project in self.project_repository.list().await? {
            if project.client_id.as_deref() == Some(client_id) {
                project.client_id = None;
                self.project_repository.update(&project).await?;
                info!("Detached project {} from deleted client", project.id);
            }
        }

        self.client_repository.delete(client_id).await?;
        info!("Deleted client: {} with ID: {}", client.name, client.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::{MemoryConnection, MockDataset, StorageError};
    use chrono::NaiveDate;

    fn setup_test() -> ClientService<MemoryConnection> {
        setup_test_with_connection().0
    }

    fn setup_test_with_connection() -> (ClientService<MemoryConnection>, MemoryConnection) {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let connection = MemoryConnection::seeded(MockDataset::anchored_at(anchor));
        let clock = FixedClock(anchor.and_hms_opt(12, 0, 0).unwrap());
        let service = ClientService::new(&connection, Arc::new(DashboardConfig::default()), Arc::new(clock));
        (service, connection)
    }

    fn request(name: &str, email: Option<&str>) -> CreateClientRequest {
        CreateClientRequest {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: Some("  ".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_client() {
        let service = setup_test();

        let response = service
            .create_client(request("  Riverside Gym ", Some("desk@riverside.example")))
            .await
            .expect("Failed to create client");

        assert_eq!(response.record.name, "Riverside Gym");
        assert!(response.record.id.starts_with("client::"));
        assert_eq!(response.record.phone, None);
        assert_eq!(response.success_message, "Client created successfully");

        let stored = service.get_client(&response.record.id).await.unwrap();
        assert_eq!(stored, Some(response.record));
    }

    #[tokio::test]
    async fn test_create_client_validation() {
        let service = setup_test();

        let err = service.create_client(request("", None)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingField("Client name"))
        );

        let err = service
            .create_client(request("Acme", Some("not-an-email")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_list_clients_search_and_order() {
        let service = setup_test();

        let all = service.list_clients("").await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Harbor View Apartments", "Lakeside Bakery", "Maria Gonzalez", "Northside Dental", "Tom Becker"]
        );

        let matched = service.list_clients("EXAMPLE.COM").await.unwrap();
        assert_eq!(matched.len(), 2);

        let by_address = service.list_clients("main ave").await.unwrap();
        assert_eq!(by_address[0].id, "client-3");
    }

    #[tokio::test]
    async fn test_update_client() {
        let service = setup_test();

        let response = service
            .update_client(
                "client-4",
                UpdateClientRequest {
                    phone: Some("555-0142".to_string()),
                    email: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(response.record.name, "Tom Becker");
        assert_eq!(response.record.phone.as_deref(), Some("555-0142"));
        assert_eq!(response.record.email, None);

        let err = service
            .update_client("client-404", UpdateClientRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_client_refused_while_referenced() {
        let service = setup_test();

        let err = service.delete_client("client-1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::StillReferenced { count: 3, .. })
        ));

        let created = service.create_client(request("Temp Client", None)).await.unwrap();
        service.delete_client(&created.record.id).await.unwrap();
        assert!(service.get_client(&created.record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_client_detaches_projects() {
        let (service, connection) = setup_test_with_connection();
        let jobs = connection.create_job_repository();
        jobs.delete_many(&["job-1".to_string(), "job-5".to_string(), "job-11".to_string()])
            .await
            .unwrap();

        service.delete_client("client-1").await.unwrap();

        let project = connection.create_project_repository().get("project-1").await.unwrap().unwrap();
        assert_eq!(project.client_id, None);
        assert!(service.get_client("client-1").await.unwrap().is_none());
    }
}
