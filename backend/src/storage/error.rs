use thiserror::Error;

/// Failures raised by repositories
#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    #[error("{kind} with id '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}
