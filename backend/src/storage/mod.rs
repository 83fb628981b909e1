//! # Storage Module
//!
//! Holds the dashboard's records for the lifetime of the process.
//!
//! The domain layer only sees the [`EntityStorage`] and [`Connection`]
//! traits, so services are written once and run against whatever backend
//! implements them. The only backend today is the in-memory one, seeded
//! from [`MockDataset`]; nothing is written to disk.
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: one repository per record kind
//! - **Dependency Inversion**: services depend on traits, not on `MemoryConnection`
//! - **Testability**: a fresh connection per test, optionally seeded

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StorageError;
pub use memory::{MemoryConnection, MemoryRepository, MockDataset};
pub use traits::{Connection, Entity, EntityStorage};
