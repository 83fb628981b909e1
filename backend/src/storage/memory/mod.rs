//! In-memory storage backend.
//!
//! Records live in `tokio::sync::RwLock`-guarded vectors shared through
//! `Arc`s, so cloned repositories and connections all see the same data.

pub mod connection;
pub mod mock_data;
pub mod repository;

pub use connection::MemoryConnection;
pub use mock_data::MockDataset;
pub use repository::MemoryRepository;
