//! # Domain Module
//!
//! Contains all business logic for the field service dashboard.
//!
//! This module models the day-to-day of a small service company: clients
//! and the jobs booked for them, the technicians doing the work, where the
//! leads came from, internal projects and tasks, and the money ledger. It
//! operates independently of any UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **date_window**: Named windows ("this week", "last month", custom
//!   ranges) resolved into concrete intervals against a supplied "now"
//! - **filter**: Multi-dimensional record filtering shared by all lists
//! - **pagination**: Sorting and cursor pagination for list views
//! - **calendar**: Month grid with per-day job and task counts
//! - **\*_service**: Record services, one per kind of record
//! - **report_service**: Aggregates by job source and technician
//! - **table**: Table formatting for the ledger and job board
//!
//! ## Business Rules
//!
//! - Filters combine their active dimensions with AND; selected values
//!   inside one dimension are alternatives
//! - Date windows never read the system clock themselves; services pass the
//!   time from their [`Clock`]
//! - Transaction amounts are positive magnitudes, the type carries the sign
//! - Clients and technicians with jobs cannot be deleted; every other
//!   reference to a deleted record is cleared rather than left dangling

pub mod calendar;
pub mod client_service;
pub mod clock;
pub mod date_window;
pub mod filter;
pub mod job_service;
pub mod job_source_service;
pub mod pagination;
pub mod project_service;
pub mod records;
pub mod report_service;
pub mod table;
pub mod task_service;
pub mod technician_service;
pub mod transaction_service;
pub mod validation;

pub use calendar::*;
pub use client_service::*;
pub use clock::*;
pub use job_service::*;
pub use job_source_service::*;
pub use project_service::*;
pub use report_service::*;
pub use table::*;
pub use task_service::*;
pub use technician_service::*;
pub use transaction_service::*;
pub use validation::ValidationError;
