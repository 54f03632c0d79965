//! Typed data access for client records.
//! This crate owns the client schema, its queries and their error contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientId, ClientValidationError};
pub use repo::client_repo::{ClientRepository, SqliteClientRepository};
pub use repo::crud::{CrudRepository, RepoError, RepoResult};
pub use service::client_service::{ClientService, ClientUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
