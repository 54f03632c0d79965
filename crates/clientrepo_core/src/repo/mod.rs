//! Repository layer contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define the generic CRUD contract and the client-specific derived queries.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Write paths call `Client::validate()` before any SQL mutation.
//! - Every query states its predicate explicitly as parameterized SQL.
//! - Repository APIs return semantic errors (`NotFound`, `NonUniqueResult`)
//!   next to store transport errors.

pub mod client_repo;
pub mod crud;
