//! Domain model for client records.
//!
//! # Responsibility
//! - Define the canonical `Client` shape shared by repository and service.
//!
//! # Invariants
//! - A persisted client is identified by a store-generated `ClientId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod client;
