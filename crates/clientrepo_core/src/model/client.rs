//! Client domain model.
//!
//! # Responsibility
//! - Define the record persisted in the `clients` table.
//! - Validate field values before they reach SQL.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, and never changes after.
//! - `income` is always a finite number.
//! - `cpf` is an opaque 11-digit string; its format is not checked here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated primary key of a client row.
pub type ClientId = i64;

/// Validation failures for client writes.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientValidationError {
    /// `income` is `NaN` or infinite and cannot be compared by the store.
    NonFiniteIncome(f64),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteIncome(value) => {
                write!(f, "client income must be a finite number, got {value}")
            }
        }
    }
}

impl Error for ClientValidationError {}

/// Detached copy of one `clients` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// `None` for records that were never saved.
    pub id: Option<ClientId>,
    pub name: String,
    /// National taxpayer id. Not unique at the schema level.
    pub cpf: String,
    pub income: f64,
    /// Unix epoch milliseconds.
    pub birth_date: i64,
}

impl Client {
    /// Creates a transient client without an identifier.
    pub fn new(
        name: impl Into<String>,
        cpf: impl Into<String>,
        income: f64,
        birth_date: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            cpf: cpf.into(),
            income,
            birth_date,
        }
    }

    /// Creates a client bound to a caller-provided identifier.
    ///
    /// Saving it performs an upsert on `id`.
    pub fn with_id(
        id: ClientId,
        name: impl Into<String>,
        cpf: impl Into<String>,
        income: f64,
        birth_date: i64,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, cpf, income, birth_date)
        }
    }

    /// Returns whether this record has been assigned a store identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks field invariants required before persistence.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if !self.income.is_finite() {
            return Err(ClientValidationError::NonFiniteIncome(self.income));
        }
        Ok(())
    }
}
