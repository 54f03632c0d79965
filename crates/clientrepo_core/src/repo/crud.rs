//! Generic CRUD contract and shared repository errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::client::{ClientId, ClientValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    /// Delete-by-id or update addressed a row that does not exist.
    NotFound(ClientId),
    /// A single-result lookup matched more than one row.
    NonUniqueResult {
        cpf: String,
        count: usize,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub(crate) fn uninitialized(actual_version: u32) -> Self {
        Self::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::NonUniqueResult { count, .. } => {
                write!(f, "expected at most one client for cpf, found {count}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Entity-agnostic CRUD operations shared by every repository.
pub trait CrudRepository {
    type Entity;
    type Id;

    /// Returns every row; empty when the table is empty.
    fn find_all(&self) -> RepoResult<Vec<Self::Entity>>;
    fn find_by_id(&self, id: Self::Id) -> RepoResult<Option<Self::Entity>>;
    /// Inserts when the entity has no id, upserts on its id otherwise.
    ///
    /// Returns the persisted entity, carrying the store-generated id on insert.
    fn save(&self, entity: &Self::Entity) -> RepoResult<Self::Entity>;
    /// Fails with `RepoError::NotFound` when no row has this id.
    fn delete_by_id(&self, id: Self::Id) -> RepoResult<()>;
    /// Removes the row behind `entity`; a missing row is a no-op.
    fn delete(&self, entity: &Self::Entity) -> RepoResult<()>;
    /// Removes every row and returns how many were removed.
    fn delete_all(&self) -> RepoResult<usize>;
    fn count(&self) -> RepoResult<u64>;
    fn exists_by_id(&self, id: Self::Id) -> RepoResult<bool>;
}
