//! Client use-case service.
//!
//! # Responsibility
//! - Provide registration and profile-update entry points.
//! - Delegate every persistence concern to a `ClientRepository`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::client::{Client, ClientId};
use crate::repo::client_repo::ClientRepository;
use crate::repo::crud::{RepoError, RepoResult};
use log::info;

/// Partial update for an existing client. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub income: Option<f64>,
    /// Unix epoch milliseconds.
    pub birth_date: Option<i64>,
}

impl ClientUpdate {
    fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(income) = self.income {
            client.income = income;
        }
        if let Some(birth_date) = self.birth_date {
            client.birth_date = birth_date;
        }
    }
}

/// Use-case service wrapper for client operations.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new client and returns it with its store-generated id.
    pub fn register_client(
        &self,
        name: impl Into<String>,
        cpf: impl Into<String>,
        income: f64,
        birth_date: i64,
    ) -> RepoResult<Client> {
        let saved = self
            .repo
            .save(&Client::new(name, cpf, income, birth_date))?;
        if let Some(id) = saved.id {
            info!("event=client_register module=service status=ok id={id}");
        }
        Ok(saved)
    }

    /// Applies `update` to the stored client `id` and saves it.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no client has this id.
    /// - `RepoError::Validation` when the update breaks a field invariant.
    pub fn update_client(&self, id: ClientId, update: &ClientUpdate) -> RepoResult<Client> {
        let mut client = self.repo.find_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        update.apply_to(&mut client);
        self.repo.save(&client)
    }

    pub fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.repo.find_by_id(id)
    }

    pub fn list_clients(&self) -> RepoResult<Vec<Client>> {
        self.repo.find_all()
    }

    pub fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Client>> {
        self.repo.find_by_cpf(cpf)
    }

    pub fn search_by_name(&self, fragment: &str) -> RepoResult<Vec<Client>> {
        self.repo.find_by_lower_name_like(fragment)
    }

    pub fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_between(low, high)
    }

    /// Removes one client by id; a missing id is reported as `NotFound`.
    pub fn remove_client(&self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_by_id(id)?;
        info!("event=client_remove module=service status=ok id={id}");
        Ok(())
    }

    /// Removes every client sharing `cpf` and returns how many were removed.
    pub fn remove_by_cpf(&self, cpf: &str) -> RepoResult<usize> {
        let removed = self.repo.delete_by_cpf(cpf)?;
        info!("event=client_remove module=service status=ok predicate=cpf removed={removed}");
        Ok(removed)
    }

    /// Removes the row behind `client`; an absent row is a no-op.
    pub fn remove(&self, client: &Client) -> RepoResult<()> {
        self.repo.delete(client)?;
        if let Some(id) = client.id {
            info!("event=client_remove module=service status=ok predicate=entity id={id}");
        }
        Ok(())
    }

    /// Removes clients earning strictly more than `threshold`.
    pub fn remove_by_income_greater_than(&self, threshold: f64) -> RepoResult<usize> {
        let removed = self.repo.delete_by_income_greater_than(threshold)?;
        info!(
            "event=client_remove module=service status=ok predicate=income_gt removed={removed}"
        );
        Ok(removed)
    }

    pub fn remove_all(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all()?;
        info!("event=client_remove module=service status=ok predicate=all removed={removed}");
        Ok(removed)
    }

    pub fn client_exists(&self, id: ClientId) -> RepoResult<bool> {
        self.repo.exists_by_id(id)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Vec<Client>> {
        self.repo.find_by_name(name)
    }

    pub fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_greater_than(threshold)
    }

    pub fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_less_than(threshold)
    }

    /// Both bounds are inclusive epoch milliseconds.
    pub fn find_by_birth_date_between(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<Client>> {
        self.repo.find_by_birth_date_between(start_ms, end_ms)
    }

    pub fn count_clients(&self) -> RepoResult<u64> {
        self.repo.count()
    }
}
