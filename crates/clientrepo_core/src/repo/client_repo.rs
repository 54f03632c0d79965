//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus CPF, income and name lookups over the `clients` table.
//! - Map rows to detached `Client` values and back.
//!
//! # Invariants
//! - Write paths call `Client::validate()` before SQL mutations.
//! - Read paths reject persisted rows that fail validation.
//! - List results are ordered by `id` ascending.
//! - Predicate deletes never fail on zero matches; `delete_by_id` does.

use crate::db::migrations::{latest_version, schema_version};
use crate::model::client::{Client, ClientId};
use crate::repo::crud::{CrudRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

const CLIENTS_TABLE: &str = "clients";
/// SQL scalar applying Rust's full Unicode lowercase mapping.
const UNICODE_LOWER_FN: &str = "unicode_lower";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "cpf", "income", "birth_date"];

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    cpf,
    income,
    birth_date
FROM clients";

/// Client-specific derived queries on top of the generic CRUD contract.
pub trait ClientRepository: CrudRepository<Entity = Client, Id = ClientId> {
    /// Deletes every client with this exact CPF. Returns the removed count.
    fn delete_by_cpf(&self, cpf: &str) -> RepoResult<usize>;
    /// Fails with `RepoError::NonUniqueResult` when the CPF is shared.
    fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Client>>;
    /// Deletes clients with `income > threshold`. Returns the removed count.
    fn delete_by_income_greater_than(&self, threshold: f64) -> RepoResult<usize>;
    fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>>;
    fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>>;
    /// Both bounds are inclusive.
    fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>>;
    /// Case-insensitive substring match on `name`; `""` matches every row.
    fn find_by_lower_name_like(&self, fragment: &str) -> RepoResult<Vec<Client>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Client>>;
    /// Both bounds are inclusive epoch milliseconds.
    fn find_by_birth_date_between(&self, start_ms: i64, end_ms: i64)
        -> RepoResult<Vec<Client>>;
}

/// SQLite-backed client repository borrowing an explicitly opened store.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Wraps a connection after checking that the client schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this repository queries.
    ///
    /// # Side effects
    /// - Registers the `unicode_lower` SQL function on `conn`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = schema_version(conn)?;
        if actual_version < latest_version() {
            return Err(RepoError::uninitialized(actual_version));
        }

        ensure_clients_schema(conn)?;
        register_unicode_lower(conn)?;
        Ok(Self { conn })
    }

    fn query_clients<P: Params>(&self, predicate: &str, params: P) -> RepoResult<Vec<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} {predicate} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params)?;
        let mut clients = Vec::new();

        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }

        Ok(clients)
    }

    fn delete_where<P: Params>(
        &self,
        predicate_name: &str,
        predicate: &str,
        params: P,
    ) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute(&format!("DELETE FROM clients {predicate};"), params)?;
        debug!(
            "event=client_delete module=repo status=ok predicate={predicate_name} removed={removed}"
        );
        Ok(removed)
    }
}

impl CrudRepository for SqliteClientRepository<'_> {
    type Entity = Client;
    type Id = ClientId;

    fn find_all(&self) -> RepoResult<Vec<Client>> {
        self.query_clients("", [])
    }

    fn find_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        Ok(self
            .query_clients("WHERE id = ?1", [id])?
            .into_iter()
            .next())
    }

    fn save(&self, client: &Client) -> RepoResult<Client> {
        client.validate()?;

        let id = match client.id {
            None => {
                self.conn.execute(
                    "INSERT INTO clients (name, cpf, income, birth_date)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        client.name.as_str(),
                        client.cpf.as_str(),
                        client.income,
                        client.birth_date,
                    ],
                )?;
                let id = self.conn.last_insert_rowid();
                debug!("event=client_save module=repo status=ok mode=insert id={id}");
                id
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO clients (id, name, cpf, income, birth_date)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        cpf = excluded.cpf,
                        income = excluded.income,
                        birth_date = excluded.birth_date;",
                    params![
                        id,
                        client.name.as_str(),
                        client.cpf.as_str(),
                        client.income,
                        client.birth_date,
                    ],
                )?;
                debug!("event=client_save module=repo status=ok mode=upsert id={id}");
                id
            }
        };

        Ok(Client {
            id: Some(id),
            ..client.clone()
        })
    }

    fn delete_by_id(&self, id: ClientId) -> RepoResult<()> {
        let removed = self.delete_where("id", "WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, client: &Client) -> RepoResult<()> {
        if let Some(id) = client.id {
            self.delete_where("id", "WHERE id = ?1", [id])?;
        }
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<usize> {
        self.delete_where("all", "", [])
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM clients;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn exists_by_id(&self, id: ClientId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM clients WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn delete_by_cpf(&self, cpf: &str) -> RepoResult<usize> {
        self.delete_where("cpf", "WHERE cpf = ?1", [cpf])
    }

    fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Client>> {
        let mut matches = self.query_clients("WHERE cpf = ?1", [cpf])?;
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            count => Err(RepoError::NonUniqueResult {
                cpf: cpf.to_string(),
                count,
            }),
        }
    }

    fn delete_by_income_greater_than(&self, threshold: f64) -> RepoResult<usize> {
        self.delete_where("income_gt", "WHERE income > ?1", [threshold])
    }

    fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.query_clients("WHERE income > ?1", [threshold])
    }

    fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.query_clients("WHERE income < ?1", [threshold])
    }

    fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>> {
        self.query_clients("WHERE income BETWEEN ?1 AND ?2", [low, high])
    }

    fn find_by_lower_name_like(&self, fragment: &str) -> RepoResult<Vec<Client>> {
        // Built-in LIKE folds ASCII only; lowercase name and fragment with Unicode rules.
        self.query_clients(
            &format!("WHERE {UNICODE_LOWER_FN}(name) LIKE ?1 ESCAPE '\\'"),
            [contains_pattern(&fragment.to_lowercase())],
        )
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Client>> {
        self.query_clients("WHERE name = ?1", [name])
    }

    fn find_by_birth_date_between(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<Client>> {
        self.query_clients("WHERE birth_date BETWEEN ?1 AND ?2", [start_ms, end_ms])
    }
}

fn ensure_clients_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [CLIENTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(CLIENTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CLIENTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !columns.iter().any(|column| column.as_str() == **required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: CLIENTS_TABLE,
            column: *missing,
        });
    }

    Ok(())
}

fn register_unicode_lower(conn: &Connection) -> RepoResult<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let client = Client {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        cpf: row.get("cpf")?,
        income: row.get("income")?,
        birth_date: row.get("birth_date")?,
    };
    client
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("clients.income: {err}")))?;
    Ok(client)
}

/// Builds a `LIKE` pattern that matches `fragment` literally anywhere.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
