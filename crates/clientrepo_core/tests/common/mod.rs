#![allow(dead_code)]

use clientrepo_core::db::open_db_in_memory;
use clientrepo_core::Client;
use rusqlite::Connection;

pub const SEEDED_CLIENTS: usize = 11;
pub const SEEDED_CPF: &str = "10619244881";

/// In-memory store loaded with the shared client fixture.
pub fn seeded_conn() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(include_str!("../fixtures/import.sql"))
        .unwrap();
    conn
}

pub fn ids(clients: &[Client]) -> Vec<i64> {
    clients.iter().map(|client| client.id.unwrap()).collect()
}
