mod common;

use clientrepo_core::db::migrations::latest_version;
use clientrepo_core::db::open_db_in_memory;
use clientrepo_core::{
    Client, ClientRepository, CrudRepository, RepoError, SqliteClientRepository,
};
use common::{ids, seeded_conn, SEEDED_CLIENTS, SEEDED_CPF};
use rusqlite::Connection;

#[test]
fn delete_by_id_removes_existing_client() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.delete_by_id(1).unwrap();

    assert!(repo.find_by_id(1).unwrap().is_none());
    assert_eq!(repo.count().unwrap(), (SEEDED_CLIENTS - 1) as u64);
}

#[test]
fn delete_by_id_reports_missing_client() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let err = repo.delete_by_id(10_000).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(10_000)));
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS as u64);
}

#[test]
fn delete_all_empties_the_table() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(repo.delete_all().unwrap(), SEEDED_CLIENTS);
    assert!(repo.find_all().unwrap().is_empty());

    assert_eq!(repo.delete_all().unwrap(), 0);
}

#[test]
fn delete_entity_removes_loaded_client() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = repo.find_by_id(4).unwrap().unwrap();
    assert_eq!(client.name, "Carolina Maria de Jesus");

    repo.delete(&client).unwrap();
    assert!(repo.find_by_id(4).unwrap().is_none());
}

#[test]
fn delete_entity_ignores_absent_and_transient_clients() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = repo.find_by_id(4).unwrap().unwrap();
    repo.delete(&client).unwrap();
    repo.delete(&client).unwrap();

    let transient = Client::new("Nobody", "00000000000", 0.0, 0);
    repo.delete(&transient).unwrap();

    assert_eq!(repo.count().unwrap(), (SEEDED_CLIENTS - 1) as u64);
}

#[test]
fn delete_by_cpf_removes_matching_client() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_cpf(SEEDED_CPF).unwrap().is_some());
    assert_eq!(repo.delete_by_cpf(SEEDED_CPF).unwrap(), 1);

    assert!(repo.find_by_cpf(SEEDED_CPF).unwrap().is_none());
}

#[test]
fn delete_by_cpf_without_match_is_a_no_op() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(repo.delete_by_cpf("99999999999").unwrap(), 0);
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS as u64);
}

#[test]
fn delete_by_cpf_removes_every_duplicate() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.save(&Client::new("Twin", SEEDED_CPF, 900.0, 0)).unwrap();

    assert_eq!(repo.delete_by_cpf(SEEDED_CPF).unwrap(), 2);
    assert!(repo.find_by_cpf(SEEDED_CPF).unwrap().is_none());
}

#[test]
fn find_by_cpf_rejects_shared_cpf() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.save(&Client::new("Twin", SEEDED_CPF, 900.0, 0)).unwrap();

    let err = repo.find_by_cpf(SEEDED_CPF).unwrap_err();
    assert!(matches!(err, RepoError::NonUniqueResult { count: 2, .. }));
}

#[test]
fn find_by_cpf_returns_matching_client() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = repo.find_by_cpf(SEEDED_CPF).unwrap().unwrap();
    assert_eq!(client.id, Some(2));
    assert_eq!(client.name, "Lázaro Ramos");
}

#[test]
fn delete_by_income_greater_than_leaves_only_lower_incomes() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(repo.delete_by_income_greater_than(2000.0).unwrap(), 8);

    assert!(repo.find_by_income_greater_than(2000.0).unwrap().is_empty());
    assert_eq!(ids(&repo.find_all().unwrap()), vec![1, 9, 11]);
}

#[test]
fn income_comparisons_are_strict() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let above = repo.find_by_income_greater_than(2000.0).unwrap();
    assert_eq!(ids(&above), vec![2, 3, 4, 5, 6, 7, 8, 10]);

    let below = repo.find_by_income_less_than(2000.0).unwrap();
    assert_eq!(ids(&below), vec![1, 9]);

    assert!(repo.find_by_income_greater_than(10_000.0).unwrap().is_empty());
}

#[test]
fn nan_income_threshold_matches_nothing() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_income_greater_than(f64::NAN).unwrap().is_empty());
    assert_eq!(repo.delete_by_income_greater_than(f64::NAN).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS as u64);
}

#[test]
fn income_between_includes_both_bounds() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_between(2500.0, 4500.0).unwrap();
    assert_eq!(ids(&result), vec![2, 3, 5, 6, 10]);

    assert!(repo.find_by_income_between(4500.0, 2500.0).unwrap().is_empty());
}

#[test]
fn find_by_lower_name_like_matches_existing_name() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_lower_name_like("Clarice").unwrap();
    assert_eq!(ids(&result), vec![3, 11]);
}

#[test]
fn find_by_lower_name_like_ignores_case() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(ids(&repo.find_by_lower_name_like("CLARICE").unwrap()), vec![3, 11]);
    assert_eq!(ids(&repo.find_by_lower_name_like("lispector").unwrap()), vec![3]);
}

#[test]
fn find_by_lower_name_like_folds_accented_letters() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(ids(&repo.find_by_lower_name_like("LÁZARO").unwrap()), vec![2]);
    assert_eq!(ids(&repo.find_by_lower_name_like("lázaro").unwrap()), vec![2]);
    assert_eq!(ids(&repo.find_by_lower_name_like("conceição").unwrap()), vec![1]);
    assert_eq!(ids(&repo.find_by_lower_name_like("CONCEIÇÃO").unwrap()), vec![1]);
}

#[test]
fn find_by_lower_name_like_without_match_is_empty() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_lower_name_like("Machado").unwrap().is_empty());
}

#[test]
fn find_by_lower_name_like_with_empty_text_returns_everyone() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(repo.find_by_lower_name_like("").unwrap().len(), SEEDED_CLIENTS);
}

#[test]
fn find_by_lower_name_like_treats_wildcards_literally() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_lower_name_like("%").unwrap().is_empty());
    assert!(repo.find_by_lower_name_like("_").unwrap().is_empty());

    let saved = repo
        .save(&Client::new("100% Legit_Name", "12312312312", 10.0, 0))
        .unwrap();
    assert_eq!(ids(&repo.find_by_lower_name_like("0% l").unwrap()), vec![saved.id.unwrap()]);
    assert_eq!(ids(&repo.find_by_lower_name_like("t_n").unwrap()), vec![saved.id.unwrap()]);
}

#[test]
fn find_by_name_requires_exact_match() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert_eq!(ids(&repo.find_by_name("Gilberto Gil").unwrap()), vec![5]);
    assert!(repo.find_by_name("Gilberto").unwrap().is_empty());
}

#[test]
fn find_by_birth_date_between_includes_both_bounds() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    // 1970-01-01 .. 2001-03-04
    let result = repo.find_by_birth_date_between(0, 983_664_000_000).unwrap();
    assert_eq!(ids(&result), vec![1, 6, 9, 10, 11]);
}

#[test]
fn save_without_id_assigns_generated_id() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let saved = repo
        .save(&Client::new("Machado de Assis", "10020030040", 3100.5, -4_000_000_000_000))
        .unwrap();

    assert_eq!(saved.id, Some(12));
    let loaded = repo.find_by_id(12).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn save_with_existing_id_updates_the_row() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let mut client = repo.find_by_id(6).unwrap().unwrap();
    client.name = "Djamila Taís Ribeiro".to_string();
    client.income = 5200.0;
    client.birth_date = 368_236_800_000;
    repo.save(&client).unwrap();

    let loaded = repo.find_by_id(6).unwrap().unwrap();
    assert_eq!(loaded, client);
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS as u64);
}

#[test]
fn save_with_unknown_id_inserts_under_that_id() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = Client::with_id(500, "Lima Barreto", "10987654321", 1200.0, -2_800_000_000_000);
    let saved = repo.save(&client).unwrap();
    assert_eq!(saved, client);

    let loaded = repo.find_by_id(500).unwrap().unwrap();
    assert_eq!(loaded.name, client.name);
    assert_eq!(loaded.cpf, client.cpf);
    assert_eq!(loaded.income, client.income);
    assert_eq!(loaded.birth_date, client.birth_date);
}

#[test]
fn save_rejects_non_finite_income() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let err = repo
        .save(&Client::new("Broken", "11111111111", f64::NAN, 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS as u64);
}

#[test]
fn find_all_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_all().unwrap().is_empty());
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn find_all_is_ordered_by_id() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let expected: Vec<i64> = (1..=SEEDED_CLIENTS as i64).collect();
    assert_eq!(ids(&repo.find_all().unwrap()), expected);
}

#[test]
fn exists_by_id_tracks_deletes() {
    let conn = seeded_conn();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.exists_by_id(3).unwrap());
    repo.delete_by_id(3).unwrap();
    assert!(!repo.exists_by_id(3).unwrap());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteClientRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_clients_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteClientRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("clients"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            cpf TEXT NOT NULL,
            income REAL NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteClientRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "clients",
            column: "birth_date"
        })
    ));
}
