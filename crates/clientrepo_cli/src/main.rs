//! CLI smoke entry point.
//!
//! Usage: `clientrepo_cli [DB_PATH] [LOG_DIR]`
//!
//! Opens the client store at `DB_PATH` (in memory when omitted), starts file
//! logging under the absolute `LOG_DIR` when given, and prints the crate
//! version and current client count.

use clientrepo_core::db::{open_db, open_db_in_memory};
use clientrepo_core::{default_log_level, init_logging, CrudRepository, SqliteClientRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    let log_dir = args.next();

    match run(db_path.as_deref(), log_dir.as_deref()) {
        Ok(count) => {
            println!("clientrepo_core version={}", clientrepo_core::core_version());
            println!("clients={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("clientrepo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<&str>, log_dir: Option<&str>) -> Result<u64, Box<dyn std::error::Error>> {
    if let Some(log_dir) = log_dir {
        init_logging(default_log_level(), log_dir)?;
    }

    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteClientRepository::try_new(&conn)?;
    Ok(repo.count()?)
}
