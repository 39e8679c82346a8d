use crate::config::Config;
use crate::db::open_store;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs;

/// Handle the `init` command
///
/// This initializes:
///  - the data directory (if missing)
///  - `<data_dir>/almoco.yml` with the effective configuration
///  - the database schema (SQLite file or PostgreSQL)
pub fn handle(cfg: &Config) -> AppResult<()> {
    fs::create_dir_all(&cfg.data_dir)?;
    fs::create_dir_all(cfg.backup_dir())?;

    let config_path = cfg.config_file();
    if cfg.write_if_missing(&config_path)? {
        success(format!("Config file : {}", config_path.display()));
    } else {
        warning(format!("Config file already present: {}", config_path.display()));
    }

    let store = open_store(cfg)?;
    success(format!("Database    : {} ({})", store.location(), store.backend()));

    // non-blocking internal log
    if let Err(e) = store.log(
        "init",
        "database",
        &format!("Database initialized at {}", store.location()),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 almoco initialization completed!");
    Ok(())
}
