use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::sqlite_store::SqliteStore;
use crate::db::{open_store, stats};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        //
        // 1) INFO
        //
        if *show_info {
            let store = open_store(cfg)?;
            stats::print_db_info(store.as_ref())?;
        }

        if !*check && !*vacuum {
            return Ok(());
        }

        if cfg.uses_postgres() {
            warning("--check and --vacuum only apply to the SQLite backend.");
            return Ok(());
        }

        let store = SqliteStore::open(&cfg.database_file())?;

        //
        // 2) CHECK
        //
        if *check {
            info("Running integrity check…");

            let integrity: String = store.with_conn(|conn| {
                Ok(conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?)
            })?;

            if integrity != "ok" {
                return Err(AppError::Integrity(integrity));
            }
            success("Integrity check passed.");
        }

        //
        // 3) VACUUM
        //
        if *vacuum {
            info("Running VACUUM…");
            store.with_conn(|conn| Ok(conn.execute_batch("VACUUM;")?))?;
            success("Vacuum completed.");
        }
    }

    Ok(())
}
