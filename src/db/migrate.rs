//! Schema bootstrap and upgrades for both backends.
//!
//! Databases written by the first version of the form have a `respostas`
//! table keyed by `(matricula, data_almoco)` without a `chave` column. The
//! upgrade copies them into the current layout, taking a zip backup of the
//! SQLite file first.

use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const MIGRATION_CHAVE: &str = "20260301_0001_respostas_chave";

const SQLITE_LOG_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS log (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        date      TEXT NOT NULL,
        operation TEXT NOT NULL,
        target    TEXT DEFAULT '',
        message   TEXT NOT NULL
    );
"#;

const SQLITE_ALUNOS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS alunos (
        matricula     TEXT PRIMARY KEY,
        nome          TEXT NOT NULL,
        turma         TEXT NOT NULL,
        atualizado_em TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_alunos_turma ON alunos(turma, nome);
"#;

const SQLITE_RESPOSTAS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS respostas (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        chave       TEXT NOT NULL,
        nome        TEXT NOT NULL,
        matricula   TEXT,
        turma       TEXT NOT NULL,
        data_almoco TEXT NOT NULL,
        intencao    TEXT NOT NULL CHECK (intencao IN ('SIM', 'NAO')),
        criado_em   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(chave, data_almoco)
    );
"#;

const SQLITE_RESPOSTAS_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_respostas_data_turma ON respostas(data_almoco, turma);
"#;

const PG_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS log (
        id        BIGSERIAL PRIMARY KEY,
        date      TEXT NOT NULL,
        operation TEXT NOT NULL,
        target    TEXT DEFAULT '',
        message   TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS alunos (
        matricula     TEXT PRIMARY KEY,
        nome          TEXT NOT NULL,
        turma         TEXT NOT NULL,
        atualizado_em TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS respostas (
        id          BIGSERIAL PRIMARY KEY,
        chave       TEXT NOT NULL,
        nome        TEXT NOT NULL,
        matricula   TEXT,
        turma       TEXT NOT NULL,
        data_almoco DATE NOT NULL,
        intencao    TEXT NOT NULL CHECK (intencao IN ('SIM', 'NAO')),
        criado_em   TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(chave, data_almoco)
    );
"#;

const PG_UPGRADE_CHAVE: &str = r#"
    ALTER TABLE respostas ADD COLUMN IF NOT EXISTS chave TEXT;
    UPDATE respostas SET chave = matricula WHERE chave IS NULL;
    ALTER TABLE respostas ALTER COLUMN chave SET NOT NULL;
    ALTER TABLE respostas ALTER COLUMN matricula DROP NOT NULL;
    UPDATE respostas SET matricula = NULL WHERE matricula LIKE 'AUTO::%';
    CREATE UNIQUE INDEX IF NOT EXISTS respostas_chave_data_key ON respostas(chave, data_almoco);
"#;

const PG_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_respostas_data_turma ON respostas(data_almoco, turma);
    CREATE INDEX IF NOT EXISTS idx_alunos_turma ON alunos(turma, nome);
"#;

// ---------------------------
// SQLite
// ---------------------------

fn sqlite_table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn sqlite_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn sqlite_migration_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_sqlite_migration(conn: &Connection, version: &str, message: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        [Local::now().to_rfc3339().as_str(), version, message],
    )?;
    Ok(())
}

/// Rebuild a legacy `respostas` table around the `chave` identity column.
fn migrate_respostas_add_chave(conn: &Connection) -> AppResult<()> {
    warn!("legacy respostas table detected, adding 'chave' column");

    conn.execute_batch(&format!(
        r#"
        BEGIN;

        ALTER TABLE respostas RENAME TO respostas_old;

        {SQLITE_RESPOSTAS_TABLE}

        INSERT INTO respostas (id, chave, nome, matricula, turma, data_almoco, intencao, criado_em)
        SELECT id,
               matricula,
               nome,
               CASE WHEN matricula LIKE 'AUTO::%' THEN NULL ELSE matricula END,
               turma,
               data_almoco,
               intencao,
               criado_em
        FROM respostas_old;

        DROP TABLE respostas_old;

        COMMIT;
        "#
    ))
    .map_err(|e| AppError::Migration(format!("failed to add 'chave' to respostas: {e}")))?;

    mark_sqlite_migration(conn, MIGRATION_CHAVE, "Rebuilt respostas keyed by chave")?;
    info!(version = MIGRATION_CHAVE, "migration applied");
    Ok(())
}

/// Zip the database file next to itself before a destructive upgrade.
fn backup_before_migration(db_path: &Path) -> AppResult<()> {
    let backup_name = format!(
        "{}-backup_db_pre_chave.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let backup_path = db_path
        .parent()
        .map(|p| p.join(&backup_name))
        .unwrap_or_else(|| Path::new(&backup_name).to_path_buf());

    let file = File::create(&backup_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("almoco.db", options)?;
    zip.write_all(&fs::read(db_path)?)?;
    zip.finish()?;

    info!(path = %backup_path.display(), "pre-migration backup created");
    Ok(())
}

/// Public entry point: create missing tables and run pending upgrades.
///
/// Called every time a [`crate::db::sqlite_store::SqliteStore`] is opened.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(SQLITE_LOG_TABLE)?;
    conn.execute_batch(SQLITE_ALUNOS_TABLE)?;

    let legacy = sqlite_table_exists(conn, "respostas")?
        && !sqlite_has_column(conn, "respostas", "chave")?;

    if legacy && !sqlite_migration_applied(conn, MIGRATION_CHAVE)? {
        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warn!("could not determine database path, pre-migration backup skipped");
        } else {
            backup_before_migration(Path::new(&db_path))?;
        }

        migrate_respostas_add_chave(conn)?;
    } else {
        conn.execute_batch(SQLITE_RESPOSTAS_TABLE)?;
    }

    conn.execute_batch(SQLITE_RESPOSTAS_INDEXES)?;
    Ok(())
}

// ---------------------------
// PostgreSQL
// ---------------------------

fn pg_has_column(client: &mut postgres::Client, table: &str, column: &str) -> AppResult<bool> {
    let row = client.query_opt(
        "SELECT 1 FROM information_schema.columns
         WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2",
        &[&table, &column],
    )?;
    Ok(row.is_some())
}

/// Create the schema on PostgreSQL, upgrading tables written by the first version.
pub fn ensure_pg_schema(client: &mut postgres::Client) -> AppResult<()> {
    client.batch_execute(PG_SCHEMA)?;

    if !pg_has_column(client, "respostas", "chave")? {
        warn!("legacy respostas table detected on PostgreSQL, adding 'chave' column");
        client
            .batch_execute(PG_UPGRADE_CHAVE)
            .map_err(|e| AppError::Migration(format!("failed to add 'chave' to respostas: {e}")))?;
        client.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES ($1, 'migration_applied', $2, 'Added chave to respostas')",
            &[&Local::now().to_rfc3339(), &MIGRATION_CHAVE],
        )?;
        info!(version = MIGRATION_CHAVE, "migration applied");
    }

    client.batch_execute(PG_INDEXES)?;
    Ok(())
}
