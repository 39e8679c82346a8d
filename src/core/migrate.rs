//! One-shot copy of the SQLite database into PostgreSQL.

use crate::config::Config;
use crate::db::Store;
use crate::db::pg_store::PgStore;
use crate::db::sqlite_store::SqliteStore;
use crate::db::store::StoreCounts;
use crate::errors::{AppError, AppResult};
use crate::models::NewResponse;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub source: StoreCounts,
    pub target: StoreCounts,
    pub alunos_copiados: usize,
    pub respostas_copiadas: usize,
}

pub struct MigrateLogic;

impl MigrateLogic {
    /// Copy students then responses; both upserts keep the target's
    /// conflict keys, so running it twice is harmless.
    pub fn sqlite_to_postgres(cfg: &Config) -> AppResult<MigrationReport> {
        let url = cfg
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL is required to migrate".into()))?;

        let sqlite_path = cfg.database_file();
        if !sqlite_path.exists() {
            return Err(AppError::Migration(format!(
                "SQLite database not found: {}",
                sqlite_path.display()
            )));
        }

        let source = SqliteStore::open(&sqlite_path)?;
        let target = PgStore::connect(url)?;

        Self::copy(&source, &target)
    }

    /// Copy everything from `source` into `target`.
    pub fn copy(source: &dyn Store, target: &dyn Store) -> AppResult<MigrationReport> {
        let students = source.all_students()?;
        let responses: Vec<NewResponse> = source
            .all_responses()?
            .iter()
            .map(NewResponse::from)
            .collect();

        target.upsert_students(&students)?;
        target.upsert_responses(&responses)?;

        let message = format!(
            "{} students, {} responses copied from {}",
            students.len(),
            responses.len(),
            source.location()
        );
        target.log("migrate_to_postgres", &target.location(), &message)?;
        info!(
            alunos = students.len(),
            respostas = responses.len(),
            "migration to {} completed",
            target.backend()
        );

        Ok(MigrationReport {
            source: source.counts()?,
            target: target.counts()?,
            alunos_copiados: students.len(),
            respostas_copiadas: responses.len(),
        })
    }
}
