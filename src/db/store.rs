//! Storage port shared by the HTTP handlers, the CLI and the core logic.
//!
//! Two adapters implement it: [`SqliteStore`] for the file-backed database
//! and [`PgStore`] when `DATABASE_URL` is set. Both enforce
//! `UNIQUE(chave, data_almoco)` and write with `INSERT … ON CONFLICT … DO UPDATE`.

use crate::config::Config;
use crate::db::pg_store::PgStore;
use crate::db::sqlite_store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Answer, LunchResponse, NewResponse, StudentRecord, Turma};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => f.write_str("sqlite"),
            Backend::Postgres => f.write_str("postgres"),
        }
    }
}

/// Row counts and response date range, for `db --info` and migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub alunos: i64,
    pub respostas: i64,
    pub log: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

/// One row of the internal `log` table.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub trait Store: Send + Sync {
    fn backend(&self) -> Backend;

    /// Human readable location (file path or redacted URL).
    fn location(&self) -> String;

    /// Insert or overwrite each row for its (chave, data_almoco), all in one transaction.
    fn upsert_responses(&self, rows: &[NewResponse]) -> AppResult<()>;

    fn response_for(&self, chave: &str, date: NaiveDate) -> AppResult<Option<LunchResponse>>;

    /// Responses with `from <= data_almoco <= to`, ordered by date, class, name.
    fn responses_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<LunchResponse>>;

    /// Every response, ordered by date, class, name.
    fn all_responses(&self) -> AppResult<Vec<LunchResponse>>;

    fn find_student(&self, matricula: &str) -> AppResult<Option<StudentRecord>>;

    /// Roster of one class, ordered by name.
    fn students_in(&self, turma: Turma) -> AppResult<Vec<StudentRecord>>;

    /// Whole roster, ordered by class, name.
    fn all_students(&self) -> AppResult<Vec<StudentRecord>>;

    /// Upsert by matricula in one transaction; returns the number of rows written.
    fn upsert_students(&self, rows: &[StudentRecord]) -> AppResult<usize>;

    /// Append a row to the internal audit log.
    fn log(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;

    fn recent_log(&self, limit: i64) -> AppResult<Vec<LogEntry>>;

    fn counts(&self) -> AppResult<StoreCounts>;
}

/// Open the backend selected by the configuration: PostgreSQL when a
/// `DATABASE_URL` is configured, the SQLite file otherwise.
pub fn open_store(cfg: &Config) -> AppResult<Arc<dyn Store>> {
    match cfg.database_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Ok(Arc::new(PgStore::connect(url)?)),
        _ => Ok(Arc::new(SqliteStore::open(&cfg.database_file())?)),
    }
}

// ---------------------------
// Shared row decoding
// ---------------------------

/// Raw text columns of a `respostas` row as both backends return them.
pub(crate) struct RawResponse {
    pub id: i64,
    pub chave: String,
    pub nome: String,
    pub matricula: Option<String>,
    pub turma: String,
    pub data_almoco: String,
    pub intencao: String,
    pub criado_em: String,
}

impl RawResponse {
    pub(crate) fn into_model(self) -> AppResult<LunchResponse> {
        let turma =
            Turma::from_db_str(&self.turma).ok_or_else(|| AppError::InvalidTurma(self.turma.clone()))?;
        let intencao = Answer::from_db_str(&self.intencao)
            .ok_or_else(|| AppError::InvalidAnswer(self.intencao.clone()))?;
        let data_almoco = parse_db_date(&self.data_almoco)?;

        Ok(LunchResponse {
            id: self.id,
            chave: self.chave,
            nome: self.nome,
            matricula: self.matricula,
            turma,
            data_almoco,
            intencao,
            criado_em: self.criado_em,
        })
    }
}

pub(crate) fn student_from_parts(
    matricula: String,
    nome: String,
    turma: String,
    atualizado_em: String,
) -> AppResult<StudentRecord> {
    let turma = Turma::from_db_str(&turma).ok_or(AppError::InvalidTurma(turma))?;
    Ok(StudentRecord {
        matricula,
        nome,
        turma,
        atualizado_em,
    })
}

/// Dates come back as `YYYY-MM-DD`; legacy rows may carry a time suffix.
pub(crate) fn parse_db_date(s: &str) -> AppResult<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Decode rows, skipping those whose class is no longer offered
/// (e.g. rows written for a retired `SERVIDORES` group).
pub(crate) fn collect_models(raw: Vec<RawResponse>) -> AppResult<Vec<LunchResponse>> {
    let mut out = Vec::with_capacity(raw.len());
    for r in raw {
        if Turma::from_db_str(&r.turma).is_none() {
            warn!(id = r.id, turma = %r.turma, "skipping response with unknown class");
            continue;
        }
        out.push(r.into_model()?);
    }
    Ok(out)
}
