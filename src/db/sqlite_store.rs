//! File-backed store on SQLite (the default backend).

use crate::db::log::{load_log, ttlog};
use crate::db::migrate::run_pending_migrations;
use crate::db::store::{
    Backend, LogEntry, RawResponse, Store, StoreCounts, collect_models, student_from_parts,
};
use crate::errors::{AppError, AppResult};
use crate::models::{LunchResponse, NewResponse, StudentRecord, Turma};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const RESPONSE_COLUMNS: &str =
    "id, chave, nome, matricula, turma, data_almoco, intencao, criado_em";

const UPSERT_RESPONSE: &str = "
    INSERT INTO respostas (chave, nome, matricula, turma, data_almoco, intencao, criado_em)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(chave, data_almoco)
    DO UPDATE SET
        nome = excluded.nome,
        matricula = excluded.matricula,
        turma = excluded.turma,
        intencao = excluded.intencao,
        criado_em = excluded.criado_em";

const UPSERT_STUDENT: &str = "
    INSERT INTO alunos (matricula, nome, turma, atualizado_em)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(matricula)
    DO UPDATE SET
        nome = excluded.nome,
        turma = excluded.turma,
        atualizado_em = excluded.atualizado_em";

/// SQLite connection guarded for use from the HTTP worker pool.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database file and run pending migrations.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> AppResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        run_pending_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("SQLite connection lock poisoned".into()))
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut guard = self.lock()?;
        func(&mut guard)
    }

    fn query_responses<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> AppResult<Vec<LunchResponse>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_raw_response)?;

        let mut raw = Vec::new();
        for r in rows {
            raw.push(r?);
        }
        collect_models(raw)
    }

    fn query_students<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> AppResult<Vec<StudentRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (matricula, nome, turma, atualizado_em) = r?;
            out.push(student_from_parts(matricula, nome, turma, atualizado_em)?);
        }
        Ok(out)
    }
}

fn map_raw_response(row: &Row) -> rusqlite::Result<RawResponse> {
    Ok(RawResponse {
        id: row.get(0)?,
        chave: row.get(1)?,
        nome: row.get(2)?,
        matricula: row.get(3)?,
        turma: row.get(4)?,
        data_almoco: row.get(5)?,
        intencao: row.get(6)?,
        criado_em: row.get(7)?,
    })
}

impl Store for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn location(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }

    fn upsert_responses(&self, rows: &[NewResponse]) -> AppResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            {
                let mut stmt = tx.prepare_cached(UPSERT_RESPONSE)?;
                for r in rows {
                    stmt.execute(params![
                        r.chave,
                        r.nome,
                        r.matricula,
                        r.turma.to_db_str(),
                        r.date_str(),
                        r.intencao.to_db_str(),
                        r.criado_em,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn response_for(&self, chave: &str, date: NaiveDate) -> AppResult<Option<LunchResponse>> {
        let sql = format!(
            "SELECT {RESPONSE_COLUMNS} FROM respostas WHERE chave = ?1 AND data_almoco = ?2"
        );
        let raw = {
            let conn = self.lock()?;
            conn.query_row(
                &sql,
                params![chave, date.format("%Y-%m-%d").to_string()],
                map_raw_response,
            )
            .optional()?
        };
        raw.map(RawResponse::into_model).transpose()
    }

    fn responses_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<LunchResponse>> {
        let sql = format!(
            "SELECT {RESPONSE_COLUMNS} FROM respostas
             WHERE data_almoco BETWEEN ?1 AND ?2
             ORDER BY data_almoco, turma, nome"
        );
        self.query_responses(
            &sql,
            params![
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
        )
    }

    fn all_responses(&self) -> AppResult<Vec<LunchResponse>> {
        let sql = format!(
            "SELECT {RESPONSE_COLUMNS} FROM respostas ORDER BY data_almoco, turma, nome"
        );
        self.query_responses(&sql, [])
    }

    fn find_student(&self, matricula: &str) -> AppResult<Option<StudentRecord>> {
        let found = self.query_students(
            "SELECT matricula, nome, turma, atualizado_em FROM alunos WHERE matricula = ?1",
            [matricula],
        )?;
        Ok(found.into_iter().next())
    }

    fn students_in(&self, turma: Turma) -> AppResult<Vec<StudentRecord>> {
        self.query_students(
            "SELECT matricula, nome, turma, atualizado_em FROM alunos
             WHERE turma = ?1
             ORDER BY nome",
            [turma.to_db_str()],
        )
    }

    fn all_students(&self) -> AppResult<Vec<StudentRecord>> {
        self.query_students(
            "SELECT matricula, nome, turma, atualizado_em FROM alunos ORDER BY turma, nome",
            [],
        )
    }

    fn upsert_students(&self, rows: &[StudentRecord]) -> AppResult<usize> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut written = 0;
            {
                let mut stmt = tx.prepare_cached(UPSERT_STUDENT)?;
                for s in rows {
                    written += stmt.execute(params![
                        s.matricula,
                        s.nome,
                        s.turma.to_db_str(),
                        s.atualizado_em,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(written)
        })
    }

    fn log(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        let conn = self.lock()?;
        ttlog(&conn, operation, target, message)
    }

    fn recent_log(&self, limit: i64) -> AppResult<Vec<LogEntry>> {
        let conn = self.lock()?;
        load_log(&conn, limit)
    }

    fn counts(&self) -> AppResult<StoreCounts> {
        let conn = self.lock()?;
        let count = |table: &str| -> AppResult<i64> {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
        };

        let (first_date, last_date): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(data_almoco), MAX(data_almoco) FROM respostas",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StoreCounts {
            alunos: count("alunos")?,
            respostas: count("respostas")?,
            log: count("log")?,
            first_date,
            last_date,
        })
    }
}
