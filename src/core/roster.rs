//! CSV roster import into `alunos`.
//!
//! File-level problems (unreadable file, missing column, no data) abort the
//! import with [`AppError::Import`]. Row-level problems are collected as
//! [`ImportRowError`]s and the remaining rows are still imported.

use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{StudentRecord, Turma};
use crate::utils::date::now_stamp;
use crate::utils::{collapse_whitespace, normalize};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const NAME_ALIASES: [&str; 3] = ["nome", "aluno", "nome completo"];
const MATRICULA_ALIASES: [&str; 3] = ["matricula", "matricula aluno", "ra"];
const TURMA_ALIASES: [&str; 3] = ["turma", "serie", "classe"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    /// 1-based file line; the header is line 1.
    pub linha: usize,
    pub matricula: String,
    pub motivo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub importados: usize,
    pub erros: Vec<ImportRowError>,
}

/// Outcome of parsing, before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    pub alunos: Vec<StudentRecord>,
    pub erros: Vec<ImportRowError>,
}

/// Decode upload bytes: drop a UTF-8 BOM, fall back to Latin-1 for
/// spreadsheets saved in legacy encodings.
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// `;` when the header line has more semicolons than commas, `,` otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).map(str::trim).unwrap_or("").to_string()
}

pub struct RosterLogic;

impl RosterLogic {
    /// Parse roster text into valid students and row errors.
    pub fn parse(text: &str) -> AppResult<ParsedRoster> {
        if text.trim().is_empty() {
            return Err(AppError::Import("Arquivo vazio.".into()));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(detect_delimiter(text))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::Import(format!("Não foi possível ler o cabeçalho: {e}")))?
            .iter()
            .map(normalize)
            .collect();

        let (Some(nome_col), Some(mat_col), Some(turma_col)) = (
            find_column(&headers, &NAME_ALIASES),
            find_column(&headers, &MATRICULA_ALIASES),
            find_column(&headers, &TURMA_ALIASES),
        ) else {
            return Err(AppError::Import(
                "Arquivo precisa das colunas: nome, matricula e turma.".into(),
            ));
        };

        let stamp = now_stamp();
        let mut parsed = ParsedRoster::default();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut data_rows = 0usize;

        for (i, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| AppError::Import(format!("Não foi possível ler o arquivo: {e}")))?;
            let linha = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);

            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            data_rows += 1;

            let nome = collapse_whitespace(&field(&record, nome_col));
            let matricula = field(&record, mat_col);
            let turma_raw = field(&record, turma_col);

            let reject = |motivo: String| ImportRowError {
                linha,
                matricula: matricula.clone(),
                motivo,
            };

            if nome.is_empty() {
                parsed.erros.push(reject("Nome ausente.".into()));
                continue;
            }
            if matricula.is_empty() {
                parsed.erros.push(reject("Matrícula ausente.".into()));
                continue;
            }
            if turma_raw.is_empty() {
                parsed.erros.push(reject("Turma ausente.".into()));
                continue;
            }
            let Some(turma) = Turma::parse(&turma_raw) else {
                parsed
                    .erros
                    .push(reject(format!("Turma desconhecida: {turma_raw}")));
                continue;
            };
            if let Some(first) = seen.get(&matricula) {
                parsed.erros.push(reject(format!(
                    "Matrícula repetida no arquivo (já na linha {first})."
                )));
                continue;
            }

            seen.insert(matricula.clone(), linha);
            parsed.alunos.push(StudentRecord {
                matricula,
                nome,
                turma,
                atualizado_em: stamp.clone(),
            });
        }

        if data_rows == 0 {
            return Err(AppError::Import("Arquivo sem dados para importar.".into()));
        }

        Ok(parsed)
    }

    /// Parse and upsert a roster upload, then refresh the XLSX snapshot.
    pub fn import_bytes(store: &dyn Store, cfg: &Config, bytes: &[u8]) -> AppResult<ImportReport> {
        let parsed = Self::parse(&decode(bytes))?;

        let importados = if parsed.alunos.is_empty() {
            0
        } else {
            store.upsert_students(&parsed.alunos)?;
            parsed.alunos.len()
        };

        store.log(
            "import",
            "alunos",
            &format!("{importados} imported, {} rejected", parsed.erros.len()),
        )?;
        info!(importados, erros = parsed.erros.len(), "roster imported");

        if let Err(e) = BackupLogic::snapshot_xlsx(store, cfg) {
            warn!(error = %e, "xlsx snapshot after roster import failed");
        }

        Ok(ImportReport {
            importados,
            erros: parsed.erros,
        })
    }

    pub fn import_file(store: &dyn Store, cfg: &Config, path: &Path) -> AppResult<ImportReport> {
        let bytes = fs::read(path)?;
        Self::import_bytes(store, cfg, &bytes)
    }
}
