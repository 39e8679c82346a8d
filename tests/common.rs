#![allow(dead_code)]
use almoco::config::Config;
use almoco::core::submit::{SubmissionForm, SubmitLogic};
use almoco::db::sqlite_store::SqliteStore;
use almoco::models::LunchResponse;
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// CLI command with an isolated environment rooted at `dir`.
pub fn almoco(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("almoco");
    cmd.env("ALMOCO_DATA_DIR", dir)
        .env_remove("DATABASE_URL")
        .env_remove("ALMOCO_CONFIG")
        .env_remove("ALMOCO_ADMIN_TOKEN")
        .env_remove("ALMOCO_REQUIRE_MATRICULA")
        .env_remove("ALMOCO_MAX_BACKUPS")
        .env_remove("ALMOCO_LOG_JSON")
        .env_remove("HOST")
        .env_remove("PORT");
    cmd
}

/// Configuration pointing at a fresh temp data dir.
pub fn test_config(dir: &Path) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        admin_token: "segredo".to_string(),
        ..Config::default()
    }
}

/// Temp dir + file-backed store inside it.
pub fn temp_store() -> (TempDir, Config, SqliteStore) {
    let dir = TempDir::new().expect("temp dir");
    let cfg = test_config(dir.path());
    let store = SqliteStore::open(&cfg.database_file()).expect("open store");
    (dir, cfg, store)
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write file");
    path
}

pub fn form(nome: &str, matricula: Option<&str>, turma: &str, intencao: &str, data: &str) -> SubmissionForm {
    SubmissionForm {
        nome: Some(nome.to_string()),
        matricula: matricula.map(str::to_string),
        turma: Some(turma.to_string()),
        intencao: Some(intencao.to_string()),
        data_almoco: Some(data.to_string()),
    }
}

/// Submit one answer through the core logic, panicking on validation errors.
pub fn answer(
    store: &SqliteStore,
    cfg: &Config,
    nome: &str,
    matricula: Option<&str>,
    turma: &str,
    intencao: &str,
    data: &str,
) -> LunchResponse {
    SubmitLogic::submit(store, cfg, &form(nome, matricula, turma, intencao, data)).expect("submit")
}

pub const ROSTER_CSV: &str = "nome,matricula,turma\n\
Ana Souza,2024001,TIN I\n\
Bruno Lima,2024002,TIN I\n\
Carla Dias,2024003,TAI II\n";
