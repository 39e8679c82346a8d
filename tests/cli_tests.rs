use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

mod common;
use common::{ROSTER_CSV, almoco, write_file};

#[test]
fn test_init_creates_config_and_database() {
    let dir = tempfile::tempdir().unwrap();

    almoco(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(dir.path().join("almoco.yml").exists());
    assert!(dir.path().join("almoco.db").exists());
    assert!(dir.path().join("backups").is_dir());

    // second run keeps the existing config
    almoco(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("already present"));
}

#[test]
fn test_config_print_masks_token() {
    let dir = tempfile::tempdir().unwrap();

    almoco(dir.path())
        .env("ALMOCO_ADMIN_TOKEN", "super-secreto")
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("admin_token: '********'").or(contains("admin_token: \"********\"")))
        .stdout(contains("super-secreto").not());
}

#[test]
fn test_import_reports_rejected_rows() {
    let dir = tempfile::tempdir().unwrap();
    let csv = format!("{ROSTER_CSV}Sem Turma,2024009,XYZ\n");
    let file = write_file(dir.path(), "alunos.csv", csv.as_bytes());

    almoco(dir.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("3 students imported"))
        .stdout(contains("1 rows rejected"))
        .stdout(contains("Turma desconhecida: XYZ"));
}

#[test]
fn test_import_missing_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "alunos.csv", b"nome,turma\nAna,TIN I\n");

    almoco(dir.path())
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("nome, matricula e turma"));
}

#[test]
fn test_export_all_dates() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("respostas.csv");

    almoco(dir.path()).arg("init").assert().success();
    almoco(dir.path())
        .args(["export", "--date", "all", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(content.trim(), "nome,matricula,turma,data_almoco,intencao,criado_em");
}

#[test]
fn test_export_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();

    almoco(dir.path())
        .args(["export", "--date", "ontem", "--file"])
        .arg(dir.path().join("x.csv"))
        .assert()
        .failure()
        .stderr(contains("Data inválida"));
}

#[test]
fn test_planilha_with_custom_db() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("outro").join("custom.db");
    let roster = write_file(dir.path(), "alunos.csv", ROSTER_CSV.as_bytes());
    let out = dir.path().join("tin1.csv");

    almoco(dir.path()).arg("--db").arg(&db).arg("import").arg(&roster).assert().success();
    assert!(db.exists());

    almoco(dir.path())
        .arg("--db")
        .arg(&db)
        .args(["planilha", "--turma", "Informática 1", "--week", "2026-10-21", "--format", "csv", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("2 rows, week of 2026-10-19"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("N;Nome;Seg;Ter;Qua;Qui;Sex"));
    assert!(content.contains("1;Ana Souza;;;;;"));
}

#[test]
fn test_planilha_unknown_class() {
    let dir = tempfile::tempdir().unwrap();

    almoco(dir.path())
        .args(["planilha", "--turma", "Servidores", "--file"])
        .arg(dir.path().join("x.ods"))
        .assert()
        .failure()
        .stderr(contains("Unknown class"));
}

#[test]
fn test_quadro_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("quadro.xlsx");

    almoco(dir.path())
        .args(["quadro", "--week", "2026-10-19", "--format", "xlsx", "--file"])
        .arg(&out)
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_backup_and_xlsx_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("copia.db");

    almoco(dir.path()).arg("init").assert().success();
    almoco(dir.path())
        .args(["backup", "--compress", "--file"])
        .arg(&dest)
        .assert()
        .success()
        .stdout(contains("Compressed"));
    assert!(dir.path().join("copia.zip").exists());

    almoco(dir.path())
        .args(["backup", "--xlsx"])
        .assert()
        .success()
        .stdout(contains("XLSX snapshot written"));
    let snapshots = fs::read_dir(dir.path().join("backups")).unwrap().count();
    assert_eq!(snapshots, 1);
}

#[test]
fn test_log_and_db_info() {
    let dir = tempfile::tempdir().unwrap();
    let roster = write_file(dir.path(), "alunos.csv", ROSTER_CSV.as_bytes());

    almoco(dir.path()).arg("init").assert().success();
    almoco(dir.path()).arg("import").arg(&roster).assert().success();

    almoco(dir.path())
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("3 imported, 0 rejected"));

    almoco(dir.path())
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("sqlite"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_migrate_requires_database_url() {
    let dir = tempfile::tempdir().unwrap();

    almoco(dir.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(contains("DATABASE_URL"));
}

#[test]
fn test_db_check_fails_on_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let roster = write_file(dir.path(), "alunos.csv", ROSTER_CSV.as_bytes());

    almoco(dir.path()).arg("init").assert().success();
    almoco(dir.path()).arg("import").arg(&roster).assert().success();

    // keep the header page, wipe every table page after it
    let db = dir.path().join("almoco.db");
    let mut bytes = fs::read(&db).unwrap();
    assert!(bytes.len() > 4096);
    bytes[4096..].fill(0xFF);
    fs::write(&db, bytes).unwrap();

    almoco(dir.path())
        .args(["db", "--check"])
        .assert()
        .failure()
        .stdout(contains("Integrity check passed").not());
}
