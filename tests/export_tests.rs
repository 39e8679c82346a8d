use almoco::core::backup::BackupLogic;
use almoco::core::migrate::MigrateLogic;
use almoco::core::roster::{RosterLogic, decode};
use almoco::db::Store;
use almoco::db::sqlite_store::SqliteStore;
use almoco::errors::AppError;
use almoco::export::{DateFilter, ExportLogic};
use almoco::models::Turma;
use chrono::NaiveDate;
use std::fs;
use std::io::Read;

mod common;
use common::{answer, temp_store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_csv_has_header_plus_one_line_per_response() {
    let (dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana Souza", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Bruno Lima", Some("2024002"), "TAI II", "NAO", "2026-10-19");
    answer(&store, &cfg, "Carla Dias", Some("2024003"), "TST III", "SIM", "2026-10-20");

    let file = dir.path().join("out.csv");
    let written =
        ExportLogic::export_responses(&store, &file, DateFilter::Day(d("2026-10-19")), false).unwrap();
    assert_eq!(written, 2);

    let content = fs::read_to_string(&file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "nome,matricula,turma,data_almoco,intencao,criado_em");
    // ordered by date, class, name
    assert!(lines[1].starts_with("Bruno Lima,2024002,TAI II,2026-10-19,NAO,"));
    assert!(lines[2].starts_with("Ana Souza,2024001,TIN I,2026-10-19,SIM,"));
}

#[test]
fn test_csv_all_dates() {
    let (dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana Souza", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Ana Souza", Some("2024001"), "TIN I", "NAO", "2026-10-20");

    let file = dir.path().join(DateFilter::All.file_name());
    let written = ExportLogic::export_responses(&store, &file, DateFilter::All, false).unwrap();

    assert_eq!(written, 2);
    assert!(file.ends_with("almoco_todas.csv"));
}

#[test]
fn test_empty_day_still_writes_header() {
    let (dir, _cfg, store) = temp_store();

    let file = dir.path().join("vazio.csv");
    let written =
        ExportLogic::export_responses(&store, &file, DateFilter::Day(d("2026-10-19")), false).unwrap();

    assert_eq!(written, 0);
    assert_eq!(fs::read_to_string(&file).unwrap().lines().count(), 1);
}

#[test]
fn test_export_can_be_reimported_as_roster() {
    let (dir, cfg, store) = temp_store();
    answer(&store, &cfg, "José, o Primeiro", Some("77"), "TIN II", "SIM", "2026-10-19");
    answer(&store, &cfg, "Maria \"Mari\" Alves", Some("78"), "TST I", "NAO", "2026-10-19");

    let file = dir.path().join("out.csv");
    ExportLogic::export_responses(&store, &file, DateFilter::All, false).unwrap();

    let parsed = RosterLogic::parse(&decode(&fs::read(&file).unwrap())).unwrap();
    assert!(parsed.erros.is_empty());

    let got: Vec<(String, String, Turma)> = parsed
        .alunos
        .into_iter()
        .map(|s| (s.nome, s.matricula, s.turma))
        .collect();
    assert_eq!(
        got,
        [
            ("José, o Primeiro".to_string(), "77".to_string(), Turma::TinII),
            ("Maria \"Mari\" Alves".to_string(), "78".to_string(), Turma::TstI),
        ]
    );
}

#[test]
fn test_date_filter_parsing() {
    let today = d("2026-10-19");

    assert_eq!(DateFilter::parse(None, today).unwrap(), DateFilter::Day(today));
    assert_eq!(DateFilter::parse(Some("  "), today).unwrap(), DateFilter::Day(today));
    assert_eq!(DateFilter::parse(Some("TODAS"), today).unwrap(), DateFilter::All);
    assert_eq!(DateFilter::parse(Some("all"), today).unwrap(), DateFilter::All);
    assert_eq!(
        DateFilter::parse(Some("2026-03-02"), today).unwrap(),
        DateFilter::Day(d("2026-03-02"))
    );
    assert!(matches!(
        DateFilter::parse(Some("02/03/2026"), today),
        Err(AppError::Validation(_))
    ));

    assert_eq!(DateFilter::Day(today).file_name(), "almoco_2026-10-19.csv");
}

#[test]
fn test_file_backup_and_compression() {
    let (dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana Souza", Some("2024001"), "TIN I", "SIM", "2026-10-19");

    let plain = BackupLogic::backup(&store, &cfg, &dir.path().join("copia.db"), false, false).unwrap();
    assert!(plain.exists());

    let zipped = BackupLogic::backup(&store, &cfg, &dir.path().join("copia2.db"), true, false).unwrap();
    assert_eq!(zipped.extension().unwrap(), "zip");
    assert!(!dir.path().join("copia2.db").exists());

    let mut archive = zip::ZipArchive::new(fs::File::open(&zipped).unwrap()).unwrap();
    let mut entry = archive.by_name("copia2.db").unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    assert!(bytes.starts_with(b"SQLite format 3"));

    let log = store.recent_log(10).unwrap();
    assert_eq!(log.iter().filter(|e| e.operation == "backup").count(), 2);
}

#[test]
fn test_snapshots_are_pruned_to_the_newest() {
    let (dir, _cfg, _store) = temp_store();
    let backups = dir.path().join("backups");
    fs::create_dir_all(&backups).unwrap();
    for day in ["2026-10-15", "2026-10-16", "2026-10-17", "2026-10-18"] {
        fs::write(backups.join(format!("almoco_backup_{day}.xlsx")), b"x").unwrap();
    }
    fs::write(backups.join("outro.xlsx"), b"x").unwrap();

    let removed = BackupLogic::prune_old(&backups, 2).unwrap();

    assert_eq!(removed.len(), 2);
    assert!(backups.join("almoco_backup_2026-10-18.xlsx").exists());
    assert!(backups.join("almoco_backup_2026-10-17.xlsx").exists());
    assert!(!backups.join("almoco_backup_2026-10-15.xlsx").exists());
    assert!(backups.join("outro.xlsx").exists());
}

#[test]
fn test_copy_between_stores_is_repeatable() {
    let (_dir, cfg, source) = temp_store();
    RosterLogic::import_bytes(&source, &cfg, common::ROSTER_CSV.as_bytes()).unwrap();
    answer(&source, &cfg, "Ana Souza", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    answer(&source, &cfg, "Sem Matrícula", None, "TAI I", "NAO", "2026-10-19");

    let target = SqliteStore::open_in_memory().unwrap();
    let first = MigrateLogic::copy(&source, &target).unwrap();
    assert_eq!(first.alunos_copiados, 3);
    assert_eq!(first.respostas_copiadas, 2);

    let second = MigrateLogic::copy(&source, &target).unwrap();
    assert_eq!(second.target.alunos, 3);
    assert_eq!(second.target.respostas, 2);
    assert_eq!(
        target.all_responses().unwrap()[0].chave,
        "AUTO::TAI I::SEM MATRÍCULA"
    );
}
