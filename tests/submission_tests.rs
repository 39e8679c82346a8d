use almoco::core::submit::{SubmitLogic, WeekSubmissionForm, parse_days};
use almoco::db::Store;
use almoco::db::sqlite_store::SqliteStore;
use almoco::errors::AppError;
use almoco::models::{Answer, Turma, Weekday};
use chrono::NaiveDate;
use std::thread;

mod common;
use common::{answer, form, temp_store};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_repeated_submission_keeps_one_row_with_last_answer() {
    let (_dir, cfg, store) = temp_store();

    for intencao in ["SIM", "NAO", "sim", "NÃO", "SIM", "nao"] {
        answer(&store, &cfg, "Ana Souza", Some("2024001"), "TIN I", intencao, "2026-10-19");
    }

    let rows = store.responses_between(day("2026-10-19"), day("2026-10-19")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].intencao, Answer::Nao);
    assert_eq!(rows[0].matricula.as_deref(), Some("2024001"));
}

#[test]
fn test_resubmission_updates_name_and_class() {
    let (_dir, cfg, store) = temp_store();

    answer(&store, &cfg, "Ana", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    let updated = answer(&store, &cfg, "Ana  Souza", Some("2024001"), "tin ii", "NAO", "2026-10-19");

    assert_eq!(updated.nome, "Ana Souza");
    assert_eq!(updated.turma, Turma::TinII);
    assert_eq!(store.all_responses().unwrap().len(), 1);
}

#[test]
fn test_same_key_on_different_days_creates_separate_rows() {
    let (_dir, cfg, store) = temp_store();

    answer(&store, &cfg, "Ana", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Ana", Some("2024001"), "TIN I", "SIM", "2026-10-20");

    assert_eq!(store.all_responses().unwrap().len(), 2);
}

#[test]
fn test_invalid_answer_is_rejected_without_writing() {
    let (_dir, cfg, store) = temp_store();

    for bad in ["TALVEZ", "", "yes"] {
        let err = SubmitLogic::submit(&store, &cfg, &form("Ana", Some("1"), "TIN I", bad, "2026-10-19"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{bad}: {err}");
    }

    assert!(store.all_responses().unwrap().is_empty());
}

#[test]
fn test_validation_order_and_messages() {
    let (_dir, cfg, store) = temp_store();

    let err = SubmitLogic::submit(&store, &cfg, &form("   ", None, "XYZ", "TALVEZ", "x")).unwrap_err();
    assert_eq!(err.to_string(), "Informe seu nome.");

    let err = SubmitLogic::submit(&store, &cfg, &form("Ana", None, "XYZ", "SIM", "2026-10-19")).unwrap_err();
    assert!(err.to_string().contains("Turma"));

    let err = SubmitLogic::submit(&store, &cfg, &form("Ana", None, "TIN I", "SIM", "19/10/2026")).unwrap_err();
    assert!(err.to_string().contains("Data inválida"));

    assert!(store.all_responses().unwrap().is_empty());
}

#[test]
fn test_missing_registration_falls_back_to_name_and_class_key() {
    let (_dir, cfg, store) = temp_store();

    answer(&store, &cfg, "joão  da silva", None, "TST III", "SIM", "2026-10-19");
    let second = answer(&store, &cfg, "JOÃO DA SILVA", Some("  "), "TST III", "NAO", "2026-10-19");

    assert_eq!(second.chave, "AUTO::TST III::JOÃO DA SILVA");
    assert_eq!(second.matricula, None);
    assert_eq!(store.all_responses().unwrap().len(), 1);
}

#[test]
fn test_require_matricula_rejects_missing_registration() {
    let (_dir, mut cfg, store) = temp_store();
    cfg.require_matricula = true;

    let err = SubmitLogic::submit(&store, &cfg, &form("Ana", None, "TIN I", "SIM", "2026-10-19")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.all_responses().unwrap().is_empty());

    answer(&store, &cfg, "Ana", Some("2024001"), "TIN I", "SIM", "2026-10-19");
    assert_eq!(store.all_responses().unwrap().len(), 1);
}

#[test]
fn test_week_submission_writes_five_rows() {
    let (_dir, cfg, store) = temp_store();

    let week = WeekSubmissionForm {
        nome: Some("Ana".into()),
        matricula: Some("2024001".into()),
        turma: Some("TIN I".into()),
        dias: vec!["seg, qua".into(), "sex".into()],
        // a Thursday: rows land on Monday 19 .. Friday 23
        data_almoco: Some("2026-10-22".into()),
    };

    let stored = SubmitLogic::submit_week(&store, &cfg, &week).unwrap();
    assert_eq!(stored.len(), 5);

    let rows = store.responses_between(day("2026-10-19"), day("2026-10-23")).unwrap();
    let answers: Vec<&str> = rows.iter().map(|r| r.intencao.as_str()).collect();
    assert_eq!(answers, ["SIM", "NAO", "SIM", "NAO", "SIM"]);
}

#[test]
fn test_week_submission_requires_a_day() {
    let (_dir, cfg, store) = temp_store();

    let week = WeekSubmissionForm {
        nome: Some("Ana".into()),
        turma: Some("TIN I".into()),
        dias: vec![" , ".into()],
        ..Default::default()
    };

    assert!(matches!(
        SubmitLogic::submit_week(&store, &cfg, &week),
        Err(AppError::Validation(_))
    ));
    assert!(store.all_responses().unwrap().is_empty());
}

#[test]
fn test_parse_days_accepts_full_names_and_rejects_weekend() {
    assert_eq!(
        parse_days("Segunda Terça sexta seg").unwrap(),
        vec![Weekday::Seg, Weekday::Ter, Weekday::Sex]
    );
    assert!(parse_days("sab").is_err());
}

#[test]
fn test_lookup_student_errors() {
    let (_dir, _cfg, store) = temp_store();

    assert!(matches!(
        SubmitLogic::lookup_student(&store, Some("  ")),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        SubmitLogic::lookup_student(&store, Some("999")),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_week_form_collects_repeated_day_fields() {
    let week = WeekSubmissionForm::from_pairs([
        ("nome".to_string(), "Ana".to_string()),
        ("dias".to_string(), "ter".to_string()),
        ("dias".to_string(), "qui".to_string()),
        ("extra".to_string(), "x".to_string()),
    ]);

    assert_eq!(week.nome.as_deref(), Some("Ana"));
    assert_eq!(week.dias, ["ter", "qui"]);
    assert_eq!(
        parse_days(&week.dias.join(",")).unwrap(),
        vec![Weekday::Ter, Weekday::Qui]
    );
}

#[test]
fn test_form_accepts_class_codes_only() {
    let (_dir, cfg, store) = temp_store();

    for turma in ["Informática 2", "TIN 2", "TÉCNICO EM INFORMÁTICA – 2"] {
        let err = SubmitLogic::submit(&store, &cfg, &form("Ana", None, turma, "SIM", "2026-10-19"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{turma}");
    }
    assert!(store.all_responses().unwrap().is_empty());

    let stored = answer(&store, &cfg, "Ana", None, " tst  iii ", "SIM", "2026-10-19");
    assert_eq!(stored.turma, Turma::TstIII);
}

#[test]
fn test_concurrent_submissions_keep_one_row_per_day() {
    let (_dir, cfg, store) = temp_store();

    // one connection per thread: only the table constraint serialises them
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cfg = cfg.clone();
            let conn = SqliteStore::open(&cfg.database_file()).unwrap();
            thread::spawn(move || {
                let intencao = if i % 2 == 0 { "SIM" } else { "NAO" };
                for _ in 0..5 {
                    let f = form("Ana Souza", Some("2024001"), "TIN I", intencao, "2026-10-19");
                    SubmitLogic::submit(&conn, &cfg, &f).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let rows = store.responses_between(day("2026-10-19"), day("2026-10-19")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].chave, "2024001");
}
