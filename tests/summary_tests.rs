use almoco::core::summary::{Period, SummaryLogic, daily_summary, period_report, weekly_board};
use almoco::db::Store;
use almoco::models::Turma;
use chrono::NaiveDate;

mod common;
use common::{answer, temp_store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_daily_summary_lists_all_classes() {
    let (_dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana", Some("1"), "TIN I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Bia", Some("2"), "TIN I", "NAO", "2026-10-19");
    answer(&store, &cfg, "Cadu", Some("3"), "TST III", "SIM", "2026-10-19");
    answer(&store, &cfg, "Davi", Some("4"), "TST III", "SIM", "2026-10-20");

    let responses = store.all_responses().unwrap();
    let summary = daily_summary(d("2026-10-19"), &responses);

    assert_eq!(summary.resumo.len(), 9);
    assert_eq!(summary.total_sim, 2);
    assert_eq!(summary.total_nao, 1);
    assert_eq!(summary.respostas.len(), 3);

    let tin1 = &summary.resumo[0];
    assert_eq!(tin1.turma, Turma::TinI);
    assert_eq!((tin1.sim, tin1.nao, tin1.total), (1, 1, 2));

    let tai1 = summary.resumo.iter().find(|c| c.turma == Turma::TaiI).unwrap();
    assert_eq!(tai1.total, 0);
    assert_eq!(tai1.rotulo, "TÉCNICO EM AUTOMAÇÃO INDUSTRIAL – 1");
}

#[test]
fn test_empty_day_has_zero_totals() {
    let summary = daily_summary(d("2026-10-19"), &[]);

    assert_eq!(summary.resumo.len(), 9);
    assert!(summary.resumo.iter().all(|c| c.total == 0));
    assert_eq!(summary.total_sim + summary.total_nao, 0);
}

#[test]
fn test_weekly_board_counts_only_sim() {
    let (_dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana", Some("1"), "TAI I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Ana", Some("1"), "TAI I", "SIM", "2026-10-23");
    answer(&store, &cfg, "Bia", Some("2"), "TAI I", "NAO", "2026-10-19");
    answer(&store, &cfg, "Cadu", Some("3"), "TIN II", "SIM", "2026-10-21");
    // saturday and next monday fall outside the board
    answer(&store, &cfg, "Cadu", Some("3"), "TIN II", "SIM", "2026-10-24");
    answer(&store, &cfg, "Cadu", Some("3"), "TIN II", "SIM", "2026-10-26");

    let board = weekly_board(d("2026-10-21"), &store.all_responses().unwrap());

    assert_eq!(board.inicio, d("2026-10-19"));
    assert_eq!(board.fim, d("2026-10-23"));
    assert_eq!(board.linhas.len(), 9);
    assert_eq!(board.linhas[0].turma, Turma::TaiI);
    assert_eq!(board.linhas[0].dias, [1, 0, 0, 0, 1]);
    assert_eq!(board.linhas[0].total, 2);

    let tin2 = board.linhas.iter().find(|l| l.turma == Turma::TinII).unwrap();
    assert_eq!(tin2.dias, [0, 0, 1, 0, 0]);

    assert_eq!(board.totais, [1, 0, 1, 0, 1]);
    assert_eq!(board.total, 3);
}

#[test]
fn test_period_report_totals() {
    let (_dir, cfg, store) = temp_store();
    answer(&store, &cfg, "Ana", Some("1"), "TIN I", "SIM", "2026-10-19");
    answer(&store, &cfg, "Bia", Some("2"), "TIN I", "NAO", "2026-10-19");
    answer(&store, &cfg, "Ana", Some("1"), "TIN I", "SIM", "2026-10-02");
    answer(&store, &cfg, "Ana", Some("1"), "TIN I", "SIM", "2026-03-10");
    answer(&store, &cfg, "Ana", Some("1"), "TIN I", "SIM", "2025-12-31");

    let responses = store.all_responses().unwrap();
    let report = period_report(Period::Mes, d("2026-10-19"), &responses);

    assert_eq!(report.inicio, d("2026-10-01"));
    assert_eq!(report.fim, d("2026-10-31"));
    assert_eq!(report.dias.len(), 2);
    assert_eq!(report.dias[1].data, d("2026-10-19"));
    assert_eq!((report.dias[1].sim, report.dias[1].nao), (1, 1));
    assert_eq!(report.total_semana_sim, 1);
    assert_eq!(report.total_mes_sim, 2);
    assert_eq!(report.total_ano_sim, 3);
}

#[test]
fn test_period_parse_and_bounds() {
    assert_eq!(Period::parse(None), Period::Semana);
    assert_eq!(Period::parse(Some("mês")), Period::Mes);
    assert_eq!(Period::parse(Some("MONTH")), Period::Mes);
    assert_eq!(Period::parse(Some("ano")), Period::Ano);
    assert_eq!(Period::parse(Some("decada")), Period::Semana);

    assert_eq!(
        Period::Semana.bounds(d("2026-10-25")),
        (d("2026-10-19"), d("2026-10-25"))
    );
    assert_eq!(
        Period::Ano.bounds(d("2026-10-25")),
        (d("2026-01-01"), d("2026-12-31"))
    );
}

#[test]
fn test_admin_summary_across_year_boundary() {
    let (_dir, cfg, store) = temp_store();
    // week of 2026-12-28 runs into January 2027
    answer(&store, &cfg, "Ana", Some("1"), "TST I", "SIM", "2026-12-31");
    answer(&store, &cfg, "Ana", Some("1"), "TST I", "SIM", "2027-01-01");

    let summary = SummaryLogic::build(&store, d("2026-12-31"), Period::Semana).unwrap();

    assert_eq!(summary.diario.total_sim, 1);
    assert_eq!(summary.semana.total, 2);
    assert_eq!(summary.periodo.total_semana_sim, 2);
    assert_eq!(summary.periodo.total_ano_sim, 1);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["data"], "2026-12-31");
    assert_eq!(json["total_sim"], 1);
    assert_eq!(json["resumo"].as_array().unwrap().len(), 9);
    assert_eq!(json["semana"]["inicio"], "2026-12-28");
    assert_eq!(json["periodo"]["periodo"], "semana");
}
