//! Aggregations behind the admin view: daily per-class counts, the weekly
//! board and the week/month/year period report.
//!
//! Everything here is pure over a slice of responses; [`SummaryLogic`]
//! only decides which range to load.

use crate::db::Store;
use crate::errors::AppResult;
use crate::models::{LunchResponse, Turma};
use crate::utils::date::{month_bounds, school_week, week_start, year_bounds};
use crate::utils::normalize;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub turma: Turma,
    pub rotulo: &'static str,
    pub sim: usize,
    pub nao: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub data: NaiveDate,
    /// All nine classes, form order, zero counts included.
    pub resumo: Vec<ClassCount>,
    pub total_sim: usize,
    pub total_nao: usize,
    /// Rows of that date, ordered by class then name.
    pub respostas: Vec<LunchResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub turma: Turma,
    pub rotulo: &'static str,
    /// SIM count per weekday, Monday first.
    pub dias: [usize; 5],
    pub total: usize,
}

/// SIM counts per class and weekday (quadro semanal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyBoard {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
    pub dias: [NaiveDate; 5],
    pub linhas: Vec<BoardRow>,
    pub totais: [usize; 5],
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Semana,
    Mes,
    Ano,
}

impl Period {
    /// Unknown or missing values fall back to the week.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(normalize).as_deref() {
            Some("mes") | Some("month") => Period::Mes,
            Some("ano") | Some("year") => Period::Ano,
            _ => Period::Semana,
        }
    }

    /// Inclusive bounds of the period containing `date`.
    pub fn bounds(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Semana => {
                let monday = week_start(date);
                (monday, monday + Duration::days(6))
            }
            Period::Mes => month_bounds(date),
            Period::Ano => year_bounds(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub data: NaiveDate,
    pub sim: usize,
    pub nao: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub periodo: Period,
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
    /// Dates with at least one response, ascending.
    pub dias: Vec<DayReport>,
    pub total_semana_sim: usize,
    pub total_mes_sim: usize,
    pub total_ano_sim: usize,
}

/// Payload of `GET /admin`.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    #[serde(flatten)]
    pub diario: DailySummary,
    pub semana: WeeklyBoard,
    pub periodo: PeriodReport,
}

pub fn daily_summary(date: NaiveDate, responses: &[LunchResponse]) -> DailySummary {
    let mut respostas: Vec<LunchResponse> = responses
        .iter()
        .filter(|r| r.data_almoco == date)
        .cloned()
        .collect();
    respostas.sort_by(|a, b| a.turma.cmp(&b.turma).then_with(|| a.nome.cmp(&b.nome)));

    let resumo: Vec<ClassCount> = Turma::ALL
        .iter()
        .map(|&turma| {
            let (sim, nao) = respostas
                .iter()
                .filter(|r| r.turma == turma)
                .fold((0, 0), |(s, n), r| {
                    if r.intencao.is_sim() { (s + 1, n) } else { (s, n + 1) }
                });
            ClassCount {
                turma,
                rotulo: turma.label(),
                sim,
                nao,
                total: sim + nao,
            }
        })
        .collect();

    DailySummary {
        data: date,
        total_sim: resumo.iter().map(|c| c.sim).sum(),
        total_nao: resumo.iter().map(|c| c.nao).sum(),
        resumo,
        respostas,
    }
}

pub fn weekly_board(date: NaiveDate, responses: &[LunchResponse]) -> WeeklyBoard {
    let dias = school_week(date);

    let mut linhas: Vec<BoardRow> = Turma::BOARD_ORDER
        .iter()
        .map(|&turma| BoardRow {
            turma,
            rotulo: turma.label(),
            dias: [0; 5],
            total: 0,
        })
        .collect();

    for r in responses.iter().filter(|r| r.intencao.is_sim()) {
        let Some(col) = dias.iter().position(|d| *d == r.data_almoco) else {
            continue;
        };
        if let Some(row) = linhas.iter_mut().find(|l| l.turma == r.turma) {
            row.dias[col] += 1;
            row.total += 1;
        }
    }

    let mut totais = [0usize; 5];
    for row in &linhas {
        for (t, v) in totais.iter_mut().zip(row.dias.iter()) {
            *t += v;
        }
    }

    WeeklyBoard {
        inicio: dias[0],
        fim: dias[4],
        dias,
        total: totais.iter().sum(),
        linhas,
        totais,
    }
}

pub fn period_report(period: Period, date: NaiveDate, responses: &[LunchResponse]) -> PeriodReport {
    let (inicio, fim) = period.bounds(date);

    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for r in responses
        .iter()
        .filter(|r| r.data_almoco >= inicio && r.data_almoco <= fim)
    {
        let entry = per_day.entry(r.data_almoco).or_default();
        if r.intencao.is_sim() {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let sim_between = |(from, to): (NaiveDate, NaiveDate)| {
        responses
            .iter()
            .filter(|r| r.intencao.is_sim() && r.data_almoco >= from && r.data_almoco <= to)
            .count()
    };

    PeriodReport {
        periodo: period,
        inicio,
        fim,
        dias: per_day
            .into_iter()
            .map(|(data, (sim, nao))| DayReport {
                data,
                sim,
                nao,
                total: sim + nao,
            })
            .collect(),
        total_semana_sim: sim_between(Period::Semana.bounds(date)),
        total_mes_sim: sim_between(Period::Mes.bounds(date)),
        total_ano_sim: sim_between(Period::Ano.bounds(date)),
    }
}

pub struct SummaryLogic;

impl SummaryLogic {
    /// Load every response the three views need and aggregate them.
    pub fn build(store: &dyn Store, date: NaiveDate, period: Period) -> AppResult<AdminSummary> {
        // The week around `date` may cross a year boundary.
        let (year_first, year_last) = year_bounds(date);
        let (week_first, week_last) = Period::Semana.bounds(date);
        let responses = store.responses_between(year_first.min(week_first), year_last.max(week_last))?;

        Ok(AdminSummary {
            diario: daily_summary(date, &responses),
            semana: weekly_board(date, &responses),
            periodo: period_report(period, date, &responses),
        })
    }

    pub fn board(store: &dyn Store, date: NaiveDate) -> AppResult<WeeklyBoard> {
        let days = school_week(date);
        let responses = store.responses_between(days[0], days[4])?;
        Ok(weekly_board(date, &responses))
    }
}

