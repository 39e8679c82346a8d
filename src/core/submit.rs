//! Student submissions: one day (`POST /enviar`) or a whole week
//! (`POST /enviar_semana`).

use crate::config::Config;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Answer, LunchResponse, NewResponse, StudentKey, StudentRecord, Turma, Weekday};
use crate::utils::date::{now_stamp, parse_date, today, week_start};
use crate::utils::{collapse_whitespace, non_blank, normalize};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

/// Fields of the daily form, as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    pub nome: Option<String>,
    pub matricula: Option<String>,
    pub turma: Option<String>,
    pub intencao: Option<String>,
    pub data_almoco: Option<String>,
}

/// Fields of the weekly form. `dias` holds every posted value; each one may
/// itself list several days (`seg,qua` / `seg;qua` / `seg qua`).
#[derive(Debug, Clone, Default)]
pub struct WeekSubmissionForm {
    pub nome: Option<String>,
    pub matricula: Option<String>,
    pub turma: Option<String>,
    pub dias: Vec<String>,
    pub data_almoco: Option<String>,
}

impl WeekSubmissionForm {
    /// Build from decoded `key=value` pairs, keeping repeated `dias` keys.
    /// For the other fields the last value wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "nome" => form.nome = Some(value),
                "matricula" => form.matricula = Some(value),
                "turma" => form.turma = Some(value),
                "dias" | "dias[]" => form.dias.push(value),
                "data_almoco" => form.data_almoco = Some(value),
                _ => {}
            }
        }
        form
    }
}

/// Validated identity shared by both forms.
struct Identity {
    key: StudentKey,
    nome: String,
    turma: Turma,
}

pub struct SubmitLogic;

impl SubmitLogic {
    /// Validate a daily form into the row to upsert. Nothing is written.
    pub fn validate(form: &SubmissionForm, cfg: &Config) -> AppResult<NewResponse> {
        let nome = required_name(form.nome.as_deref())?;
        let turma = required_turma(form.turma.as_deref())?;

        let intencao = form
            .intencao
            .as_deref()
            .and_then(Answer::parse)
            .ok_or_else(|| AppError::Validation("Escolha SIM ou NÃO.".into()))?;

        let date = optional_date(form.data_almoco.as_deref())?;
        let id = identity(nome, turma, form.matricula.as_deref(), cfg)?;

        Ok(NewResponse::new(
            &id.key,
            &id.nome,
            id.turma,
            date,
            intencao,
            &now_stamp(),
        ))
    }

    /// Validate and upsert one answer; returns the stored row.
    pub fn submit(
        store: &dyn Store,
        cfg: &Config,
        form: &SubmissionForm,
    ) -> AppResult<LunchResponse> {
        let row = Self::validate(form, cfg)?;
        store.upsert_responses(std::slice::from_ref(&row))?;

        let stored = store
            .response_for(&row.chave, row.data_almoco)?
            .ok_or_else(|| AppError::Other("response not found after upsert".into()))?;

        store.log(
            "submit",
            &stored.chave,
            &format!("{} {} {}", stored.data_almoco, stored.turma, stored.intencao),
        )?;
        info!(
            chave = %stored.chave,
            turma = %stored.turma,
            data = %stored.data_almoco,
            intencao = %stored.intencao,
            "response recorded"
        );

        Ok(stored)
    }

    /// Validate a weekly form into five rows, Monday to Friday.
    pub fn validate_week(form: &WeekSubmissionForm, cfg: &Config) -> AppResult<Vec<NewResponse>> {
        let nome = required_name(form.nome.as_deref())?;
        let turma = required_turma(form.turma.as_deref())?;
        let dias = parse_days(&form.dias.join(","))?;
        let monday = week_start(optional_date(form.data_almoco.as_deref())?);
        let id = identity(nome, turma, form.matricula.as_deref(), cfg)?;

        let stamp = now_stamp();
        Ok(Weekday::ALL
            .iter()
            .map(|day| {
                let answer = if dias.contains(day) {
                    Answer::Sim
                } else {
                    Answer::Nao
                };
                NewResponse::new(&id.key, &id.nome, id.turma, day.date_from(monday), answer, &stamp)
            })
            .collect())
    }

    /// Validate and upsert a whole week in one transaction.
    pub fn submit_week(
        store: &dyn Store,
        cfg: &Config,
        form: &WeekSubmissionForm,
    ) -> AppResult<Vec<LunchResponse>> {
        let rows = Self::validate_week(form, cfg)?;
        store.upsert_responses(&rows)?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(r) = store.response_for(&row.chave, row.data_almoco)? {
                stored.push(r);
            }
        }

        let sim = rows.iter().filter(|r| r.intencao.is_sim()).count();
        if let Some(first) = rows.first() {
            store.log(
                "submit_week",
                &first.chave,
                &format!("week of {} {}: {sim} SIM", first.data_almoco, first.turma),
            )?;
            info!(chave = %first.chave, semana = %first.data_almoco, sim, "weekly response recorded");
        }

        Ok(stored)
    }

    /// Roster lookup used by the form's auto-fill.
    pub fn lookup_student(store: &dyn Store, matricula: Option<&str>) -> AppResult<StudentRecord> {
        let matricula = non_blank(matricula)
            .ok_or_else(|| AppError::Validation("Informe a matrícula.".into()))?;

        store
            .find_student(&matricula)?
            .ok_or_else(|| AppError::NotFound(format!("Matrícula {matricula} não encontrada.")))
    }
}

fn required_name(nome: Option<&str>) -> AppResult<String> {
    let nome = collapse_whitespace(nome.unwrap_or(""));
    if nome.is_empty() {
        return Err(AppError::Validation("Informe seu nome.".into()));
    }
    Ok(nome)
}

fn required_turma(turma: Option<&str>) -> AppResult<Turma> {
    let raw = turma.unwrap_or("").trim();
    Turma::from_code(raw).ok_or_else(|| {
        if raw.is_empty() {
            AppError::Validation("Selecione sua turma.".into())
        } else {
            AppError::Validation(format!("Turma inválida: {raw}"))
        }
    })
}

fn optional_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    match non_blank(raw) {
        None => Ok(today()),
        Some(s) => parse_date(&s)
            .ok_or_else(|| AppError::Validation(format!("Data inválida: {s} (use AAAA-MM-DD)"))),
    }
}

fn identity(nome: String, turma: Turma, matricula: Option<&str>, cfg: &Config) -> AppResult<Identity> {
    let matricula = non_blank(matricula);
    if cfg.require_matricula && matricula.is_none() {
        return Err(AppError::Validation("Informe sua matrícula.".into()));
    }

    Ok(Identity {
        key: StudentKey::new(matricula.as_deref(), turma, &nome),
        nome,
        turma,
    })
}

/// Parse the checked days of the weekly form.
///
/// Tokens are matched on their first three letters, so `segunda` and
/// `Terça` are accepted as well as `seg`/`ter`.
pub fn parse_days(raw: &str) -> AppResult<Vec<Weekday>> {
    let mut days = Vec::new();

    for token in raw
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let norm = normalize(token);
        let prefix: String = norm.chars().take(3).collect();
        let day = Weekday::from_code(&prefix)
            .ok_or_else(|| AppError::Validation(format!("Dia inválido: {token}")))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }

    if days.is_empty() {
        return Err(AppError::Validation("Selecione ao menos um dia.".into()));
    }

    days.sort();
    Ok(days)
}
