use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::open_store;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::models::Turma;
use crate::utils::date::{parse_date, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Planilha {
        turma,
        week,
        format,
        file,
        force,
    } = cmd
    {
        let turma = Turma::parse(turma)
            .ok_or_else(|| AppError::Validation(format!("Unknown class '{turma}'")))?;
        let date = parse_week(week.as_deref())?;

        let store = open_store(cfg)?;
        let sheet =
            ExportLogic::export_planilha(store.as_ref(), turma, date, *format, file, *force)?;
        println!("   {} rows, week of {}", sheet.rows.len(), sheet.monday);
    }
    Ok(())
}

/// `--week` value, today when omitted.
pub(crate) fn parse_week(week: Option<&str>) -> AppResult<chrono::NaiveDate> {
    match week {
        None => Ok(today()),
        Some(w) => parse_date(w)
            .ok_or_else(|| AppError::Validation(format!("Invalid date '{w}' (expected YYYY-MM-DD)"))),
    }
}
