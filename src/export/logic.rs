// src/export/logic.rs

use crate::core::summary::SummaryLogic;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::export::csv::responses_csv;
use crate::export::fs_utils::{ensure_writable, write_bytes};
use crate::export::planilha::WeeklySheet;
use crate::export::quadro::render_board;
use crate::export::{SheetFormat, notify_export_success};
use crate::models::{LunchResponse, Turma};
use crate::ui::messages::{info, warning};
use crate::utils::date::parse_date;
use chrono::NaiveDate;
use std::path::Path;

/// Which responses the CSV export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Day(NaiveDate),
    All,
}

impl DateFilter {
    /// `todas` / `all` select every date; a missing value means `default`.
    pub fn parse(s: Option<&str>, default: NaiveDate) -> AppResult<Self> {
        match s.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(DateFilter::Day(default)),
            Some(v) if v.eq_ignore_ascii_case("todas") || v.eq_ignore_ascii_case("all") => {
                Ok(DateFilter::All)
            }
            Some(v) => parse_date(v)
                .map(DateFilter::Day)
                .ok_or_else(|| AppError::Validation(format!("Data inválida: {v} (use AAAA-MM-DD)"))),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DateFilter::Day(d) => d.format("%Y-%m-%d").to_string(),
            DateFilter::All => "todas".to_string(),
        }
    }

    /// `almoco_<date|todas>.csv`
    pub fn file_name(&self) -> String {
        format!("almoco_{}.csv", self.label())
    }
}

/// High-level export logic shared by the CLI commands.
pub struct ExportLogic;

impl ExportLogic {
    pub fn load_responses(store: &dyn Store, filter: DateFilter) -> AppResult<Vec<LunchResponse>> {
        match filter {
            DateFilter::Day(d) => store.responses_between(d, d),
            DateFilter::All => store.all_responses(),
        }
    }

    /// Write the responses CSV; returns the number of data rows.
    pub fn export_responses(
        store: &dyn Store,
        file: &Path,
        filter: DateFilter,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(file, force)?;

        let responses = Self::load_responses(store, filter)?;
        if responses.is_empty() {
            warning(format!("No responses found for {}.", filter.label()));
        }

        info(format!("Exporting to CSV: {}", file.display()));
        write_bytes(file, &responses_csv(&responses)?)?;
        notify_export_success("CSV", file);

        Ok(responses.len())
    }

    pub fn export_planilha(
        store: &dyn Store,
        turma: Turma,
        date: NaiveDate,
        format: SheetFormat,
        file: &Path,
        force: bool,
    ) -> AppResult<WeeklySheet> {
        ensure_writable(file, force)?;

        let sheet = WeeklySheet::load(store, turma, date)?;
        if sheet.rows.is_empty() {
            warning(format!(
                "No students or responses for {} in the week of {}.",
                turma, sheet.monday
            ));
        }

        write_bytes(file, &sheet.render(format)?)?;
        notify_export_success(&format.as_str().to_uppercase(), file);
        Ok(sheet)
    }

    pub fn export_quadro(
        store: &dyn Store,
        date: NaiveDate,
        format: SheetFormat,
        file: &Path,
        force: bool,
    ) -> AppResult<()> {
        ensure_writable(file, force)?;

        let board = SummaryLogic::board(store, date)?;
        write_bytes(file, &render_board(&board, format)?)?;
        notify_export_success(&format.as_str().to_uppercase(), file);
        Ok(())
    }
}
