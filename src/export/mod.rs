// src/export/mod.rs

pub mod csv;
pub(crate) mod fs_utils;
pub mod logic;
pub mod model;
pub mod ods;
pub mod planilha;
pub mod quadro;
pub mod xlsx;

pub use logic::{DateFilter, ExportLogic};
pub use model::{Cell, ResponseExport, Table};
pub use planilha::WeeklySheet;

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for CLI exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

/// Spreadsheet output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SheetFormat {
    #[default]
    Ods,
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetFormat::Ods => "ods",
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            SheetFormat::Ods => ods::ODS_MIMETYPE,
            SheetFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            SheetFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    /// Query-string value; missing means ODS, unknown is rejected.
    pub fn parse(s: Option<&str>) -> AppResult<Self> {
        match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("ods") => Ok(SheetFormat::Ods),
            Some("xlsx") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            Some(other) => Err(AppError::Validation(format!(
                "Formato inválido: {other} (use ods, xlsx ou csv)"
            ))),
        }
    }
}

/// Render tables in the requested format. CSV carries only the first table.
pub fn render_tables(tables: &[Table], format: SheetFormat, csv_delimiter: u8) -> AppResult<Vec<u8>> {
    match format {
        SheetFormat::Ods => ods::render_ods(tables),
        SheetFormat::Xlsx => xlsx::render_workbook(tables),
        SheetFormat::Csv => match tables.first() {
            Some(t) => csv::write_table(t, csv_delimiter),
            None => Ok(Vec::new()),
        },
    }
}
