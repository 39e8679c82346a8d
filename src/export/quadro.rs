//! Weekly board export (quadro semanal): SIM counts per class and weekday.

use crate::core::summary::WeeklyBoard;
use crate::errors::{AppError, AppResult};
use crate::export::model::{Cell, Table};
use crate::export::{SheetFormat, render_tables};
use crate::models::Weekday;

pub fn board_table(board: &WeeklyBoard) -> Table {
    let mut headers = vec!["#", "Turma"];
    headers.extend(Weekday::ALL.iter().map(|d| d.label()));
    headers.push("Total");

    let mut table = Table::new("Quadro", &headers);

    for (i, row) in board.linhas.iter().enumerate() {
        let mut cells = vec![Cell::from(i + 1), Cell::text(row.rotulo)];
        cells.extend(row.dias.iter().map(|&n| Cell::from(n)));
        cells.push(Cell::from(row.total));
        table.push(cells);
    }

    let mut totals = vec![Cell::Empty, Cell::text("Total")];
    totals.extend(board.totais.iter().map(|&n| Cell::from(n)));
    totals.push(Cell::from(board.total));
    table.push(totals);

    table
}

/// CSV (comma-delimited) or XLSX; the board is not offered as ODS.
pub fn render_board(board: &WeeklyBoard, format: SheetFormat) -> AppResult<Vec<u8>> {
    if format == SheetFormat::Ods {
        return Err(AppError::Validation(
            "O quadro semanal é exportado em csv ou xlsx.".into(),
        ));
    }
    render_tables(&[board_table(board)], format, b',')
}

pub fn board_file_name(board: &WeeklyBoard, format: SheetFormat) -> String {
    format!(
        "quadro_semana_{}.{}",
        board.inicio.format("%Y-%m-%d"),
        format.extension()
    )
}
