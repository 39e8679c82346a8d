use crate::errors::{AppError, AppResult};
use crate::export::model::Table;
use crate::models::LunchResponse;
use csv::WriterBuilder;

/// Render a table as CSV with the given delimiter.
pub fn write_table(table: &Table, delimiter: u8) -> AppResult<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.as_text()))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV buffer error: {e}")))
}

/// Responses CSV: `nome,matricula,turma,data_almoco,intencao,criado_em`.
pub fn responses_csv(responses: &[LunchResponse]) -> AppResult<Vec<u8>> {
    write_table(&super::model::responses_to_table("respostas", responses), b',')
}
