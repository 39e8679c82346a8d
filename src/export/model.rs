// src/export/model.rs

use crate::models::LunchResponse;
use serde::Serialize;

/// One spreadsheet cell. Blank cells stay empty in every format.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Display form used by CSV and width computation.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Number(n as f64)
    }
}

/// A named sheet: header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Flat row of the responses CSV.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ResponseExport {
    pub nome: String,
    pub matricula: String,
    pub turma: String,
    pub data_almoco: String,
    pub intencao: String,
    pub criado_em: String,
}

impl From<&LunchResponse> for ResponseExport {
    fn from(r: &LunchResponse) -> Self {
        Self {
            nome: r.nome.clone(),
            matricula: r.matricula.clone().unwrap_or_default(),
            turma: r.turma.code().to_string(),
            data_almoco: r.data_almoco.format("%Y-%m-%d").to_string(),
            intencao: r.intencao.as_str().to_string(),
            criado_em: r.criado_em.clone(),
        }
    }
}

/// Header for the responses CSV / XLSX snapshot.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "nome",
        "matricula",
        "turma",
        "data_almoco",
        "intencao",
        "criado_em",
    ]
}

pub(crate) fn response_to_row(r: &ResponseExport) -> Vec<Cell> {
    vec![
        Cell::text(&r.nome),
        Cell::text(&r.matricula),
        Cell::text(&r.turma),
        Cell::text(&r.data_almoco),
        Cell::text(&r.intencao),
        Cell::text(&r.criado_em),
    ]
}

pub(crate) fn responses_to_table(name: &str, responses: &[LunchResponse]) -> Table {
    let mut table = Table::new(name, &get_headers());
    for r in responses {
        table.push(response_to_row(&ResponseExport::from(r)));
    }
    table
}
