//! Weekly per-student spreadsheet of one class (planilha semanal).

use crate::db::Store;
use crate::errors::AppResult;
use crate::export::model::{Cell, Table};
use crate::export::{SheetFormat, render_tables};
use crate::models::{Answer, LunchResponse, StudentRecord, Turma, Weekday};
use crate::utils::date::{school_week, week_start};
use crate::utils::normalize;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub nome: String,
    /// Roster registration, or the response key for unrostered respondents.
    pub chave: String,
    pub dias: [Option<Answer>; 5],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySheet {
    pub turma: Turma,
    pub monday: NaiveDate,
    pub rows: Vec<SheetRow>,
}

impl WeeklySheet {
    /// Merge the class roster with the class's responses of the week
    /// containing `date`.
    ///
    /// Rostered students always get a row; respondents missing from the
    /// roster are added under their response key. Rows are ordered by name.
    pub fn assemble(
        turma: Turma,
        date: NaiveDate,
        roster: &[StudentRecord],
        responses: &[LunchResponse],
    ) -> Self {
        let monday = week_start(date);
        let week = school_week(date);

        let mut rows: Vec<SheetRow> = roster
            .iter()
            .filter(|s| s.turma == turma)
            .map(|s| SheetRow {
                nome: s.nome.clone(),
                chave: s.matricula.clone(),
                dias: [None; 5],
            })
            .collect();

        let mut index: HashMap<String, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.chave.clone(), i))
            .collect();

        for r in responses.iter().filter(|r| r.turma == turma) {
            let Some(day) = Weekday::of(r.data_almoco).filter(|_| week.contains(&r.data_almoco))
            else {
                continue;
            };

            let i = match index.get(&r.chave) {
                Some(&i) => i,
                None => {
                    rows.push(SheetRow {
                        nome: r.nome.clone(),
                        chave: r.chave.clone(),
                        dias: [None; 5],
                    });
                    index.insert(r.chave.clone(), rows.len() - 1);
                    rows.len() - 1
                }
            };
            rows[i].dias[day.index()] = Some(r.intencao);
        }

        rows.sort_by(|a, b| {
            normalize(&a.nome)
                .cmp(&normalize(&b.nome))
                .then_with(|| a.chave.cmp(&b.chave))
        });

        Self {
            turma,
            monday,
            rows,
        }
    }

    pub fn load(store: &dyn Store, turma: Turma, date: NaiveDate) -> AppResult<Self> {
        let week = school_week(date);
        let roster = store.students_in(turma)?;
        let responses = store.responses_between(week[0], week[4])?;
        Ok(Self::assemble(turma, date, &roster, &responses))
    }

    /// `N, Nome, Seg, Ter, Qua, Qui, Sex`.
    pub fn to_table(&self) -> Table {
        let mut headers = vec!["N", "Nome"];
        headers.extend(Weekday::ALL.iter().map(|d| d.label()));

        let mut table = Table::new(self.turma.code(), &headers);
        for (i, row) in self.rows.iter().enumerate() {
            let mut cells = vec![Cell::from(i + 1), Cell::text(&row.nome)];
            cells.extend(row.dias.iter().map(|d| match d {
                Some(a) => Cell::text(a.as_str()),
                None => Cell::Empty,
            }));
            table.push(cells);
        }
        table
    }

    pub fn render(&self, format: SheetFormat) -> AppResult<Vec<u8>> {
        render_tables(&[self.to_table()], format, b';')
    }

    /// `planilha_<TURMA>_<monday>.<ext>`, spaces in the class code as `_`.
    pub fn file_name(&self, format: SheetFormat) -> String {
        format!(
            "planilha_{}_{}.{}",
            self.turma.code().replace(' ', "_"),
            self.monday.format("%Y-%m-%d"),
            format.extension()
        )
    }
}
