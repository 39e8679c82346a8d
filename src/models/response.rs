use super::{answer::Answer, student::StudentKey, turma::Turma};
use chrono::NaiveDate;
use serde::Serialize;

/// Stored lunch answer ⇔ `respostas` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunchResponse {
    pub id: i64,
    pub chave: String,             // ⇔ respostas.chave (UNIQUE with data_almoco)
    pub nome: String,              // ⇔ respostas.nome
    pub matricula: Option<String>, // ⇔ respostas.matricula (NULL when keyed by name)
    pub turma: Turma,              // ⇔ respostas.turma
    pub data_almoco: NaiveDate,    // ⇔ respostas.data_almoco ("YYYY-MM-DD")
    pub intencao: Answer,          // ⇔ respostas.intencao ('SIM' | 'NAO')
    pub criado_em: String,         // ⇔ respostas.criado_em
}

/// Row to insert or overwrite for its (chave, data_almoco) pair.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub chave: String,
    pub nome: String,
    pub matricula: Option<String>,
    pub turma: Turma,
    pub data_almoco: NaiveDate,
    pub intencao: Answer,
    pub criado_em: String,
}

impl NewResponse {
    pub fn new(
        key: &StudentKey,
        nome: &str,
        turma: Turma,
        data_almoco: NaiveDate,
        intencao: Answer,
        criado_em: &str,
    ) -> Self {
        Self {
            chave: key.to_db_string(),
            nome: nome.to_string(),
            matricula: key.matricula().map(str::to_string),
            turma,
            data_almoco,
            intencao,
            criado_em: criado_em.to_string(),
        }
    }

    pub fn date_str(&self) -> String {
        self.data_almoco.format("%Y-%m-%d").to_string()
    }
}

impl From<&LunchResponse> for NewResponse {
    fn from(r: &LunchResponse) -> Self {
        Self {
            chave: r.chave.clone(),
            nome: r.nome.clone(),
            matricula: r.matricula.clone(),
            turma: r.turma,
            data_almoco: r.data_almoco,
            intencao: r.intencao,
            criado_em: r.criado_em.clone(),
        }
    }
}
