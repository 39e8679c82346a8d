use super::turma::Turma;
use crate::utils::collapse_whitespace;
use serde::Serialize;

/// Roster entry ⇔ `alunos` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub matricula: String,     // ⇔ alunos.matricula (PK)
    pub nome: String,          // ⇔ alunos.nome
    pub turma: Turma,          // ⇔ alunos.turma
    pub atualizado_em: String, // ⇔ alunos.atualizado_em ("YYYY-MM-DD HH:MM:SS")
}

/// Identity a response is keyed by, together with its date.
///
/// A registration number wins when present. Without one the key falls back
/// to class + name, which collides for namesakes in the same class; the
/// `require_matricula` setting disables that fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StudentKey {
    Registration(String),
    NameClass { turma: Turma, nome: String },
}

impl StudentKey {
    const AUTO_PREFIX: &'static str = "AUTO::";

    pub fn new(matricula: Option<&str>, turma: Turma, nome: &str) -> Self {
        match matricula.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => StudentKey::Registration(m.to_string()),
            None => StudentKey::NameClass {
                turma,
                nome: collapse_whitespace(nome).to_uppercase(),
            },
        }
    }

    /// Value stored in `respostas.chave`.
    pub fn to_db_string(&self) -> String {
        match self {
            StudentKey::Registration(m) => m.clone(),
            StudentKey::NameClass { turma, nome } => {
                format!("{}{}::{}", Self::AUTO_PREFIX, turma.code(), nome)
            }
        }
    }

    pub fn matricula(&self) -> Option<&str> {
        match self {
            StudentKey::Registration(m) => Some(m),
            StudentKey::NameClass { .. } => None,
        }
    }
}
