use crate::utils::{collapse_whitespace, normalize};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// The nine classes that may answer the lunch form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turma {
    TinI,   // TIN I
    TinII,  // TIN II
    TinIII, // TIN III
    TaiI,   // TAI I
    TaiII,  // TAI II
    TaiIII, // TAI III
    TstI,   // TST I
    TstII,  // TST II
    TstIII, // TST III
}

impl Turma {
    /// Form order.
    pub const ALL: [Turma; 9] = [
        Turma::TinI,
        Turma::TinII,
        Turma::TinIII,
        Turma::TaiI,
        Turma::TaiII,
        Turma::TaiIII,
        Turma::TstI,
        Turma::TstII,
        Turma::TstIII,
    ];

    /// Order used by the kitchen's weekly board.
    pub const BOARD_ORDER: [Turma; 9] = [
        Turma::TaiI,
        Turma::TaiII,
        Turma::TaiIII,
        Turma::TinI,
        Turma::TinII,
        Turma::TinIII,
        Turma::TstI,
        Turma::TstII,
        Turma::TstIII,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Turma::TinI => "TIN I",
            Turma::TinII => "TIN II",
            Turma::TinIII => "TIN III",
            Turma::TaiI => "TAI I",
            Turma::TaiII => "TAI II",
            Turma::TaiIII => "TAI III",
            Turma::TstI => "TST I",
            Turma::TstII => "TST II",
            Turma::TstIII => "TST III",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Turma::TinI => "TÉCNICO EM INFORMÁTICA – 1",
            Turma::TinII => "TÉCNICO EM INFORMÁTICA – 2",
            Turma::TinIII => "TÉCNICO EM INFORMÁTICA – 3",
            Turma::TaiI => "TÉCNICO EM AUTOMAÇÃO INDUSTRIAL – 1",
            Turma::TaiII => "TÉCNICO EM AUTOMAÇÃO INDUSTRIAL – 2",
            Turma::TaiIII => "TÉCNICO EM AUTOMAÇÃO INDUSTRIAL – 3",
            Turma::TstI => "TÉCNICO EM SEGURANÇA DO TRABALHO – 1",
            Turma::TstII => "TÉCNICO EM SEGURANÇA DO TRABALHO – 2",
            Turma::TstIII => "TÉCNICO EM SEGURANÇA DO TRABALHO – 3",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum (exact code only)
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == s)
    }

    /// Code as picked on the form; case and inner spacing are ignored.
    pub fn from_code(input: &str) -> Option<Self> {
        let wanted = collapse_whitespace(input);
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(&wanted))
    }

    /// Lenient parser for user-supplied text.
    ///
    /// Accepts the code (`tin ii`), the long label, or free text naming the
    /// course and the series (`Informática 2`, `TIN 2`).
    pub fn parse(input: &str) -> Option<Self> {
        let wanted = normalize(input);
        if wanted.is_empty() {
            return None;
        }

        if let Some(t) = Self::ALL
            .into_iter()
            .find(|t| normalize(t.code()) == wanted || normalize(t.label()) == wanted)
        {
            return Some(t);
        }

        let series = series_digit(&wanted)?;
        let course = if wanted.contains("informatica") || wanted.starts_with("tin") {
            [Turma::TinI, Turma::TinII, Turma::TinIII]
        } else if wanted.contains("automacao") || wanted.starts_with("tai") {
            [Turma::TaiI, Turma::TaiII, Turma::TaiIII]
        } else if (wanted.contains("seguranca") && wanted.contains("trabalho"))
            || wanted.starts_with("tst")
        {
            [Turma::TstI, Turma::TstII, Turma::TstIII]
        } else {
            return None;
        };

        Some(course[series - 1])
    }
}

/// First standalone series digit 1..=3 in an already normalised string.
fn series_digit(normalized: &str) -> Option<usize> {
    static SERIES: OnceLock<Option<Regex>> = OnceLock::new();
    let re = SERIES
        .get_or_init(|| Regex::new(r"(?:^|[^0-9])([123])(?:[^0-9]|$)").ok())
        .as_ref()?;

    re.captures(normalized)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

impl fmt::Display for Turma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Turma {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
