use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// School days, Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Seg,
    Ter,
    Qua,
    Qui,
    Sex,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Seg,
        Weekday::Ter,
        Weekday::Qua,
        Weekday::Qui,
        Weekday::Sex,
    ];

    /// Lowercase form code (`seg`).
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Seg => "seg",
            Weekday::Ter => "ter",
            Weekday::Qua => "qua",
            Weekday::Qui => "qui",
            Weekday::Sex => "sex",
        }
    }

    /// Spreadsheet column header (`Seg`).
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Seg => "Seg",
            Weekday::Ter => "Ter",
            Weekday::Qua => "Qua",
            Weekday::Qui => "Qui",
            Weekday::Sex => "Sex",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Weekday::Seg => 0,
            Weekday::Ter => 1,
            Weekday::Qua => 2,
            Weekday::Qui => 3,
            Weekday::Sex => 4,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// School day of `date`, `None` on weekends.
    pub fn of(date: NaiveDate) -> Option<Self> {
        Self::ALL
            .get(date.weekday().num_days_from_monday() as usize)
            .copied()
    }

    /// Date of this weekday in the week starting at `monday`.
    pub fn date_from(&self, monday: NaiveDate) -> NaiveDate {
        monday + Duration::days(self.index() as i64)
    }
}
