use crate::utils::normalize;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lunch attendance answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Sim,
    Nao,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Sim => "SIM",
            Answer::Nao => "NAO",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SIM" => Some(Answer::Sim),
            "NAO" => Some(Answer::Nao),
            _ => None,
        }
    }

    /// Form input: case-insensitive, `NÃO` accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "sim" => Some(Answer::Sim),
            "nao" => Some(Answer::Nao),
            _ => None,
        }
    }

    pub fn is_sim(&self) -> bool {
        matches!(self, Answer::Sim)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
