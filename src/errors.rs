//! Unified application error type.
//! All modules (db, core, export, http, cli) return AppError so the HTTP
//! layer and the CLI can map failures in one place.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Integrity check failed: {0}")]
    Integrity(String),

    // ---------------------------
    // Stored data that no longer parses
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid class stored: {0}")]
    InvalidTurma(String),

    #[error("Invalid answer stored: {0}")]
    InvalidAnswer(String),

    // ---------------------------
    // Request errors
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: invalid admin token")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Import(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Unauthorized
                | AppError::NotFound(_)
                | AppError::Import(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
