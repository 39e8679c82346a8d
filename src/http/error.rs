//! Maps [`AppError`] onto HTTP status codes and a JSON error envelope.
//!
//! Client errors carry their message; everything else answers a generic
//! 500 and logs the cause.

use crate::errors::AppError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

/// Convenient result alias for HTTP handlers.
pub type HttpResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

fn code_for(err: &AppError) -> (StatusCode, &'static str) {
    match err {
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        AppError::Import(_) => (StatusCode::BAD_REQUEST, "invalid_file"),
        AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        code_for(self).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = code_for(self);

        let message = if self.is_client_error() {
            self.to_string()
        } else {
            error!(error = %self, "request failed");
            "Erro interno do servidor.".to_string()
        };

        HttpResponse::build(status).json(ErrorBody { code, message })
    }
}
