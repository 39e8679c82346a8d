//! Token-gated admin routes: summary, exports and roster import.

use crate::core::roster::RosterLogic;
use crate::core::summary::{Period, SummaryLogic};
use crate::errors::AppError;
use crate::export::csv::responses_csv;
use crate::export::quadro::{board_file_name, render_board};
use crate::export::{DateFilter, ExportLogic, SheetFormat, WeeklySheet};
use crate::http::auth::require_admin;
use crate::http::error::HttpResult;
use crate::http::{AppState, blocking};
use crate::models::Turma;
use crate::utils::date::{parse_or, today};
use crate::utils::non_blank;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::header, web};
use futures_util::TryStreamExt;
use serde::Deserialize;

/// Upload cap for roster files.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub token: Option<String>,
    pub data: Option<String>,
    pub periodo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub token: Option<String>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlanilhaQuery {
    pub token: Option<String>,
    pub turma: Option<String>,
    pub semana: Option<String>,
    pub formato: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

fn attachment(content_type: &str, file_name: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type.to_string())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(body)
}

/// `GET /admin`
pub async fn admin(
    state: web::Data<AppState>,
    query: web::Query<SummaryQuery>,
) -> HttpResult<HttpResponse> {
    let query = query.into_inner();
    require_admin(&state.config, query.token.as_deref())?;

    let date = parse_or(query.data.as_deref(), today());
    let period = Period::parse(query.periodo.as_deref());
    let store = state.store.clone();

    let summary = blocking(move || SummaryLogic::build(store.as_ref(), date, period)).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// `GET /export.csv`
pub async fn export_csv(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> HttpResult<HttpResponse> {
    let query = query.into_inner();
    require_admin(&state.config, query.token.as_deref())?;

    let filter = DateFilter::parse(query.data.as_deref(), today())?;
    let store = state.store.clone();

    let body = blocking(move || {
        let responses = ExportLogic::load_responses(store.as_ref(), filter)?;
        responses_csv(&responses)
    })
    .await?;

    Ok(attachment(
        SheetFormat::Csv.content_type(),
        &filter.file_name(),
        body,
    ))
}

/// `GET /admin/planilha`
pub async fn planilha(
    state: web::Data<AppState>,
    query: web::Query<PlanilhaQuery>,
) -> HttpResult<HttpResponse> {
    let query = query.into_inner();
    require_admin(&state.config, query.token.as_deref())?;

    let turma = match non_blank(query.turma.as_deref()) {
        None => Turma::ALL[0],
        Some(t) => Turma::parse(&t)
            .ok_or_else(|| AppError::Validation(format!("Turma inválida: {t}")))?,
    };
    let date = parse_or(query.semana.as_deref(), today());
    let format = SheetFormat::parse(query.formato.as_deref())?;
    let store = state.store.clone();

    let (name, body) = blocking(move || {
        let sheet = WeeklySheet::load(store.as_ref(), turma, date)?;
        Ok((sheet.file_name(format), sheet.render(format)?))
    })
    .await?;

    Ok(attachment(format.content_type(), &name, body))
}

async fn quadro(state: web::Data<AppState>, query: DateQuery, format: SheetFormat) -> HttpResult<HttpResponse> {
    require_admin(&state.config, query.token.as_deref())?;

    let date = parse_or(query.data.as_deref(), today());
    let store = state.store.clone();

    let (name, body) = blocking(move || {
        let board = SummaryLogic::board(store.as_ref(), date)?;
        Ok((board_file_name(&board, format), render_board(&board, format)?))
    })
    .await?;

    Ok(attachment(format.content_type(), &name, body))
}

/// `GET /export_quadro.csv`
pub async fn quadro_csv(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> HttpResult<HttpResponse> {
    quadro(state, query.into_inner(), SheetFormat::Csv).await
}

/// `GET /export_quadro.xlsx`
pub async fn quadro_xlsx(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> HttpResult<HttpResponse> {
    quadro(state, query.into_inner(), SheetFormat::Xlsx).await
}

/// `POST /admin/importar_alunos` (multipart, file field `arquivo_csv`).
///
/// The token may come in the query string or as a `token` form field.
pub async fn importar_alunos(
    state: web::Data<AppState>,
    query: web::Query<TokenQuery>,
    mut payload: Multipart,
) -> HttpResult<HttpResponse> {
    let mut token = query.into_inner().token;
    let mut file: Option<Vec<u8>> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::Validation("Arquivo muito grande.".into()));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "token" if token.is_none() => token = Some(String::from_utf8_lossy(&data).trim().to_string()),
            "arquivo_csv" => file = Some(data),
            _ => {}
        }
    }

    require_admin(&state.config, token.as_deref())?;

    let bytes = file
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("Selecione um arquivo CSV.".into()))?;

    let store = state.store.clone();
    let config = state.config.clone();
    let report = blocking(move || RosterLogic::import_bytes(store.as_ref(), &config, &bytes)).await?;

    Ok(HttpResponse::Ok().json(report))
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Envio inválido: {e}"))
}
