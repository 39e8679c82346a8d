//! Student-facing routes.

use crate::core::submit::{SubmissionForm, SubmitLogic, WeekSubmissionForm};
use crate::http::error::HttpResult;
use crate::http::{AppState, blocking};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub matricula: Option<String>,
}

/// `GET /aluno?matricula=`: roster auto-fill.
pub async fn aluno(
    state: web::Data<AppState>,
    query: web::Query<StudentQuery>,
) -> HttpResult<HttpResponse> {
    let store = state.store.clone();
    let matricula = query.into_inner().matricula;

    let student = blocking(move || SubmitLogic::lookup_student(store.as_ref(), matricula.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "nome": student.nome,
        "matricula": student.matricula,
        "turma": student.turma,
    })))
}

/// `POST /enviar`
pub async fn enviar(
    state: web::Data<AppState>,
    form: web::Form<SubmissionForm>,
) -> HttpResult<HttpResponse> {
    let store = state.store.clone();
    let config = state.config.clone();
    let form = form.into_inner();

    let stored = blocking(move || SubmitLogic::submit(store.as_ref(), &config, &form)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "mensagem": format!("Resposta registrada: {} em {}.", stored.intencao, stored.data_almoco),
        "resposta": stored,
    })))
}

/// `POST /enviar_semana`. Read as raw pairs: checkboxes post `dias` once
/// per checked day.
pub async fn enviar_semana(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> HttpResult<HttpResponse> {
    let store = state.store.clone();
    let config = state.config.clone();
    let form = WeekSubmissionForm::from_pairs(form.into_inner());

    let stored = blocking(move || SubmitLogic::submit_week(store.as_ref(), &config, &form)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "mensagem": "Respostas da semana registradas.",
        "respostas": stored,
    })))
}
