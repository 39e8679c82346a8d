//! actix-web surface: routes, shared state and the server entry point.

pub mod admin;
pub mod auth;
pub mod error;
pub mod public;

use crate::config::Config;
use crate::db::{Store, open_store};
use crate::errors::{AppError, AppResult};
use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;
use tracing::info;

/// Shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Run blocking store work off the async workers.
pub(crate) async fn blocking<F, T>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    match web::block(f).await {
        Ok(result) => result,
        Err(e) => Err(AppError::Other(format!("blocking task failed: {e}"))),
    }
}

/// Route table, shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Formulário inválido: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Parâmetros inválidos: {err}")).into()
    }))
    .route("/", web::get().to(public::index))
    .route("/health", web::get().to(public::health))
    .route("/aluno", web::get().to(public::aluno))
    .route("/enviar", web::post().to(public::enviar))
    .route("/enviar_semana", web::post().to(public::enviar_semana))
    .route("/admin", web::get().to(admin::admin))
    .route("/admin/planilha", web::get().to(admin::planilha))
    .route("/admin/importar_alunos", web::post().to(admin::importar_alunos))
    .route("/export.csv", web::get().to(admin::export_csv))
    .route("/export_quadro.csv", web::get().to(admin::quadro_csv))
    .route("/export_quadro.xlsx", web::get().to(admin::quadro_xlsx));
}

/// Open the configured store and serve until interrupted.
pub fn run_server(config: Config) -> AppResult<()> {
    let store = open_store(&config)?;
    let state = web::Data::new(AppState::new(store.clone(), config.clone()));
    let (host, port) = config.bind_address();

    info!(
        backend = %store.backend(),
        location = %store.location(),
        %host,
        port,
        "starting almoco server"
    );

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(middleware::Logger::default())
                .configure(configure)
        })
        .bind((host.as_str(), port))?
        .run()
        .await
    })?;

    Ok(())
}
