use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::http::run_server;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(h) = host {
            cfg.host = h.clone();
        }
        if let Some(p) = port {
            cfg.port = *p;
        }
        run_server(cfg)?;
    }
    Ok(())
}
