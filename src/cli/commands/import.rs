use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::roster::RosterLogic;
use crate::db::open_store;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let store = open_store(cfg)?;
        let report = RosterLogic::import_file(store.as_ref(), cfg, file)?;

        success(format!("{} students imported from {}", report.importados, file.display()));

        if !report.erros.is_empty() {
            warning(format!("{} rows rejected:", report.erros.len()));
            for e in &report.erros {
                let matricula = if e.matricula.is_empty() { "-" } else { e.matricula.as_str() };
                println!("  line {:>4}  {:<12} {}", e.linha, matricula, e.motivo);
            }
        }
    }
    Ok(())
}
