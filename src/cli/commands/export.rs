use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::open_store;
use crate::errors::AppResult;
use crate::export::{DateFilter, ExportLogic};
use crate::utils::date::today;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { file, date, force } = cmd {
        let filter = DateFilter::parse(date.as_deref(), today())?;
        let store = open_store(cfg)?;
        ExportLogic::export_responses(store.as_ref(), file, filter, *force)?;
    }
    Ok(())
}
