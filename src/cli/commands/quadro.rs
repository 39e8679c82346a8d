use crate::cli::commands::planilha::parse_week;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::open_store;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Quadro {
        week,
        format,
        file,
        force,
    } = cmd
    {
        let date = parse_week(week.as_deref())?;
        let store = open_store(cfg)?;
        ExportLogic::export_quadro(store.as_ref(), date, *format, file, *force)?;
    }
    Ok(())
}
