use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::open_store;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        xlsx,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;

        if *xlsx {
            let path = BackupLogic::snapshot_xlsx(store.as_ref(), cfg)?;
            success(format!("XLSX snapshot written: {}", path.display()));
            return Ok(());
        }

        let dest = file
            .as_deref()
            .ok_or_else(|| AppError::Validation("--file is required".into()))?;
        BackupLogic::backup(store.as_ref(), cfg, dest, *compress, *force)?;
    }

    Ok(())
}
