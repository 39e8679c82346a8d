use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd
        && *print_config
    {
        let yaml = serde_yaml::to_string(&cfg.redacted())
            .map_err(|e| AppError::Config(format!("cannot serialize configuration: {e}")))?;

        println!("📄 Current configuration:\n");
        println!("{yaml}");
        println!("SQLite file: {}", cfg.database_file().display());
    }

    Ok(())
}
