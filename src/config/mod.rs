//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then an optional YAML file
//! (`ALMOCO_CONFIG`, or `<data_dir>/almoco.yml` when present), then
//! environment variables. The CLI `--db` flag is applied last by the caller.

use crate::db::pg_store::redact_url;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "almoco.yml";
pub const DATABASE_FILE_NAME: &str = "almoco.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Explicit SQLite file; `<data_dir>/almoco.db` when unset.
    pub database: Option<PathBuf>,
    /// PostgreSQL connection string; selects the PostgreSQL backend when non-empty.
    pub database_url: Option<String>,
    pub admin_token: String,
    pub host: String,
    pub port: u16,
    pub require_matricula: bool,
    pub max_backups: usize,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database: None,
            database_url: None,
            admin_token: "ifc-sbs".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            require_matricula: false,
            max_backups: 30,
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let explicit_file = var("ALMOCO_CONFIG").map(PathBuf::from);
        let data_dir = var("ALMOCO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| Config::default().data_dir);

        let mut cfg = match explicit_file {
            Some(path) => Self::from_file(&path)?,
            None => {
                let implicit = data_dir.join(CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::from_file(&implicit)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(dir) = var("ALMOCO_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("DATABASE_URL") {
            cfg.database_url = Some(url);
        }
        if let Some(token) = var("ALMOCO_ADMIN_TOKEN") {
            cfg.admin_token = token;
        }
        if let Some(host) = var("HOST") {
            cfg.host = host;
        }
        if let Some(port) = var("PORT") {
            cfg.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("invalid PORT '{port}'")))?;
        }
        if let Some(flag) = var("ALMOCO_REQUIRE_MATRICULA") {
            cfg.require_matricula = parse_flag(&flag);
        }
        if let Some(max) = var("ALMOCO_MAX_BACKUPS") {
            cfg.max_backups = max
                .parse()
                .map_err(|_| AppError::Config(format!("invalid ALMOCO_MAX_BACKUPS '{max}'")))?;
        }
        if let Some(flag) = var("ALMOCO_LOG_JSON") {
            cfg.log_json = parse_flag(&flag);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Write this configuration as YAML, unless the file already exists.
    /// Returns `true` when a file was written.
    pub fn write_if_missing(&self, path: &Path) -> AppResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("cannot serialize configuration: {e}")))?;
        fs::write(path, yaml)?;
        Ok(true)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    /// Full path of the SQLite database.
    pub fn database_file(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    pub fn uses_postgres(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Copy safe to print: token masked, database password hidden.
    pub fn redacted(&self) -> Self {
        Self {
            admin_token: "*".repeat(self.admin_token.chars().count().min(8)),
            database_url: self.database_url.as_deref().map(redact_url),
            ..self.clone()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "sim" | "on"
    )
}
