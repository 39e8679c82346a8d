use crate::config::Config;
use crate::errors::{AppError, AppResult};
use tracing::warn;

/// Shared-secret gate for the admin endpoints.
pub fn require_admin(cfg: &Config, token: Option<&str>) -> AppResult<()> {
    match token {
        Some(t) if !cfg.admin_token.is_empty() && t == cfg.admin_token => Ok(()),
        _ => {
            warn!("admin request rejected: invalid token");
            Err(AppError::Unauthorized)
        }
    }
}
