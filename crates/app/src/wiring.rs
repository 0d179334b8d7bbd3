use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::state::AppState;
use gazette_infra::db;
use gazette_infra::db::DbPoolError;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("db pool error: {0}")]
    Db(#[from] DbPoolError),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let db = db::connect_lazy(&config.database_url)?;
    Ok(AppState {
        config: Arc::new(config),
        db,
    })
}
