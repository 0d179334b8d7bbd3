use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;
use gazette_infra::db;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub modules: HealthModules,
}

#[derive(Debug, Serialize)]
pub struct HealthModules {
    pub database: ModuleStatus,
    pub sessions: ModuleStatus,
}

#[derive(Debug, Serialize)]
pub struct ModuleStatus {
    pub enabled: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = db::ping(&state.db).await.is_ok();
    let sessions_ready = state
        .config
        .session_secret
        .as_ref()
        .is_some_and(|value| !value.is_empty());

    Json(HealthResponse {
        status: "ok",
        modules: HealthModules {
            database: ModuleStatus {
                enabled: database_ok,
            },
            sessions: ModuleStatus {
                enabled: sessions_ready,
            },
        },
    })
}
