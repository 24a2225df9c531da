use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::api::StatusResponse;
use crate::config::Config;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub api_token: Arc<str>,
    pub base_path: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<Database>, cfg: &Config) -> Self {
        AppState {
            db,
            api_token: Arc::from(cfg.app.get_api_token()),
            base_path: Arc::from(cfg.app.get_base_path()),
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse::new("ok"))
}
