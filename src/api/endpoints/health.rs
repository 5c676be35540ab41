use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub export_strategies: Vec<&'static str>,
    pub delivery_strategies: Vec<&'static str>,
    pub reports_dir: String,
    pub completed_reports: i64,
    pub draft_submissions: i64,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let conn = ctx.core.open_db()?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        export_strategies: ctx.core.exporter.strategy_names(),
        delivery_strategies: ctx.core.dispatcher.strategy_names(),
        reports_dir: ctx.core.artifacts.root().display().to_string(),
        completed_reports: db::count_completed_reports(&conn)?,
        draft_submissions: db::count_draft_submissions(&conn)?,
    }))
}
