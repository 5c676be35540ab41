//! Report endpoints.
//!
//! `POST /submit-report`    : run a submission through the pipeline.
//! `GET /view-pdf/:filename`: serve a stored report.
//! `GET /api/reports`       : recent completed reports.
//! `GET /api/reports/:id`   : one completed report.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::CompletedReport;
use crate::pipeline::artifact::ServeAs;
use crate::pipeline::submission::{SubmissionRequest, SubmissionResponse};

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 100;

/// `POST /submit-report`
///
/// The pipeline shells out to converters and calls the provider with a
/// blocking client, so it runs on the blocking pool.
pub async fn submit(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::BadRequest("Content-Type must be application/json".into())
        }
        other => ApiError::BadRequest(other.body_text()),
    })?;

    let core = ctx.core.clone();
    let response =
        tokio::task::spawn_blocking(move || core.orchestrator().submit(&request)).await??;
    Ok(Json(response))
}

/// `GET /view-pdf/:filename`
pub async fn view_pdf(
    State(ctx): State<ApiContext>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = ctx.core.artifacts.resolve(&filename)?;
    let bytes = tokio::fs::read(&artifact.path)
        .await
        .map_err(crate::pipeline::artifact::ArtifactError::from)?;

    let response = match artifact.serve_as {
        ServeAs::Pdf => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition("inline", &artifact.filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        ServeAs::Html => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
            bytes,
        )
            .into_response(),
        ServeAs::Attachment => {
            let mime = mime_guess::from_path(&artifact.path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        content_disposition("attachment", &artifact.filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
    };
    Ok(response)
}

/// Non-ASCII names get an RFC 6266 `filename*` with an ASCII fallback.
fn content_disposition(kind: &str, filename: &str) -> String {
    if filename.is_ascii() {
        return format!("{kind}; filename=\"{filename}\"");
    }
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "{kind}; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(filename, NON_ALPHANUMERIC)
    )
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<CompletedReport>,
    pub total: i64,
}

/// `GET /api/reports?limit=N`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let conn = ctx.core.open_db()?;
    let reports = db::list_completed_reports(&conn, limit)?;
    let total = db::count_completed_reports(&conn)?;
    Ok(Json(ReportListResponse { reports, total }))
}

/// `GET /api/reports/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<CompletedReport>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(db::get_completed_report(&conn, id)?))
}
