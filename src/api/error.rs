//! API error types with structured JSON responses.
//!
//! Form and submission routes answer `{success: false, message}`;
//! artifact retrieval answers `{error}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::pipeline::artifact::ArtifactError;
use crate::pipeline::submission::SubmissionError;

#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ArtifactErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Artifact(err) => return artifact_response(err),
        };

        let body = FailureBody {
            success: false,
            message,
        };
        (status, Json(body)).into_response()
    }
}

fn artifact_response(err: ArtifactError) -> Response {
    let status = match &err {
        ArtifactError::InvalidFilename => StatusCode::BAD_REQUEST,
        ArtifactError::NotFound => StatusCode::NOT_FOUND,
        ArtifactError::Io(e) => {
            tracing::error!(error = %e, "Artifact read failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let error = match &err {
        ArtifactError::Io(_) => "Could not read file".to_string(),
        other => other.to_string(),
    };
    (status, Json(ArtifactErrorBody { error })).into_response()
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(message) => ApiError::BadRequest(message),
            SubmissionError::Artifact(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn json_of(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_message() {
        let response = ApiError::BadRequest("Missing name".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing name");
    }

    #[tokio::test]
    async fn internal_returns_500_and_hides_detail() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_of(response).await;
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn invalid_filename_returns_400_error_body() {
        let response = ApiError::from(ArtifactError::InvalidFilename).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"], "Invalid filename");
    }

    #[tokio::test]
    async fn missing_file_returns_404_error_body() {
        let response = ApiError::from(ArtifactError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_of(response).await;
        assert_eq!(json["error"], "File not found");
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let err: ApiError = SubmissionError::Validation("Missing mobile".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn record_not_found_maps_to_404() {
        let err: ApiError = DatabaseError::NotFound {
            entity_type: "CompletedReport".into(),
            id: "7".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(response).await["message"], "CompletedReport 7 not found");
    }
}
