//! Submission orchestrator.
//!
//! One submission runs synchronously through
//! validate → render → export → persist → notify → record → respond.
//! Only validation and artifact persistence can fail the request;
//! export, delivery and record-keeping problems degrade and are logged.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::artifact::{ArtifactError, ArtifactStore, StoredArtifact};
use super::export::DocumentExporter;
use super::notify::{DeliveryOutcome, NotificationDispatcher};
use super::render::render_report;
use crate::catalog::TestCatalog;
use crate::db;
use crate::models::{
    deserialize_test_results, ArtifactKind, DeliveryStatus, NewCompletedReport, PatientRecord,
    TestResults,
};

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not save report: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Body of `POST /submit-report`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub patient_data: PatientRecord,
    #[serde(default, deserialize_with = "deserialize_test_results")]
    pub test_results: TestResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub whatsapp_status: DeliveryStatus,
    pub whatsapp_message: String,
    pub pdf_path: String,
    pub pdf_url: String,
}

/// Borrowed view over the shared pipeline components.
pub struct SubmissionOrchestrator<'a> {
    pub catalog: &'a TestCatalog,
    pub exporter: &'a DocumentExporter,
    pub dispatcher: &'a NotificationDispatcher,
    pub artifacts: &'a ArtifactStore,
    pub database_path: &'a Path,
    pub public_base_url: &'a str,
}

impl SubmissionOrchestrator<'_> {
    pub fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResponse, SubmissionError> {
        self.submit_at(request, chrono::Local::now().naive_local())
    }

    /// Run the pipeline with `now` as the report and filename timestamp.
    pub fn submit_at(
        &self,
        request: &SubmissionRequest,
        now: NaiveDateTime,
    ) -> Result<SubmissionResponse, SubmissionError> {
        let submission_id = Uuid::new_v4();
        let _span = tracing::info_span!("submission", submission_id = %submission_id).entered();

        validate(request)?;
        let patient = &request.patient_data;
        tracing::info!(results = request.test_results.len(), "Submission validated");

        let html = render_report(patient, &request.test_results, self.catalog, now);
        let artifact = self.persist(patient, &html, now)?;
        let report_url = self.report_url(&artifact.filename);

        let delivery = self.dispatcher.notify(&patient.mobile, patient, &report_url);
        self.record(patient, &request.test_results, &artifact, &delivery, now);

        let message = match artifact.kind {
            ArtifactKind::Pdf => "Report submitted",
            ArtifactKind::Html => "Report submitted (HTML)",
        };
        Ok(SubmissionResponse {
            success: true,
            message: message.to_string(),
            whatsapp_status: DeliveryStatus::from_delivered(delivery.delivered),
            whatsapp_message: delivery.message,
            pdf_path: artifact.path.display().to_string(),
            pdf_url: report_url,
        })
    }

    /// `<public_base_url>/view-pdf/<filename>`
    /// Public link to a stored artifact; non-ASCII filenames are percent-encoded.
    pub fn report_url(&self, filename: &str) -> String {
        let raw = format!("{}/view-pdf/{filename}", self.public_base_url.trim_end_matches('/'));
        match reqwest::Url::parse(&raw) {
            Ok(url) => url.into(),
            Err(_) => raw,
        }
    }

    /// Export and write the artifact. A PDF that cannot be produced or
    /// written falls back to the HTML itself.
    fn persist(
        &self,
        patient: &PatientRecord,
        html: &str,
        now: NaiveDateTime,
    ) -> Result<StoredArtifact, SubmissionError> {
        if let Some(pdf) = self.exporter.export(html).into_bytes() {
            match self.artifacts.write(&patient.name, ArtifactKind::Pdf, &pdf, now) {
                Ok(artifact) => return Ok(artifact),
                Err(e) => {
                    tracing::warn!(error = %e, "Writing PDF artifact failed, trying HTML");
                }
            }
        }

        self.artifacts
            .write(&patient.name, ArtifactKind::Html, html.as_bytes(), now)
            .map_err(|e| {
                tracing::error!(error = %e, "Writing HTML artifact failed");
                SubmissionError::Artifact(e)
            })
    }

    /// Best effort: a store failure is logged and the submission still succeeds.
    fn record(
        &self,
        patient: &PatientRecord,
        results: &TestResults,
        artifact: &StoredArtifact,
        delivery: &DeliveryOutcome,
        now: NaiveDateTime,
    ) {
        let report = NewCompletedReport {
            patient: patient.clone(),
            test_results: results.clone(),
            artifact_path: artifact.path.display().to_string(),
            delivery_status: DeliveryStatus::from_delivered(delivery.delivered),
            delivery_message: delivery.message.clone(),
            created_at: now,
        };

        let stored = db::open_database(self.database_path)
            .and_then(|conn| db::insert_completed_report(&conn, &report));
        match stored {
            Ok(id) => tracing::info!(
                report_id = id,
                status = %report.delivery_status,
                "Completed report recorded"
            ),
            Err(e) => tracing::error!(error = %e, "Failed to record completed report"),
        }
    }
}

fn validate(request: &SubmissionRequest) -> Result<(), SubmissionError> {
    if let Some(field) = request.patient_data.missing_required_field() {
        return Err(SubmissionError::Validation(format!("Missing {field}")));
    }
    if request.test_results.is_empty() {
        return Err(SubmissionError::Validation("No test results provided".into()));
    }
    Ok(())
}
