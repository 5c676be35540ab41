use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::DeliveryStatus;
use super::patient::{PatientRecord, TestResults};

/// Test selection captured before results are filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSubmission {
    pub patient: PatientRecord,
    pub selected_tests: Vec<String>,
    pub submitted_at: NaiveDateTime,
}

/// Row to append to `completed_reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompletedReport {
    pub patient: PatientRecord,
    pub test_results: TestResults,
    pub artifact_path: String,
    pub delivery_status: DeliveryStatus,
    /// Dispatcher message: success detail or failure reason.
    pub delivery_message: String,
    pub created_at: NaiveDateTime,
}

/// A stored completed report. Never updated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedReport {
    pub id: i64,
    pub patient: PatientRecord,
    pub test_results: TestResults,
    pub artifact_path: String,
    pub delivery_status: DeliveryStatus,
    pub delivery_message: String,
    pub created_at: NaiveDateTime,
}
