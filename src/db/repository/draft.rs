use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::DraftSubmission;

/// Append a draft form submission. Returns the new row id.
pub fn insert_draft_submission(
    conn: &Connection,
    draft: &DraftSubmission,
) -> Result<i64, DatabaseError> {
    let selected_tests = serde_json::to_string(&draft.selected_tests)?;
    conn.execute(
        "INSERT INTO form_submissions (patient_name, patient_age, patient_gender,
         patient_mobile, doctor_name, opd_no, sample_date, selected_tests, submission_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            draft.patient.name,
            draft.patient.age,
            draft.patient.gender,
            draft.patient.mobile,
            draft.patient.doctor,
            draft.patient.opd_no,
            draft.patient.sample_date,
            selected_tests,
            draft.submitted_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_draft_submissions(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM form_submissions", [], |row| row.get(0))?;
    Ok(count)
}

/// Selected test names of a stored draft.
pub fn get_draft_selected_tests(conn: &Connection, id: i64) -> Result<Vec<String>, DatabaseError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT selected_tests FROM form_submissions WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Err(DatabaseError::NotFound {
            entity_type: "form_submission".into(),
            id: id.to_string(),
        }),
    }
}
