use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{CompletedReport, DeliveryStatus, PatientRecord, TestResults};

const REPORT_COLUMNS: &str = "id, patient_name, patient_age, patient_gender, patient_mobile,
     doctor_name, opd_no, sample_date, test_results, pdf_path, whatsapp_status,
     whatsapp_error, report_date";

/// Append a completed report. Returns the new row id.
pub fn insert_completed_report(
    conn: &Connection,
    report: &crate::models::NewCompletedReport,
) -> Result<i64, DatabaseError> {
    let test_results = serde_json::to_string(&report.test_results)?;
    conn.execute(
        "INSERT INTO completed_reports (patient_name, patient_age, patient_gender,
         patient_mobile, doctor_name, opd_no, sample_date, test_results, pdf_path,
         whatsapp_status, whatsapp_error, report_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            report.patient.name,
            report.patient.age,
            report.patient.gender,
            report.patient.mobile,
            report.patient.doctor,
            report.patient.opd_no,
            report.patient.sample_date,
            test_results,
            report.artifact_path,
            report.delivery_status.as_str(),
            report.delivery_message,
            report.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent reports first.
pub fn list_completed_reports(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<CompletedReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM completed_reports
         ORDER BY report_date DESC, id DESC LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit], |row| Ok(report_row_from_rusqlite(row)))?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row??)?);
    }
    Ok(reports)
}

pub fn get_completed_report(conn: &Connection, id: i64) -> Result<CompletedReport, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM completed_reports WHERE id = ?1"
    ))?;

    let mut rows = stmt.query_map(params![id], |row| Ok(report_row_from_rusqlite(row)))?;
    match rows.next() {
        Some(row) => report_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "completed_report".into(),
            id: id.to_string(),
        }),
    }
}

pub fn count_completed_reports(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM completed_reports", [], |row| row.get(0))?;
    Ok(count)
}

// Internal row type for CompletedReport mapping
struct ReportRow {
    id: i64,
    patient: PatientRecord,
    test_results: String,
    artifact_path: String,
    delivery_status: String,
    delivery_message: String,
    created_at: NaiveDateTime,
}

fn report_row_from_rusqlite(row: &rusqlite::Row) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        id: row.get(0)?,
        patient: PatientRecord {
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            mobile: row.get(4)?,
            doctor: row.get(5)?,
            opd_no: row.get(6)?,
            sample_date: row.get(7)?,
        },
        test_results: row.get(8)?,
        artifact_path: row.get(9)?,
        delivery_status: row.get(10)?,
        delivery_message: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<CompletedReport, DatabaseError> {
    let test_results: TestResults = serde_json::from_str(&row.test_results)?;
    Ok(CompletedReport {
        id: row.id,
        patient: row.patient,
        test_results,
        artifact_path: row.artifact_path,
        delivery_status: DeliveryStatus::from_str(&row.delivery_status)?,
        delivery_message: row.delivery_message,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::open_memory_database;
    use crate::models::NewCompletedReport;

    fn report(name: &str, minute: u32, status: DeliveryStatus) -> NewCompletedReport {
        let mut results = TestResults::new();
        results.insert("HbA1c".into(), "7.1 High".into());
        results.insert("Urea".into(), "30".into());
        NewCompletedReport {
            patient: PatientRecord {
                name: name.into(),
                age: "50".into(),
                gender: "Male".into(),
                mobile: "919876543210".into(),
                ..Default::default()
            },
            test_results: results,
            artifact_path: format!("reports/{name}.pdf"),
            delivery_status: status,
            delivery_message: "WhatsApp Web opened - please send manually".into(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
        }
    }

    #[test]
    fn insert_then_get_preserves_fields() {
        let conn = open_memory_database().unwrap();
        let id = insert_completed_report(&conn, &report("Kiran", 0, DeliveryStatus::Sent)).unwrap();
        let stored = get_completed_report(&conn, id).unwrap();
        assert_eq!(stored.patient.name, "Kiran");
        assert_eq!(stored.test_results["HbA1c"], "7.1 High");
        assert_eq!(stored.delivery_status, DeliveryStatus::Sent);
        assert_eq!(stored.artifact_path, "reports/Kiran.pdf");
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let conn = open_memory_database().unwrap();
        insert_completed_report(&conn, &report("First", 1, DeliveryStatus::Sent)).unwrap();
        insert_completed_report(&conn, &report("Second", 2, DeliveryStatus::Failed)).unwrap();
        insert_completed_report(&conn, &report("Third", 3, DeliveryStatus::Sent)).unwrap();

        let listed = list_completed_reports(&conn, 2).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].patient.name, "Third");
        assert_eq!(listed[1].patient.name, "Second");
        assert_eq!(listed[1].delivery_status, DeliveryStatus::Failed);
    }

    #[test]
    fn missing_report_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = get_completed_report(&conn, 7).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn count_tracks_inserts() {
        let conn = open_memory_database().unwrap();
        insert_completed_report(&conn, &report("A", 0, DeliveryStatus::Sent)).unwrap();
        assert_eq!(count_completed_reports(&conn).unwrap(), 1);
    }
}
