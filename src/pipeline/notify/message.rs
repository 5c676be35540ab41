use chrono::NaiveDateTime;

use crate::config::ORGANIZATION_NAME;
use crate::models::PatientRecord;

/// Display format of the "Generated on" line.
pub const MESSAGE_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %I:%M %p";

/// Text body sent to the patient.
pub fn compose_message(
    patient: &PatientRecord,
    report_url: &str,
    generated_at: NaiveDateTime,
) -> String {
    let greeting = if patient.name.trim().is_empty() {
        "Patient"
    } else {
        patient.name.as_str()
    };

    format!(
        "\u{1F52C} {ORGANIZATION_NAME} - PATHOLOGY REPORT\n\
         \n\
         Dear {greeting},\n\
         \n\
         Your pathology test report is ready.\n\
         \n\
         Patient: {name}\n\
         Age/Gender: {age}/{gender}\n\
         Doctor: {doctor}\n\
         \n\
         View report: {report_url}\n\
         \n\
         Generated on: {stamp}\n",
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        doctor = patient.doctor,
        stamp = generated_at.format(MESSAGE_TIMESTAMP_FORMAT),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(16, 7, 0)
            .unwrap()
    }

    #[test]
    fn message_has_identity_link_and_timestamp() {
        let patient = PatientRecord {
            name: "Asha Verma".into(),
            age: "42".into(),
            gender: "Female".into(),
            doctor: "Dr. Rao".into(),
            ..Default::default()
        };
        let msg = compose_message(&patient, "http://localhost:5000/view-pdf/a.pdf", at());
        assert!(msg.starts_with(
            "\u{1F52C} UJJIVAN HOSPITAL - PATHOLOGY REPORT\n\nDear Asha Verma,\n"
        ));
        assert!(msg.contains("Age/Gender: 42/Female\n"));
        assert!(msg.contains("Doctor: Dr. Rao\n"));
        assert!(msg.contains("View report: http://localhost:5000/view-pdf/a.pdf\n"));
        assert!(msg.ends_with("Generated on: 05-03-2024 04:07 PM\n"));
    }

    #[test]
    fn empty_name_greets_patient() {
        let msg = compose_message(&PatientRecord::default(), "u", at());
        assert!(msg.contains("Dear Patient,"));
    }
}
