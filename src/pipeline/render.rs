//! Report renderer: patient + results → report HTML.
//!
//! Pure function of its inputs. The generation timestamp is passed in so
//! two renders of the same submission differ only in that line.

use chrono::NaiveDateTime;

use crate::catalog::TestCatalog;
use crate::config::{ORGANIZATION_ADDRESS, ORGANIZATION_NAME};
use crate::models::{PatientRecord, ResultFlag, TestResults};

/// Substrings (lowercase) that mark a result as abnormal.
pub const ABNORMAL_KEYWORDS: [&str; 5] = ["positive", "high", "low", "abnormal", "reactive"];

/// Display format of the "Report generated" line.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const REPORT_STYLE: &str = "body{font-family:'Times New Roman',serif;margin:20px}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #000;padding:6px;text-align:left}\
th{background:#e9ecef}\
.normal{color:#28a745}.abnormal{color:#dc3545;font-weight:bold}\
.header{text-align:center;color:#003366}.patient td{border:none;padding:2px 6px}";

/// Keyword heuristic: no numeric comparison against the reference range.
pub fn classify_result(result: &str) -> ResultFlag {
    let lowered = result.to_lowercase();
    if ABNORMAL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        ResultFlag::Abnormal
    } else {
        ResultFlag::Normal
    }
}

/// Render the report. An empty `results` map yields an empty results table.
pub fn render_report(
    patient: &PatientRecord,
    results: &TestResults,
    catalog: &TestCatalog,
    generated_at: NaiveDateTime,
) -> String {
    let mut html = String::with_capacity(2048 + results.len() * 160);

    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!(
        "<title>{} Pathology Report - {}</title>",
        escape_html(ORGANIZATION_NAME),
        escape_html(&patient.name)
    ));
    html.push_str(&format!("<style>{REPORT_STYLE}</style></head><body>\n"));

    html.push_str(&format!(
        "<div class=\"header\"><h2>{} PATHOLOGY REPORT</h2><p>{}</p></div>\n<hr/>\n",
        escape_html(ORGANIZATION_NAME),
        escape_html(ORGANIZATION_ADDRESS)
    ));

    html.push_str("<table class=\"patient\">\n");
    let age_gender = format!("{}/{}", patient.age, patient.gender);
    push_identity_row(&mut html, "Patient", &patient.name, "Age/Gender", &age_gender);
    push_identity_row(&mut html, "Mobile", &patient.mobile, "Doctor", &patient.doctor);
    push_identity_row(&mut html, "OPD No", &patient.opd_no, "Sample Date", &patient.sample_date);
    html.push_str("</table>\n<hr/>\n");

    html.push_str("<h4>Test Results</h4>\n<table class=\"results\">\n");
    html.push_str("<tr><th>Test</th><th>Normal Range</th><th>Result</th><th>Status</th></tr>\n");
    for (test, result) in results {
        let flag = classify_result(result);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{flag}\">{}</td><td class=\"{flag}\">{}</td></tr>\n",
            escape_html(test),
            escape_html(catalog.normal_range(test)),
            escape_html(result),
            flag.as_str().to_uppercase(),
        ));
    }
    html.push_str("</table>\n");

    html.push_str(&format!(
        "<div class=\"generated\" style=\"margin-top:30px\">Report generated: {}</div>\n",
        generated_at.format(REPORT_TIMESTAMP_FORMAT)
    ));
    html.push_str("</body></html>\n");
    html
}

/// Render with the local clock.
pub fn render_report_now(
    patient: &PatientRecord,
    results: &TestResults,
    catalog: &TestCatalog,
) -> String {
    render_report(patient, results, catalog, chrono::Local::now().naive_local())
}

fn push_identity_row(html: &mut String, l1: &str, v1: &str, l2: &str, v2: &str) {
    html.push_str(&format!(
        "<tr><td><strong>{l1}:</strong> {}</td><td><strong>{l2}:</strong> {}</td></tr>\n",
        escape_html(v1),
        escape_html(v2)
    ));
}

/// Minimal HTML escaping for operator-supplied text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn patient() -> PatientRecord {
        PatientRecord {
            name: "Sunil Kumar".into(),
            age: "61".into(),
            gender: "Male".into(),
            mobile: "9876543210".into(),
            doctor: "Dr. Mehta".into(),
            opd_no: "OPD-204".into(),
            sample_date: "2024-06-10".into(),
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn results(pairs: &[(&str, &str)]) -> TestResults {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn keyword_results_are_abnormal() {
        assert_eq!(classify_result("Positive"), ResultFlag::Abnormal);
        assert_eq!(classify_result("120 High"), ResultFlag::Abnormal);
        assert_eq!(classify_result("LOW"), ResultFlag::Abnormal);
        assert_eq!(classify_result("Reactive"), ResultFlag::Abnormal);
    }

    #[test]
    fn plain_numbers_are_normal() {
        assert_eq!(classify_result("95"), ResultFlag::Normal);
        // No range check: far outside 70-110 but still "normal".
        assert_eq!(classify_result("400"), ResultFlag::Normal);
        assert_eq!(classify_result("Negative"), ResultFlag::Normal);
    }

    #[test]
    fn rows_carry_range_result_and_tag() {
        let html = render_report(
            &patient(),
            &results(&[("Glucose (F)/RI", "95"), ("HbsAg", "Positive")]),
            &TestCatalog::standard(),
            at(9, 15),
        );
        assert!(html.contains(
            "<td>Glucose (F)/RI</td><td>70-110 mg/dl</td><td class=\"normal\">95</td>"
        ));
        assert!(html.contains("<td>HbsAg</td><td></td><td class=\"abnormal\">Positive</td>"));
        assert!(html.contains("NORMAL"));
        assert!(html.contains("ABNORMAL"));
    }

    #[test]
    fn header_identity_and_timestamp_present() {
        let catalog = TestCatalog::standard();
        let html = render_report(&patient(), &results(&[("Urea", "30")]), &catalog, at(14, 5));
        assert!(html.contains("UJJIVAN HOSPITAL PATHOLOGY REPORT"));
        assert!(html.contains("Sunil Kumar"));
        assert!(html.contains("61/Male"));
        assert!(html.contains("Dr. Mehta"));
        assert!(html.contains("OPD-204"));
        assert!(html.contains("Report generated: 2024-06-10 14:05"));
    }

    #[test]
    fn empty_results_render_empty_table() {
        let catalog = TestCatalog::standard();
        let html = render_report(&patient(), &TestResults::new(), &catalog, at(8, 0));
        assert!(html.contains("<table class=\"results\">"));
        assert!(!html.contains("class=\"normal\">"));
        assert!(html.ends_with("</body></html>\n"));
    }

    #[test]
    fn identical_inputs_differ_only_in_timestamp() {
        let catalog = TestCatalog::standard();
        let r = results(&[("HDL", "45"), ("LDL", "130 high")]);
        let a = render_report(&patient(), &r, &catalog, at(10, 0));
        let b = render_report(&patient(), &r, &catalog, at(10, 0));
        assert_eq!(a, b);

        let c = render_report(&patient(), &r, &catalog, at(11, 30));
        assert_ne!(a, c);
        assert_eq!(a.replace("2024-06-10 10:00", "T"), c.replace("2024-06-10 11:30", "T"));
    }

    #[test]
    fn render_now_stamps_current_date() {
        let catalog = TestCatalog::standard();
        let html = render_report_now(&patient(), &results(&[("BUN", "12")]), &catalog);
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert!(html.contains(&format!("Report generated: {today}")));
    }

    #[test]
    fn operator_text_is_escaped() {
        let mut p = patient();
        p.name = "<script>alert(1)</script>".into();
        let html = render_report(&p, &TestResults::new(), &TestCatalog::standard(), at(8, 0));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
