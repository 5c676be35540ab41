//! Form pages.
//!
//! `GET /`             : intake form: patient identity + test selection.
//! `GET /fillable-form`: results-entry page for the selected tests.
//!   Records a draft submission as a side effect.

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::catalog::TestCatalog;
use crate::config::{APP_NAME, ORGANIZATION_NAME};
use crate::db;
use crate::models::{DraftSubmission, PatientRecord};
use crate::pipeline::render::escape_html;

const PAGE_STYLE: &str = "body{font-family:'Times New Roman',serif;margin:20px;max-width:960px}\
h2,h3{color:#003366}fieldset{margin-bottom:12px}label{display:inline-block;min-width:220px}\
table{width:100%;border-collapse:collapse}th,td{border:1px solid #999;padding:4px 6px}\
input.result{border:none;border-bottom:1px solid #888;width:100%}";

/// Label, form key, required.
const PATIENT_FIELDS: &[(&str, &str, bool)] = &[
    ("Patient Name", "name", true),
    ("Age", "age", true),
    ("Gender", "gender", true),
    ("Mobile", "mobile", true),
    ("Doctor", "doctor", false),
    ("OPD No", "opd_no", false),
    ("Sample Date", "sample_date", false),
];

/// `GET /`
pub async fn index(State(ctx): State<ApiContext>) -> Html<String> {
    Html(render_intake_form(&ctx.core.catalog))
}

#[derive(Deserialize)]
pub struct FillableFormQuery {
    pub patient_data: Option<String>,
    pub selected_tests: Option<String>,
}

/// `GET /fillable-form?patient_data=<json>&selected_tests=<json>`
pub async fn fillable_form(
    State(ctx): State<ApiContext>,
    Query(query): Query<FillableFormQuery>,
) -> Result<Html<String>, ApiError> {
    let (Some(patient_json), Some(tests_json)) = (query.patient_data, query.selected_tests) else {
        return Err(ApiError::BadRequest("Missing patient_data or selected_tests".into()));
    };
    let patient: PatientRecord = serde_json::from_str(&patient_json)
        .map_err(|e| ApiError::BadRequest(format!("Invalid patient_data: {e}")))?;
    let selected_tests: Vec<String> = serde_json::from_str(&tests_json)
        .map_err(|e| ApiError::BadRequest(format!("Invalid selected_tests: {e}")))?;

    let draft = DraftSubmission {
        patient,
        selected_tests,
        submitted_at: chrono::Local::now().naive_local(),
    };
    match ctx
        .core
        .open_db()
        .and_then(|conn| db::insert_draft_submission(&conn, &draft))
    {
        Ok(id) => tracing::info!(
            draft_id = id,
            tests = draft.selected_tests.len(),
            "Draft submission recorded"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to record draft submission"),
    }

    let page = render_fillable_form(&ctx.core.catalog, &draft.patient, &draft.selected_tests)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Html(page))
}

fn page_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{PAGE_STYLE}</style></head><body>\n",
        escape_html(title)
    )
}

fn render_intake_form(catalog: &TestCatalog) -> String {
    let mut html = page_head(APP_NAME);
    html.push_str(&format!(
        "<h2>{} - Pathology Test Form</h2>\n<fieldset><legend>Patient Details</legend>\n",
        escape_html(ORGANIZATION_NAME)
    ));
    for (label, key, required) in PATIENT_FIELDS {
        html.push_str(&format!(
            "<div><label for=\"{key}\">{label}{}</label><input id=\"{key}\" name=\"{key}\"{}/></div>\n",
            if *required { " *" } else { "" },
            if *required { " required" } else { "" },
        ));
    }
    html.push_str("</fieldset>\n");

    for category in catalog.categories() {
        html.push_str(&format!(
            "<fieldset><legend>{}</legend>\n",
            escape_html(&category.name)
        ));
        for test in &category.tests {
            let test = escape_html(test);
            html.push_str(&format!(
                "<label><input type=\"checkbox\" class=\"testchk\" value=\"{test}\"/> {test}</label>\n"
            ));
        }
        html.push_str("</fieldset>\n");
    }

    html.push_str(
        "<button onclick=\"generateFillableForm()\">Generate Fillable Form</button>\n\
<script>\n\
function generateFillableForm(){\n\
  const keys=['name','age','gender','mobile','doctor','opd_no','sample_date'];\n\
  const patient={};\n\
  keys.forEach(k=>patient[k]=document.getElementById(k).value);\n\
  if(!patient.name||!patient.age||!patient.gender||!patient.mobile){alert('Fill required fields');return;}\n\
  const selected=[];\n\
  document.querySelectorAll('.testchk:checked').forEach(c=>selected.push(c.value));\n\
  if(selected.length===0){alert('Select at least one test');return;}\n\
  const params=new URLSearchParams({patient_data:JSON.stringify(patient),selected_tests:JSON.stringify(selected)});\n\
  window.open('/fillable-form?'+params.toString(),'_blank');\n\
}\n\
</script>\n</body></html>\n",
    );
    html
}

fn render_fillable_form(
    catalog: &TestCatalog,
    patient: &PatientRecord,
    selected_tests: &[String],
) -> Result<String, serde_json::Error> {
    let mut html = page_head("Pathology Form");
    html.push_str(&format!(
        "<h3>Pathology Test Report - Fill Results</h3>\n\
<div><strong>Patient:</strong> {} | <strong>Age/Gender:</strong> {}/{} | <strong>Doctor:</strong> {}</div><br/>\n",
        escape_html(&patient.name),
        escape_html(&patient.age),
        escape_html(&patient.gender),
        escape_html(&patient.doctor),
    ));

    let mut serial = 1;
    let mut push_section = |html: &mut String, title: &str, tests: &[&String]| {
        if tests.is_empty() {
            return;
        }
        html.push_str(&format!(
            "<h5>{}</h5><table><tr><th>S.No</th><th>Test</th><th>Normal</th><th>Result</th></tr>\n",
            escape_html(title)
        ));
        for test in tests {
            let name = escape_html(test);
            html.push_str(&format!(
                "<tr><td>{serial}</td><td>{name}</td><td>{}</td><td><input class=\"result\" name=\"{name}\"/></td></tr>\n",
                escape_html(catalog.normal_range(test))
            ));
            serial += 1;
        }
        html.push_str("</table>\n");
    };

    for category in catalog.categories() {
        let tests: Vec<&String> = category
            .tests
            .iter()
            .filter(|t| selected_tests.contains(*t))
            .collect();
        push_section(&mut html, &category.name, &tests);
    }
    let uncategorized: Vec<&String> = selected_tests
        .iter()
        .filter(|t| !catalog.is_known_test(t))
        .collect();
    push_section(&mut html, "ADDITIONAL TESTS", &uncategorized);

    // `</` would close the script element early.
    let patient_json = serde_json::to_string(patient)?.replace("</", "<\\/");
    html.push_str(&format!(
        "<div><button onclick=\"submitForm()\">Submit &amp; Send WhatsApp Report</button></div>\n\
<script>\n\
const patientData={patient_json};\n\
function submitForm(){{\n\
  const testResults={{}};\n\
  document.querySelectorAll('input.result').forEach(i=>{{if(i.value.trim()!==''&&i.name)testResults[i.name]=i.value;}});\n\
  if(Object.keys(testResults).length===0){{alert('Enter at least one result');return;}}\n\
  fetch('/submit-report',{{method:'POST',headers:{{'Content-Type':'application/json'}},\n\
    body:JSON.stringify({{patient_data:patientData,test_results:testResults}})}})\n\
  .then(r=>r.json())\n\
  .then(d=>{{if(d.success){{alert('Submitted. '+d.message);if(d.pdf_url)window.open(d.pdf_url,'_blank');}}else{{alert('Error: '+d.message);}}}})\n\
  .catch(e=>alert('Submit error: '+e));\n\
}}\n\
</script>\n</body></html>\n"
    ));
    Ok(html)
}
