use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Patient identity as typed by the front desk. Every field is free text;
/// keys missing from the submitted JSON become empty strings, and numbers
/// (`"age": 30`, `"mobile": 9876543210`) are taken as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    #[serde(deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub age: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub gender: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub mobile: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub doctor: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub opd_no: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub sample_date: String,
}

/// Fields that must be non-blank before a report can be generated.
pub const REQUIRED_PATIENT_FIELDS: [&str; 4] = ["name", "age", "gender", "mobile"];

impl PatientRecord {
    /// First required field that is empty or whitespace, in form order.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        REQUIRED_PATIENT_FIELDS
            .into_iter()
            .find(|field| self.field(field).map_or(true, |v| v.trim().is_empty()))
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "age" => Some(&self.age),
            "gender" => Some(&self.gender),
            "mobile" => Some(&self.mobile),
            "doctor" => Some(&self.doctor),
            "opd_no" => Some(&self.opd_no),
            "sample_date" => Some(&self.sample_date),
            _ => None,
        }
    }
}

/// Test name → result value. Ordered so rendering is deterministic.
pub type TestResults = BTreeMap<String, String>;

/// A scalar JSON value as text. `null` is empty; arrays and objects are rejected.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(serde::de::Error::custom("expected text or a number")),
    }
}

/// Accept result values typed as JSON strings, numbers or booleans.
/// `null` entries are dropped.
pub fn deserialize_test_results<'de, D>(deserializer: D) -> Result<TestResults, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    let mut results = TestResults::new();
    for (test, value) in raw.unwrap_or_default() {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        results.insert(test, text);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_patient() -> PatientRecord {
        PatientRecord {
            name: "Asha Verma".into(),
            age: "42".into(),
            gender: "Female".into(),
            mobile: "9876543210".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_patient_has_no_missing_field() {
        assert_eq!(complete_patient().missing_required_field(), None);
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let mut p = complete_patient();
        p.gender = "   ".into();
        assert_eq!(p.missing_required_field(), Some("gender"));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let p = PatientRecord::default();
        assert_eq!(p.missing_required_field(), Some("name"));
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let p = complete_patient();
        assert!(p.doctor.is_empty());
        assert!(p.missing_required_field().is_none());
    }

    #[test]
    fn missing_json_keys_default_to_empty() {
        let p: PatientRecord = serde_json::from_str(r#"{"name":"Ravi"}"#).unwrap();
        assert_eq!(p.name, "Ravi");
        assert_eq!(p.opd_no, "");
    }

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "deserialize_test_results")]
        results: TestResults,
    }

    #[test]
    fn numeric_results_become_strings() {
        let w: Wrapper =
            serde_json::from_str(r#"{"results":{"Urea":32,"HbsAg":"Non Reactive","HCV":null}}"#)
                .unwrap();
        assert_eq!(w.results["Urea"], "32");
        assert_eq!(w.results["HbsAg"], "Non Reactive");
        assert!(!w.results.contains_key("HCV"));
    }
}
