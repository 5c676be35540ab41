//! Test catalog: recognized tests grouped by category, plus the
//! reference ranges printed next to each result.
//!
//! Built once at start-up and shared read-only through `CoreState`.

use std::collections::BTreeMap;

use serde::Serialize;

/// One category of the intake form, e.g. "LIPID PROFILE".
#[derive(Debug, Clone, Serialize)]
pub struct TestCategory {
    pub name: String,
    pub tests: Vec<String>,
}

/// Immutable catalog of categories and normal ranges.
#[derive(Debug, Clone, Serialize)]
pub struct TestCatalog {
    categories: Vec<TestCategory>,
    normal_ranges: BTreeMap<String, String>,
}

const STANDARD_CATEGORIES: &[(&str, &[&str])] = &[
    ("BIOCHEMISTRY", &["Glucose (F)/RI", "Post Prandial / after 2 Hrs", "HbA1c"]),
    ("RENAL FUNCTION", &["Urea", "Creatinine", "S. Uric Acid", "BUN"]),
    ("LIPID PROFILE", &["Cholesterol", "Triglyceride", "HDL", "LDL"]),
    (
        "LIVER FUNCTION",
        &[
            "Bilirubin Total",
            "Bilirubin (Conjugated)",
            "Bilirubin (Unconjugated)",
            "SGOT/AST",
            "SGPT/ALT",
        ],
    ),
    ("ELECTROLYTES", &["S. Calcium", "S. Sodium", "S. Potassium"]),
    (
        "OTHER TESTS",
        &[
            "Urine Protein (24 Hrs)",
            "Urine micro protein (albumin)",
            "CK-MB",
            "S. Phosphorous",
            "S. Amylase",
            "TROP-T",
        ],
    ),
    ("HAEMATOLOGY", &["Haemoglobin", "Total leukocyte count", "Platelet Count", "RBC Count"]),
    ("SEROLOGY", &["HbsAg", "HIV (1+2)", "HCV", "VDRL"]),
];

const STANDARD_NORMAL_RANGES: &[(&str, &str)] = &[
    ("Glucose (F)/RI", "70-110 mg/dl"),
    ("Post Prandial / after 2 Hrs", "Up to 140 mg/dl"),
    ("HbA1c", "4.5-6.5 %"),
    ("Urea", "10-40 mg/dl"),
    ("Creatinine", "0.6-1.4 mg/dl"),
    ("S. Uric Acid", "2.8-7.0 mg/dl"),
    ("BUN", "5-20 mg/dl"),
    ("Cholesterol", "150-200 mg/dl"),
    ("Triglyceride", "0-170 mg/dl"),
    ("HDL", "30-96 (F)/30-70 (M) mg/dl"),
    ("LDL", "<100 mg/dl"),
    ("Bilirubin Total", "0.1-1.2 mg/dl"),
    ("Bilirubin (Conjugated)", "0.0-0.3 mg/dl"),
    ("Bilirubin (Unconjugated)", "0.1-1.0 mg/dl"),
];

impl TestCatalog {
    pub fn new(categories: Vec<TestCategory>, normal_ranges: BTreeMap<String, String>) -> Self {
        Self {
            categories,
            normal_ranges,
        }
    }

    /// The hospital's standard test panel.
    pub fn standard() -> Self {
        let categories = STANDARD_CATEGORIES
            .iter()
            .map(|(name, tests)| TestCategory {
                name: name.to_string(),
                tests: tests.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        let normal_ranges = STANDARD_NORMAL_RANGES
            .iter()
            .map(|(test, range)| (test.to_string(), range.to_string()))
            .collect();
        Self::new(categories, normal_ranges)
    }

    pub fn categories(&self) -> &[TestCategory] {
        &self.categories
    }

    /// Reference range for `test`, or "" when the catalog has none.
    pub fn normal_range(&self, test: &str) -> &str {
        self.normal_ranges.get(test).map(String::as_str).unwrap_or("")
    }

    /// Whether `test` appears in any category.
    pub fn is_known_test(&self, test: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.tests.iter().any(|t| t == test))
    }

    /// Category containing `test`, if any.
    pub fn category_of(&self, test: &str) -> Option<&TestCategory> {
        self.categories
            .iter()
            .find(|c| c.tests.iter().any(|t| t == test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_eight_categories() {
        let catalog = TestCatalog::standard();
        assert_eq!(catalog.categories().len(), 8);
        assert_eq!(catalog.categories()[0].name, "BIOCHEMISTRY");
    }

    #[test]
    fn known_range_is_returned() {
        let catalog = TestCatalog::standard();
        assert_eq!(catalog.normal_range("HbA1c"), "4.5-6.5 %");
        assert_eq!(catalog.normal_range("LDL"), "<100 mg/dl");
    }

    #[test]
    fn unknown_range_is_empty() {
        let catalog = TestCatalog::standard();
        assert_eq!(catalog.normal_range("HIV (1+2)"), "");
        assert_eq!(catalog.normal_range("Not a test"), "");
    }

    #[test]
    fn every_ranged_test_is_in_a_category() {
        let catalog = TestCatalog::standard();
        for (test, _) in STANDARD_NORMAL_RANGES {
            assert!(catalog.is_known_test(test), "{test} missing from categories");
        }
    }

    #[test]
    fn category_lookup() {
        let catalog = TestCatalog::standard();
        assert_eq!(catalog.category_of("VDRL").map(|c| c.name.as_str()), Some("SEROLOGY"));
        assert!(catalog.category_of("Unknown").is_none());
    }
}
