use std::sync::LazyLock;

use regex::Regex;

use super::NotifyError;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("valid regex"));

/// Country code prepended to bare 10-digit numbers.
pub const COUNTRY_CODE: &str = "91";

/// Normalize a typed mobile number to `91` + 10 digits.
///
/// Non-digits are stripped first. A 10-digit number starting with 6-9 gets
/// the country code; a 12-digit number already starting with `91` is kept.
pub fn normalize_mobile(raw: &str) -> Result<String, NotifyError> {
    let digits = NON_DIGIT.replace_all(raw, "");

    if digits.len() == 10 && digits.starts_with(['6', '7', '8', '9']) {
        return Ok(format!("{COUNTRY_CODE}{digits}"));
    }
    if digits.len() == 12 && digits.starts_with(COUNTRY_CODE) {
        return Ok(digits.into_owned());
    }
    Err(NotifyError::InvalidMobile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_digit_number_gets_country_code() {
        assert_eq!(normalize_mobile("9876543210").unwrap(), "919876543210");
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(normalize_mobile("98765-43210").unwrap(), "919876543210");
        assert_eq!(normalize_mobile("+91 98765 43210").unwrap(), "919876543210");
        assert_eq!(normalize_mobile("+91-98765-43210").unwrap(), "919876543210");
        assert_eq!(normalize_mobile("(987) 654 3210").unwrap(), "919876543210");
    }

    #[test]
    fn twelve_digits_with_prefix_unchanged() {
        assert_eq!(normalize_mobile("919876543210").unwrap(), "919876543210");
    }

    #[test]
    fn leading_digit_below_six_is_rejected() {
        assert!(matches!(normalize_mobile("1234567890"), Err(NotifyError::InvalidMobile)));
        assert!(matches!(normalize_mobile("5876543210"), Err(NotifyError::InvalidMobile)));
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert!(normalize_mobile("12345").is_err());
        assert!(normalize_mobile("").is_err());
        assert!(normalize_mobile("98765432101").is_err());
        assert!(normalize_mobile("449876543210").is_err());
    }

    #[test]
    fn error_text_matches_operator_message() {
        assert_eq!(
            normalize_mobile("abc").unwrap_err().to_string(),
            "Invalid mobile number format"
        );
    }
}
