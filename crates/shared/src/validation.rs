//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// Calendar month in `YYYY-MM` form.
    pub static ref TARGET_MONTH_REGEX: regex::Regex =
        regex::Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();
}

/// Validates a `YYYY-MM` month string.
pub fn validate_target_month(month: &str) -> Result<(), ValidationError> {
    if TARGET_MONTH_REGEX.is_match(month) {
        Ok(())
    } else {
        let mut err = ValidationError::new("target_month_format");
        err.message = Some("Target month must be in YYYY-MM format".into());
        Err(err)
    }
}

/// Parses a `YYYY-MM` month string into the first day of that month.
pub fn parse_target_month(month: &str) -> Option<NaiveDate> {
    if !TARGET_MONTH_REGEX.is_match(month) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()
}

/// Formats a date as its `YYYY-MM` month key.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Validates that a numeric metric value is finite and non-negative.
pub fn validate_metric_value(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("metric_value_range");
        err.message = Some("Value must be a non-negative number".into());
        Err(err)
    }
}

/// Validates a parameter key: non-empty, at most 64 chars, no surrounding whitespace.
pub fn validate_parameter_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.len() > 64 || name.trim() != name {
        let mut err = ValidationError::new("parameter_name");
        err.message = Some("Parameter name must be 1-64 characters without surrounding spaces".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_target_month() {
        assert!(validate_target_month("2024-03").is_ok());
        assert!(validate_target_month("1999-12").is_ok());
        assert!(validate_target_month("2024-13").is_err());
        assert!(validate_target_month("2024-00").is_err());
        assert!(validate_target_month("2024-3").is_err());
        assert!(validate_target_month("24-03").is_err());
        assert!(validate_target_month("2024-03-01").is_err());
    }

    #[test]
    fn test_validate_target_month_error_message() {
        let err = validate_target_month("March").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Target month must be in YYYY-MM format"
        );
    }

    #[test]
    fn test_parse_target_month() {
        assert_eq!(
            parse_target_month("2024-02"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(parse_target_month("2024-2"), None);
    }

    #[test]
    fn test_month_key() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(month_key(date), "2024-11");
    }

    #[test]
    fn test_validate_metric_value() {
        assert!(validate_metric_value(0.0).is_ok());
        assert!(validate_metric_value(125.5).is_ok());
        assert!(validate_metric_value(-1.0).is_err());
        assert!(validate_metric_value(f64::NAN).is_err());
        assert!(validate_metric_value(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_parameter_name() {
        assert!(validate_parameter_name("calls").is_ok());
        assert!(validate_parameter_name("").is_err());
        assert!(validate_parameter_name(" calls").is_err());
        assert!(validate_parameter_name(&"x".repeat(65)).is_err());
    }
}
