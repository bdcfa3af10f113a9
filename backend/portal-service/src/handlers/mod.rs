pub mod academics;
pub mod alumni;
pub mod auth;
pub mod blogs;
pub mod content;
pub mod events;
pub mod health;
pub mod products;
pub mod societies;
pub mod sports;
pub mod users;
pub mod work;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Parse a hex ObjectId from a path or form value.
pub(crate) fn parse_object_id(value: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(value)?)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
pub(crate) fn parse_datetime(value: &str) -> Result<DateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(DateTime::from_chrono(dt.with_timezone(&chrono::Utc)));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let dt = date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();
        return Ok(DateTime::from_chrono(dt));
    }
    Err(AppError::BadRequest(format!("Invalid date: {}", value)))
}

/// Parse a SCREAMING_SNAKE_CASE enum value out of a form field.
pub(crate) fn parse_enum<T: DeserializeOwned>(value: &str, what: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", what, value)))
}

/// Parse a JSON-encoded complex form field (arrays, nested objects).
pub(crate) fn parse_json_field<T: DeserializeOwned>(value: &str, what: &str) -> Result<T> {
    serde_json::from_str(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", what, e)))
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "1" | "TRUE" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeCategory;

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("2025-03-01T10:30:00Z").unwrap();
        let expected = chrono::DateTime::parse_from_rfc3339("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(dt.to_chrono(), expected.with_timezone(&chrono::Utc));
    }

    #[test]
    fn test_parse_datetime_plain_date() {
        assert!(parse_datetime("2025-03-01").is_ok());
    }

    #[test]
    fn test_parse_datetime_garbage() {
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_parse_enum() {
        let category: NoticeCategory = parse_enum("ACADEMIC", "category").unwrap();
        assert_eq!(category, NoticeCategory::Academic);
        assert!(parse_enum::<NoticeCategory>("WRONG", "category").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
