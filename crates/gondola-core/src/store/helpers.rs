//! Row-to-entity parsing helpers.
//!
//! Converts `libsql::Row` columns into typed values. Datetimes are
//! stored as RFC 3339 but SQLite's own `datetime('now')` format is
//! accepted too, and money columns are coerced defensively whatever
//! their storage class.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::StoreError;

/// Parse a required TEXT column as `DateTime<Utc>`. Accepts RFC 3339
/// (`"2026-02-09T14:30:00+00:00"`) and SQLite's default
/// (`"2026-02-09 14:30:00"`).
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column holding an ISO calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StoreError::Query(format!("failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum. Works with the
/// model enums, which all use `#[serde(rename_all = "snake_case")]`.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and
/// empty string. `row.get::<String>(idx)` errors on NULL, nullable
/// columns must go through `Option<String>`.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Coerce a money column to `Decimal` whatever its storage class.
///
/// Prices are written as canonical decimal strings, but rows touched by
/// older tooling may hold INTEGER or REAL values. Unreadable cells
/// collapse to zero rather than failing the whole read.
pub fn coerce_money(row: &libsql::Row, idx: i32) -> Result<Decimal, StoreError> {
    let value = row.get_value(idx)?;
    let parsed = match value {
        libsql::Value::Null => Decimal::ZERO,
        libsql::Value::Integer(i) => Decimal::from(i),
        libsql::Value::Real(f) => f.to_string().parse().unwrap_or(Decimal::ZERO),
        libsql::Value::Text(s) => s.trim().parse().unwrap_or(Decimal::ZERO),
        libsql::Value::Blob(_) => Decimal::ZERO,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_accepts_both_formats() {
        assert!(parse_datetime("2026-02-09T14:30:00+00:00").is_ok());
        assert!(parse_datetime("2026-02-09 14:30:00").is_ok());
        assert!(parse_datetime("nonsense").is_err());
    }

    #[test]
    fn test_optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert!(parse_optional_datetime(Some("2026-02-09 14:30:00"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_date_parses_iso() {
        assert_eq!(
            parse_date("2026-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2026").is_err());
    }
}
