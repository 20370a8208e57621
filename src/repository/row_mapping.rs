// ==========================================
// Row mapping helpers shared by repositories
// ==========================================

use crate::domain::types::{DATETIME_FORMAT, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;

/// Parse a stored timestamp column, surfacing bad values as conversion errors
pub(crate) fn parse_datetime_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_datetime_column(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<NaiveDateTime>> {
    raw.map(|s| parse_datetime_column(idx, &s)).transpose()
}

pub(crate) fn parse_opt_date_column(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_roundtrip_format() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let s = format_datetime(&dt);
        assert_eq!(s, "2026-01-05 06:00:00");
        assert_eq!(parse_datetime_column(0, &s).unwrap(), dt);
    }

    #[test]
    fn test_bad_datetime_is_conversion_error() {
        let err = parse_datetime_column(3, "05-01-2026").unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(3, _, _)));
    }
}
