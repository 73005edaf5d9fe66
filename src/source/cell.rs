//! Cell Stringification
//!
//! Turns calamine cell data into [`CellValue`]s. Everything the scanner sees
//! is text; numbers, booleans and date-times are rendered here.

use calamine::{Data, ExcelDateTime};

use crate::types::CellValue;

/// Integral floats up to this magnitude are written without a fraction
const MAX_INTEGRAL_FLOAT: f64 = 1e15;

/// Stringifies one workbook cell
///
/// # Rules
///
/// - strings are kept verbatim
/// - integers, and floats without a fractional part, as integers
/// - other floats via `Display`
/// - booleans as `TRUE` / `FALSE`
/// - date-times as `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d` at midnight, `%H:%M:%S`
///   for time-only values
/// - error and empty cells as `Empty`
pub(crate) fn stringify(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::text(s.clone()),
        Data::Int(i) => CellValue::Text(i.to_string()),
        Data::Float(f) => CellValue::Text(format_float(*f)),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => CellValue::Text(format_datetime(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_INTEGRAL_FLOAT {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return format_float(value.as_f64());
    }

    match value.as_datetime() {
        Some(dt) if value.as_f64() < 1.0 => dt.format("%H:%M:%S").to_string(),
        Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_float(value.as_f64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTimeType};

    fn excel_date(serial: f64) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false))
    }

    #[test]
    fn test_strings_are_verbatim() {
        assert_eq!(
            stringify(&Data::String(" SM 9 ".to_string())),
            CellValue::Text(" SM 9 ".to_string())
        );
        assert_eq!(stringify(&Data::String(String::new())), CellValue::Empty);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(stringify(&Data::Int(42)), CellValue::Text("42".to_string()));
        assert_eq!(stringify(&Data::Float(9.0)), CellValue::Text("9".to_string()));
        assert_eq!(stringify(&Data::Float(9.5)), CellValue::Text("9.5".to_string()));
    }

    #[test]
    fn test_bool_and_error() {
        assert_eq!(stringify(&Data::Bool(true)), CellValue::Text("TRUE".to_string()));
        assert_eq!(stringify(&Data::Error(CellErrorType::Div0)), CellValue::Empty);
        assert_eq!(stringify(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_date_at_midnight() {
        // 45413 = 2024-05-01 in the 1900 date system
        assert_eq!(stringify(&excel_date(45413.0)), CellValue::Text("2024-05-01".to_string()));
    }

    #[test]
    fn test_date_with_time() {
        assert_eq!(
            stringify(&excel_date(45413.5)),
            CellValue::Text("2024-05-01 12:00:00".to_string())
        );
    }

    #[test]
    fn test_time_only() {
        assert_eq!(stringify(&excel_date(0.375)), CellValue::Text("09:00:00".to_string()));
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(
            stringify(&Data::DateTimeIso("2024-05-01".to_string())),
            CellValue::Text("2024-05-01".to_string())
        );
    }
}
