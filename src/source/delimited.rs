//! Delimited Text Reader
//!
//! Reads CSV-like text: the first record is the header, the field separator
//! is sniffed from the header line, and text that is not UTF-8 is decoded as
//! Windows-1251.

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1251;
use tracing::{debug, warn};

use crate::error::ShiftSheetError;
use crate::types::{CellValue, TabularSource};

/// Separators tried by [`sniff_delimiter`], in tie-breaking order
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes raw bytes as UTF-8, falling back to Windows-1251
///
/// # Errors
///
/// * `ShiftSheetError::SourceUnreadable` - the bytes decode in neither encoding
pub(crate) fn decode_text(bytes: &[u8]) -> Result<String, ShiftSheetError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            warn!("input is not valid UTF-8, decoding as Windows-1251");
            let (text, had_errors) = WINDOWS_1251.decode_without_bom_handling(bytes);
            if had_errors {
                return Err(ShiftSheetError::SourceUnreadable(
                    "text is neither UTF-8 nor Windows-1251".to_string(),
                ));
            }
            Ok(text.into_owned())
        }
    }
}

/// Picks the separator that occurs most often on the first non-empty line
///
/// Ties go to the earlier candidate; a line without any candidate is read
/// as comma-separated.
pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parses delimited text into a tabular source
///
/// # Errors
///
/// * `ShiftSheetError::SourceUnreadable` - empty input, undecodable text
/// * `ShiftSheetError::Csv` - malformed quoting
pub(crate) fn read_delimited(bytes: &[u8]) -> Result<TabularSource, ShiftSheetError> {
    let text = decode_text(bytes)?;
    if text.trim().is_empty() {
        return Err(ShiftSheetError::SourceUnreadable("file is empty".to_string()));
    }

    let delimiter = sniff_delimiter(&text);
    debug!(delimiter = %(delimiter as char).escape_default(), "sniffed delimiter");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => {
            return Err(ShiftSheetError::SourceUnreadable(
                "no header row".to_string(),
            ))
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(CellValue::text).collect::<Vec<_>>());
    }

    Ok(TabularSource::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("ПІП,2024-05-01,2024-05-02\n"), b',');
        assert_eq!(sniff_delimiter("ПІП;2024-05-01;2024-05-02\n"), b';');
        assert_eq!(sniff_delimiter("ПІП\t2024-05-01\n"), b'\t');
        assert_eq!(sniff_delimiter("\n\nПІП|2024-05-01\n"), b'|');
        assert_eq!(sniff_delimiter("ПІП\n"), b',');
        assert_eq!(sniff_delimiter("a,b;c\n"), b',');
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("ПІП".as_bytes());
        assert_eq!(decode_text(&bytes).unwrap(), "ПІП");
    }

    #[test]
    fn test_decode_windows_1251_fallback() {
        let (encoded, _, _) = WINDOWS_1251.encode("Відпустка");
        assert!(std::str::from_utf8(&encoded).is_err());
        assert_eq!(decode_text(&encoded).unwrap(), "Відпустка");
    }

    #[test]
    fn test_read_semicolon_file() {
        let text = "ПІП;2024-05-01;2024-05-02\nJane Doe;;\nSM 9;10:00-20:00;Відпустка\n";
        let source = read_delimited(text.as_bytes()).unwrap();

        assert_eq!(source.headers(), &["ПІП", "2024-05-01", "2024-05-02"]);
        assert_eq!(source.len(), 2);
        assert!(source.cell(0, "2024-05-01").is_empty());
        assert_eq!(source.cell(1, "2024-05-01").as_str(), "10:00-20:00");
        assert_eq!(source.cell(1, "2024-05-02").as_str(), "Відпустка");
    }

    #[test]
    fn test_ragged_rows_are_aligned() {
        let text = "ПІП,2024-05-01,2024-05-02\nJane Doe\nSM 9,10:00-20:00,9:00-18:00,extra\n";
        let source = read_delimited(text.as_bytes()).unwrap();

        assert_eq!(source.rows()[0].cells().len(), 3);
        assert_eq!(source.rows()[1].cells().len(), 3);
        assert_eq!(source.cell(1, "2024-05-02").as_str(), "9:00-18:00");
    }

    #[test]
    fn test_quoted_fields() {
        let text = "ПІП,2024-05-01\n\"Doe, Jane\",\nSM 9,\"10:00 - 20:00\"\n";
        let source = read_delimited(text.as_bytes()).unwrap();
        assert_eq!(source.cell(0, "ПІП").as_str(), "Doe, Jane");
        assert_eq!(source.cell(1, "2024-05-01").as_str(), "10:00 - 20:00");
    }

    #[test]
    fn test_empty_input_is_unreadable() {
        assert!(matches!(
            read_delimited(b""),
            Err(ShiftSheetError::SourceUnreadable(_))
        ));
        assert!(matches!(
            read_delimited(b"  \n \n"),
            Err(ShiftSheetError::SourceUnreadable(_))
        ));
    }
}
