//! Output Format Module
//!
//! Renders extracted records as the flat text export, one record per line.

mod writer;

use std::io::Write;

use crate::api::Delimiter;
use crate::error::ShiftSheetError;
use crate::types::ExtractedRecord;

pub(crate) use writer::default_targets_now;
pub use writer::{
    default_targets, export_file_name, write_with_fallback, OutputTarget, EXPORT_FILE_PREFIX,
};

/// Record formatter
///
/// # Line shapes
///
/// | Record   | `Delimiter::Comma`                       | `Delimiter::Space`                   |
/// | -------- | ---------------------------------------- | ------------------------------------ |
/// | Shift    | `2024-05-01, Jane Doe, 10:00, 20:00`     | `2024-05-01 Jane Doe 10:00 20:00`    |
/// | Vacation | `2024-05-01, Jane Doe, Відпустка`        | `2024-05-01 Jane Doe Відпустка`      |
///
/// Field values are written as-is; a name containing the separator is not
/// escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormatter {
    delimiter: Delimiter,
    vacation_marker: String,
}

impl RecordFormatter {
    pub fn new(delimiter: Delimiter, vacation_marker: impl Into<String>) -> Self {
        Self {
            delimiter,
            vacation_marker: vacation_marker.into(),
        }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Formats one record as a line without a terminator
    pub fn format_record(&self, record: &ExtractedRecord) -> String {
        let sep = self.delimiter.separator();
        match record {
            ExtractedRecord::Shift {
                date,
                employee,
                start,
                end,
            } => [date.as_str(), employee.as_str(), start.as_str(), end.as_str()].join(sep),
            ExtractedRecord::Vacation { date, employee } => {
                [date.as_str(), employee.as_str(), self.vacation_marker.as_str()].join(sep)
            }
        }
    }

    /// Joins all records with `\n`; there is no trailing newline
    pub fn render(&self, records: &[ExtractedRecord]) -> String {
        records
            .iter()
            .map(|r| self.format_record(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Streams the same text as [`RecordFormatter::render`] into a writer
    pub fn write_to<W: Write>(
        &self,
        records: &[ExtractedRecord],
        writer: &mut W,
    ) -> Result<(), ShiftSheetError> {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            writer.write_all(self.format_record(record).as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ExtractedRecord> {
        vec![
            ExtractedRecord::Shift {
                date: "2024-05-01".to_string(),
                employee: "Jane Doe".to_string(),
                start: "10:00".to_string(),
                end: "20:00".to_string(),
            },
            ExtractedRecord::Vacation {
                date: "2024-05-02".to_string(),
                employee: "Jane Doe".to_string(),
            },
        ]
    }

    #[test]
    fn test_space_delimited_lines() {
        let f = RecordFormatter::new(Delimiter::Space, "Відпустка");
        let r = records();
        assert_eq!(f.format_record(&r[0]), "2024-05-01 Jane Doe 10:00 20:00");
        assert_eq!(f.format_record(&r[1]), "2024-05-02 Jane Doe Відпустка");
    }

    #[test]
    fn test_comma_delimited_lines() {
        let f = RecordFormatter::new(Delimiter::Comma, "Відпустка");
        let r = records();
        assert_eq!(f.format_record(&r[0]), "2024-05-01, Jane Doe, 10:00, 20:00");
        assert_eq!(f.format_record(&r[1]), "2024-05-02, Jane Doe, Відпустка");
    }

    #[test]
    fn test_render_has_no_trailing_newline() {
        let f = RecordFormatter::new(Delimiter::Space, "Відпустка");
        let text = f.render(&records());
        assert_eq!(
            text,
            "2024-05-01 Jane Doe 10:00 20:00\n2024-05-02 Jane Doe Відпустка"
        );
        assert_eq!(f.render(&[]), "");
    }

    #[test]
    fn test_write_to_matches_render() {
        let f = RecordFormatter::new(Delimiter::Comma, "Vacation");
        let mut buffer = Vec::new();
        f.write_to(&records(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), f.render(&records()));
    }

    #[test]
    fn test_delimiter_inside_name_is_not_escaped() {
        let f = RecordFormatter::new(Delimiter::Comma, "Відпустка");
        let record = ExtractedRecord::Vacation {
            date: "2024-05-01".to_string(),
            employee: "Doe, Jane".to_string(),
        };
        assert_eq!(f.format_record(&record), "2024-05-01, Doe, Jane, Відпустка");
    }
}
