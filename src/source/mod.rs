//! Tabular Source Adapters
//!
//! Loads a spreadsheet or delimited text file into a [`TabularSource`].

mod cell;
mod delimited;
mod workbook;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::api::SheetSelector;
use crate::config::HeuristicTables;
use crate::error::ShiftSheetError;
use crate::security::SecurityConfig;
use crate::types::TabularSource;

pub use workbook::SheetInfo;

use workbook::WorkbookReader;

/// Input format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// XLSX, XLSM, XLS, XLSB or ODS
    Workbook,
    /// CSV, TSV or plain text
    Delimited,
}

impl SourceKind {
    /// Kind for a path, or `None` for an unknown extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(SourceKind::Workbook),
            "csv" | "tsv" | "txt" => Some(SourceKind::Delimited),
            _ => None,
        }
    }

    /// Same as [`SourceKind::from_path`], failing for unknown extensions
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<Self, ShiftSheetError> {
        Self::from_path(path.as_ref()).ok_or_else(|| {
            ShiftSheetError::SourceUnreadable(format!(
                "unsupported file type: {}",
                path.as_ref().display()
            ))
        })
    }
}

/// Reads a source from any reader
pub(crate) fn read_source<R: Read>(
    reader: R,
    kind: SourceKind,
    selector: &SheetSelector,
    tables: &HeuristicTables,
    security: &SecurityConfig,
) -> Result<TabularSource, ShiftSheetError> {
    let bytes = security.read_limited(reader)?;
    if bytes.is_empty() {
        return Err(ShiftSheetError::SourceUnreadable("file is empty".to_string()));
    }

    let source = match kind {
        SourceKind::Workbook => WorkbookReader::open(bytes)?.read(selector, tables)?,
        SourceKind::Delimited => delimited::read_delimited(&bytes)?,
    };

    info!(
        columns = source.headers().len(),
        rows = source.len(),
        "source loaded"
    );
    Ok(source)
}

/// Reads a source from a file, picking the adapter from the extension
pub(crate) fn load_source(
    path: &Path,
    selector: &SheetSelector,
    tables: &HeuristicTables,
    security: &SecurityConfig,
) -> Result<TabularSource, ShiftSheetError> {
    let kind = SourceKind::detect(path)?;
    let file = File::open(path)?;
    read_source(file, kind, selector, tables, security)
}

/// Sheet names of a workbook with their exclusion status
///
/// Delimited files have no sheets and yield an empty list.
pub fn list_sheets<P: AsRef<Path>>(
    path: P,
    tables: &HeuristicTables,
) -> Result<Vec<SheetInfo>, ShiftSheetError> {
    let path = path.as_ref();
    match SourceKind::detect(path)? {
        SourceKind::Delimited => Ok(Vec::new()),
        SourceKind::Workbook => {
            let bytes = SecurityConfig::default().read_limited(File::open(path)?)?;
            Ok(WorkbookReader::open(bytes)?.sheets(tables))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_source_kind_from_path() {
        assert_eq!(SourceKind::from_path("a.xlsx"), Some(SourceKind::Workbook));
        assert_eq!(SourceKind::from_path("A.XLS"), Some(SourceKind::Workbook));
        assert_eq!(SourceKind::from_path("a.ods"), Some(SourceKind::Workbook));
        assert_eq!(SourceKind::from_path("a.csv"), Some(SourceKind::Delimited));
        assert_eq!(SourceKind::from_path("a.pdf"), None);
        assert_eq!(SourceKind::from_path("noext"), None);
    }

    #[test]
    fn test_detect_unknown_extension() {
        assert!(matches!(
            SourceKind::detect("schedule.docx"),
            Err(ShiftSheetError::SourceUnreadable(_))
        ));
    }

    #[test]
    fn test_read_source_rejects_empty_input() {
        let result = read_source(
            Cursor::new(Vec::new()),
            SourceKind::Workbook,
            &SheetSelector::All,
            &HeuristicTables::default(),
            &SecurityConfig::default(),
        );
        assert!(matches!(result, Err(ShiftSheetError::SourceUnreadable(_))));
    }

    #[test]
    fn test_read_source_enforces_size_limit() {
        let security = SecurityConfig {
            max_input_file_size: 4,
        };
        let result = read_source(
            Cursor::new("ПІП,2024-05-01\n".as_bytes().to_vec()),
            SourceKind::Delimited,
            &SheetSelector::All,
            &HeuristicTables::default(),
            &security,
        );
        assert!(matches!(result, Err(ShiftSheetError::SecurityViolation(_))));
    }

    #[test]
    fn test_list_sheets_for_csv_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.csv");
        std::fs::write(&path, "ПІП,2024-05-01\n").unwrap();
        assert!(list_sheets(&path, &HeuristicTables::default())
            .unwrap()
            .is_empty());
    }
}
