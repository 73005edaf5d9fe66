//! Workbook Reader
//!
//! Reads worksheets through calamine (XLSX, XLSM, XLS, XLSB and ODS) and
//! turns them into [`TabularSource`]s whose first row is the header.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader, Sheets};
use tracing::{debug, info};

use crate::api::SheetSelector;
use crate::config::HeuristicTables;
use crate::error::ShiftSheetError;
use crate::source::cell::stringify;
use crate::types::{CellValue, TabularSource};

/// Sheet name together with whether `SheetSelector::All` skips it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    pub excluded: bool,
}

/// An opened workbook held in memory
pub(crate) struct WorkbookReader {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookReader {
    /// Opens a workbook from its bytes; the format is detected from content
    pub fn open(bytes: Vec<u8>) -> Result<Self, ShiftSheetError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        Ok(Self { workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Sheet names annotated with the exclusion filter
    pub fn sheets(&self, tables: &HeuristicTables) -> Vec<SheetInfo> {
        self.sheet_names()
            .into_iter()
            .map(|name| SheetInfo {
                excluded: tables.is_excluded_sheet(&name),
                name,
            })
            .collect()
    }

    /// Resolves a selector to sheet names
    ///
    /// `All` applies the exclusion filter; an explicit index or name does not.
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::Config` - index out of range or unknown name
    pub fn select_sheets(
        &self,
        selector: &SheetSelector,
        tables: &HeuristicTables,
    ) -> Result<Vec<String>, ShiftSheetError> {
        let all_sheet_names = self.sheet_names();

        match selector {
            SheetSelector::All => Ok(all_sheet_names
                .into_iter()
                .filter(|name| !tables.is_excluded_sheet(name))
                .collect()),

            SheetSelector::Index(index) => {
                if *index >= all_sheet_names.len() {
                    return Err(ShiftSheetError::Config(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    )));
                }
                Ok(vec![all_sheet_names[*index].clone()])
            }

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(ShiftSheetError::Config(format!("Sheet '{}' not found", name)));
                }
                Ok(vec![name.clone()])
            }
        }
    }

    /// Reads one sheet; an empty sheet yields an empty source
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<TabularSource, ShiftSheetError> {
        let range = self.workbook.worksheet_range(sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| stringify(cell).as_str().to_string())
                .collect(),
            None => return Ok(TabularSource::default()),
        };

        let data: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(stringify).collect())
            .collect();

        debug!(
            sheet = sheet_name,
            columns = headers.len(),
            rows = data.len(),
            "sheet read"
        );
        Ok(TabularSource::new(headers, data))
    }

    /// Reads every selected sheet and stacks them in workbook order
    pub fn read(
        &mut self,
        selector: &SheetSelector,
        tables: &HeuristicTables,
    ) -> Result<TabularSource, ShiftSheetError> {
        let sheet_names = self.select_sheets(selector, tables)?;
        if sheet_names.is_empty() {
            return Err(ShiftSheetError::SourceUnreadable(
                "no sheet left after excluding reference sheets".to_string(),
            ));
        }

        let mut sources = Vec::with_capacity(sheet_names.len());
        for name in &sheet_names {
            info!(sheet = %name, "reading sheet");
            sources.push(self.read_sheet(name)?);
        }

        Ok(TabularSource::concat(sources))
    }
}
