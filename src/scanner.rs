//! Row Scanner Module
//!
//! One pass over the rows of a source. A name row sets the employee the
//! following position rows belong to; a position row yields one shift or
//! vacation record per date column whose cell matches.
//!
//! The pass is a fold: [`RowScanner::step`] takes the carried state and one
//! row and returns the records that row emits.

use tracing::{info, trace};

use crate::config::{CompiledTables, HeuristicTables};
use crate::error::ShiftSheetError;
use crate::types::{DateColumn, ExtractedRecord, Row, TabularSource};

/// How a row is treated, decided from its name-column cell alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Empty after trimming; skipped
    Blank,
    /// A header or summary token such as `Грейд`; skipped
    Noise,
    /// A role code such as `SM 9`; carries shifts for the current employee
    Position,
    /// Anything else; becomes the current employee
    Name,
}

/// State carried from row to row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Most recent name row, never cleared during a pass
    pub current_employee: Option<String>,
}

/// Result of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Records in row-then-date-column order
    pub records: Vec<ExtractedRecord>,
    pub rows_scanned: usize,
    pub name_rows: usize,
    pub position_rows: usize,
    /// Position rows seen before any name row
    pub orphan_position_rows: usize,
    /// Blank and noise rows
    pub skipped_rows: usize,
}

/// The row scanner
#[derive(Debug, Clone)]
pub struct RowScanner {
    tables: CompiledTables,
}

impl RowScanner {
    pub fn new(tables: &HeuristicTables) -> Result<Self, ShiftSheetError> {
        Ok(Self::from_compiled(CompiledTables::compile(tables)?))
    }

    pub(crate) fn from_compiled(tables: CompiledTables) -> Self {
        Self { tables }
    }

    /// Classifies a name-column cell
    pub fn classify(&self, cell: &str) -> RowKind {
        let value = cell.trim();
        if value.is_empty() {
            return RowKind::Blank;
        }

        let lower = value.to_lowercase();
        if self.tables.noise_tokens.iter().any(|t| *t == lower) {
            return RowKind::Noise;
        }

        if self.tables.position_code.is_match(value) {
            RowKind::Position
        } else {
            RowKind::Name
        }
    }

    /// Finds a time range in a cell, returning normalized start and end
    pub fn match_shift(&self, cell: &str) -> Option<(String, String)> {
        let caps = self.tables.time_range.captures(cell)?;
        Some((normalize_time(&caps[1]), normalize_time(&caps[2])))
    }

    /// True when a cell marks vacation
    pub fn is_vacation(&self, cell: &str) -> bool {
        let lower = cell.trim().to_lowercase();
        self.tables
            .vacation_stems
            .iter()
            .any(|stem| lower.contains(stem.as_str()))
            || self.tables.vacation_abbreviations.iter().any(|a| *a == lower)
    }

    /// Processes one row
    ///
    /// Updates `state` for a name row and returns the records of a position
    /// row. Blank, noise and orphan position rows return nothing.
    pub fn step(
        &self,
        state: &mut ScanState,
        row: &Row,
        name_column: usize,
        date_columns: &[DateColumn],
    ) -> Vec<ExtractedRecord> {
        let cell = row.get(name_column).as_str().trim();

        match self.classify(cell) {
            RowKind::Blank | RowKind::Noise => Vec::new(),

            RowKind::Name => {
                trace!(employee = cell, "name row");
                state.current_employee = Some(cell.to_string());
                Vec::new()
            }

            RowKind::Position => {
                let Some(employee) = state.current_employee.as_deref() else {
                    trace!(code = cell, "position row without employee");
                    return Vec::new();
                };

                date_columns
                    .iter()
                    .filter_map(|column| self.extract_cell(row, column, employee))
                    .collect()
            }
        }
    }

    fn extract_cell(
        &self,
        row: &Row,
        column: &DateColumn,
        employee: &str,
    ) -> Option<ExtractedRecord> {
        let value = row.get(column.index).as_str().trim();

        if let Some((start, end)) = self.match_shift(value) {
            return Some(ExtractedRecord::Shift {
                date: column.date.clone(),
                employee: employee.to_string(),
                start,
                end,
            });
        }

        if self.is_vacation(value) {
            return Some(ExtractedRecord::Vacation {
                date: column.date.clone(),
                employee: employee.to_string(),
            });
        }

        None
    }

    /// Scans every row of a source in order
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::InvalidColumnSelection` - `name_column` is not a
    ///   header of `source`
    pub fn scan(
        &self,
        source: &TabularSource,
        name_column: &str,
        date_columns: &[DateColumn],
    ) -> Result<ScanReport, ShiftSheetError> {
        let name_index = source.column_index(name_column).ok_or_else(|| {
            ShiftSheetError::InvalidColumnSelection(format!(
                "column '{}' not found",
                name_column
            ))
        })?;

        let mut state = ScanState::default();
        let mut report = ScanReport::default();

        for row in source.rows() {
            report.rows_scanned += 1;
            match self.classify(row.get(name_index).as_str()) {
                RowKind::Blank | RowKind::Noise => report.skipped_rows += 1,
                RowKind::Name => report.name_rows += 1,
                RowKind::Position if state.current_employee.is_none() => {
                    report.position_rows += 1;
                    report.orphan_position_rows += 1;
                }
                RowKind::Position => report.position_rows += 1,
            }

            let records = self.step(&mut state, row, name_index, date_columns);
            report.records.extend(records);
        }

        info!(
            rows = report.rows_scanned,
            records = report.records.len(),
            orphans = report.orphan_position_rows,
            "scan finished"
        );
        Ok(report)
    }
}

/// Replaces `.` with `:` in a time; hour digits are kept as written
pub fn normalize_time(time: &str) -> String {
    time.replace('.', ":")
}
