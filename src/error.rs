//! Error Types Module
//!
//! Structured error type shared by the whole crate.
//! `thiserror` provides the `From` conversions and message formatting.

use std::path::PathBuf;

use thiserror::Error;

/// Error type used throughout shiftsheet
///
/// Covers loading the tabular source, resolving the name column, validating
/// heuristic tables and writing the export file. Conditions that the
/// extraction treats as normal (no date columns, a position row without a
/// preceding name, a cell that matches nothing) are never reported here.
///
/// # Variants
///
/// - `Io`: I/O failure while reading the input
/// - `Parse`: the workbook could not be decoded (from calamine)
/// - `Csv`: the delimited text could not be decoded (from csv)
/// - `SourceUnreadable`: the input is not a usable tabular source
/// - `InvalidColumnSelection`: the name column could not be resolved
/// - `Config`: invalid builder settings or heuristic tables
/// - `Pattern`: a heuristic table entry failed to compile
/// - `OutputTargetUnavailable`: every output target failed
/// - `SecurityViolation`: the input exceeds the configured limits
///
/// # Example
///
/// ```rust,no_run
/// use shiftsheet::ShiftSheetError;
/// use std::fs::File;
///
/// fn open_schedule(path: &str) -> Result<File, ShiftSheetError> {
///     let file = File::open(path)?; // converted into ShiftSheetError::Io
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum ShiftSheetError {
    /// I/O failure while reading the input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be decoded
    ///
    /// Raised by calamine for corrupted files or unsupported workbook layouts.
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// The delimited text could not be decoded
    #[error("Failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// The input is not a usable tabular source
    ///
    /// Unsupported file extension, an empty file, a missing header row or
    /// text in neither UTF-8 nor Windows-1251. Extraction never runs.
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    /// The name column could not be resolved
    ///
    /// Returned when no column was suggested and none was chosen, or when an
    /// explicit choice is out of range or names no header.
    ///
    /// ```rust,no_run
    /// use shiftsheet::{ColumnClassifier, HeuristicTables, NameColumn, ShiftSheetError};
    ///
    /// # fn main() -> Result<(), ShiftSheetError> {
    /// let classifier = ColumnClassifier::new(&HeuristicTables::default())?;
    /// let headers = vec!["Грейд".to_string(), "2024-05-01".to_string()];
    /// match classifier.resolve_name_column(&headers, &NameColumn::Index(7)) {
    ///     Err(ShiftSheetError::InvalidColumnSelection(msg)) => println!("{}", msg),
    ///     _ => {}
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[error("Invalid column selection: {0}")]
    InvalidColumnSelection(String),

    /// Invalid builder settings or heuristic tables
    #[error("Configuration error: {0}")]
    Config(String),

    /// A heuristic table entry failed to compile into a pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Every output target failed
    ///
    /// The rendered export is carried along so the caller can still hand it
    /// to the operator.
    #[error("No writable output target (tried {})", format_paths(.attempted))]
    OutputTargetUnavailable {
        /// Paths that were attempted, in order
        attempted: Vec<PathBuf>,
        /// The export text that could not be written
        rendered: String,
    },

    /// The input exceeds the configured limits
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no targets".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
