//! shiftsheet - shift and vacation extraction from schedule spreadsheets
//!
//! Schedules are kept as loosely structured spreadsheets: one column holds
//! employee names, the columns headed by a date hold the shift of that day.
//! An employee's name sits on its own row, followed by one or more rows
//! starting with a role code (`SM 9`, `SSE 6`) whose date cells contain time
//! ranges such as `10:00-20:00` or a vacation marker.
//!
//! This crate reads such a file (XLSX, XLS, XLSB, ODS or CSV), walks the rows
//! once while carrying the last seen name forward, and produces a flat list of
//! records for import into a scheduling tool.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shiftsheet::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     let extraction = extractor.extract_file("schedule.xlsx")?;
//!     let path = extractor.write_export(extraction.records(), None)?;
//!     println!("{} records written to {}", extraction.records().len(), path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working on an in-memory table
//!
//! ```rust
//! use shiftsheet::{CellValue, ExtractorBuilder, TabularSource};
//!
//! # fn main() -> Result<(), shiftsheet::ShiftSheetError> {
//! let source = TabularSource::new(
//!     vec!["ПІП".to_string(), "2024-05-01".to_string()],
//!     vec![
//!         vec![CellValue::text("Jane Doe"), CellValue::Empty],
//!         vec![CellValue::text("SM 9"), CellValue::text("10:00-20:00")],
//!     ],
//! );
//!
//! let extractor = ExtractorBuilder::new().build()?;
//! let extraction = extractor.extract(&source)?;
//! assert_eq!(
//!     extractor.render(extraction.records()),
//!     "2024-05-01, Jane Doe, 10:00, 20:00"
//! );
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod classifier;
mod config;
mod error;
mod output;
mod scanner;
mod security;
mod source;
mod types;

pub use api::{Delimiter, NameColumn, SheetSelector};
pub use builder::{Extraction, Extractor, ExtractorBuilder};
pub use classifier::ColumnClassifier;
pub use config::HeuristicTables;
pub use error::ShiftSheetError;
pub use output::{
    default_targets, export_file_name, write_with_fallback, OutputTarget, RecordFormatter,
    EXPORT_FILE_PREFIX,
};
pub use scanner::{normalize_time, RowKind, RowScanner, ScanReport, ScanState};
pub use source::{list_sheets, SheetInfo, SourceKind};
pub use types::{CellValue, DateColumn, ExtractedRecord, Row, TabularSource};
