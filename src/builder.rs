//! Builder Module
//!
//! Fluent builder for [`Extractor`], the facade that wires the source
//! adapters, the column classifier, the row scanner and the formatter.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::{Delimiter, NameColumn, SheetSelector};
use crate::classifier::ColumnClassifier;
use crate::config::{CompiledTables, HeuristicTables};
use crate::error::ShiftSheetError;
use crate::output::{default_targets_now, write_with_fallback, OutputTarget, RecordFormatter};
use crate::scanner::{RowScanner, ScanReport};
use crate::security::SecurityConfig;
use crate::source::{load_source, read_source, SourceKind};
use crate::types::{DateColumn, ExtractedRecord, TabularSource};

/// Settings collected by the builder
#[derive(Debug, Clone)]
pub(crate) struct ExtractionConfig {
    pub sheet_selector: SheetSelector,
    pub name_column: NameColumn,
    pub delimiter: Delimiter,
    pub tables: HeuristicTables,
    pub security: SecurityConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            name_column: NameColumn::Auto,
            delimiter: Delimiter::Comma,
            tables: HeuristicTables::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Builder for [`Extractor`]
///
/// Every setting has a default; override only what differs.
///
/// # Example
///
/// ```rust,no_run
/// use shiftsheet::{Delimiter, ExtractorBuilder, NameColumn, SheetSelector};
///
/// # fn main() -> Result<(), shiftsheet::ShiftSheetError> {
/// let extractor = ExtractorBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Травень".to_string()))
///     .with_name_column(NameColumn::Index(2))
///     .with_delimiter(Delimiter::Space)
///     .build()?;
///
/// let extraction = extractor.extract_file("schedule.xlsx")?;
/// println!("{}", extractor.render(extraction.records()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    config: ExtractionConfig,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// Builder with default settings
    ///
    /// # Defaults
    ///
    /// - sheets: every sheet without an excluded keyword
    /// - name column: suggested from the header
    /// - delimiter: comma
    /// - tables: [`HeuristicTables::default`]
    /// - input limit: 256MiB
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    pub fn with_name_column(mut self, name_column: NameColumn) -> Self {
        self.config.name_column = name_column;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Replaces the keyword and pattern tables
    pub fn with_tables(mut self, tables: HeuristicTables) -> Self {
        self.config.tables = tables;
        self
    }

    /// Largest accepted input in bytes
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// Validates the settings and builds the extractor
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::Config` - invalid tables, a zero input limit or
    ///   column number 0
    /// * `ShiftSheetError::Pattern` - a position prefix failed to compile
    pub fn build(self) -> Result<Extractor, ShiftSheetError> {
        if self.config.security.max_input_file_size == 0 {
            return Err(ShiftSheetError::Config(
                "Input size limit must be greater than zero".to_string(),
            ));
        }

        if self.config.name_column == NameColumn::Index(0) {
            return Err(ShiftSheetError::Config(
                "Column numbers start at 1".to_string(),
            ));
        }

        let compiled = CompiledTables::compile(&self.config.tables)?;
        Ok(Extractor::new(self.config, compiled))
    }
}

/// Outcome of scanning one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Header used as the name column
    pub name_column: String,
    /// Date columns in header order
    pub date_columns: Vec<DateColumn>,
    pub report: ScanReport,
}

impl Extraction {
    pub fn records(&self) -> &[ExtractedRecord] {
        &self.report.records
    }
}

/// Extraction facade
#[derive(Debug)]
pub struct Extractor {
    config: ExtractionConfig,
    classifier: ColumnClassifier,
    scanner: RowScanner,
    formatter: RecordFormatter,
}

impl Extractor {
    pub(crate) fn new(config: ExtractionConfig, compiled: CompiledTables) -> Self {
        Self {
            classifier: ColumnClassifier::from_compiled(compiled.clone()),
            scanner: RowScanner::from_compiled(compiled),
            formatter: RecordFormatter::new(config.delimiter, config.tables.vacation_marker.clone()),
            config,
        }
    }

    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    pub fn scanner(&self) -> &RowScanner {
        &self.scanner
    }

    pub fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }

    pub fn tables(&self) -> &HeuristicTables {
        &self.config.tables
    }

    /// Loads a file with the configured sheet selection
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<TabularSource, ShiftSheetError> {
        load_source(
            path.as_ref(),
            &self.config.sheet_selector,
            &self.config.tables,
            &self.config.security,
        )
    }

    /// Loads a source from a reader of a known kind
    pub fn load_from_reader<R: Read>(
        &self,
        reader: R,
        kind: SourceKind,
    ) -> Result<TabularSource, ShiftSheetError> {
        read_source(
            reader,
            kind,
            &self.config.sheet_selector,
            &self.config.tables,
            &self.config.security,
        )
    }

    /// Scans a source using the configured name-column choice
    pub fn extract(&self, source: &TabularSource) -> Result<Extraction, ShiftSheetError> {
        self.extract_with_name_column(source, &self.config.name_column)
    }

    /// Scans a source with an explicit name-column choice
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::InvalidColumnSelection` - the choice does not
    ///   resolve to a header; no row is scanned
    pub fn extract_with_name_column(
        &self,
        source: &TabularSource,
        name_column: &NameColumn,
    ) -> Result<Extraction, ShiftSheetError> {
        let headers = source.headers();
        let name_column = self.classifier.resolve_name_column(headers, name_column)?;
        let date_columns = self.classifier.date_columns(headers);

        info!(
            name_column = %name_column,
            date_columns = date_columns.len(),
            "columns resolved"
        );

        let report = self.scanner.scan(source, &name_column, &date_columns)?;
        Ok(Extraction {
            name_column,
            date_columns,
            report,
        })
    }

    /// Loads and scans a file
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, ShiftSheetError> {
        let source = self.load(path)?;
        self.extract(&source)
    }

    /// Export text for the records
    pub fn render(&self, records: &[ExtractedRecord]) -> String {
        self.formatter.render(records)
    }

    /// Writes the export, falling back through the default targets
    ///
    /// With `output` set only that path is tried; otherwise the desktop and
    /// then the working directory. On failure the error carries the text.
    pub fn write_export(
        &self,
        records: &[ExtractedRecord],
        output: Option<&Path>,
    ) -> Result<PathBuf, ShiftSheetError> {
        let targets = match output {
            Some(path) => vec![OutputTarget::File(path.to_path_buf())],
            None => default_targets_now(),
        };
        write_with_fallback(&targets, &self.render(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn schedule() -> TabularSource {
        let rows = [
            ["Jane Doe", "", ""],
            ["SM 9", "10:00-20:00", "Відпустка"],
            ["John Roe", "", ""],
            ["SE 3", "", "9.30-18.45"],
        ];
        TabularSource::new(
            vec![
                "ПІП".to_string(),
                "2024-05-01".to_string(),
                "2024-05-02".to_string(),
            ],
            rows.iter()
                .map(|r| r.iter().map(|c| CellValue::text(*c)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ExtractorBuilder::new();
        assert_eq!(builder.config.sheet_selector, SheetSelector::All);
        assert_eq!(builder.config.name_column, NameColumn::Auto);
        assert_eq!(builder.config.delimiter, Delimiter::Comma);
        assert_eq!(builder.config.tables, HeuristicTables::default());
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ExtractorBuilder::new()
            .with_sheet_selector(SheetSelector::Index(1))
            .with_name_column(NameColumn::Name("ПІП".to_string()))
            .with_delimiter(Delimiter::Space)
            .with_max_input_size(1024);

        assert_eq!(builder.config.sheet_selector, SheetSelector::Index(1));
        assert_eq!(builder.config.name_column, NameColumn::Name("ПІП".to_string()));
        assert_eq!(builder.config.delimiter, Delimiter::Space);
        assert_eq!(builder.config.security.max_input_file_size, 1024);
    }

    #[test]
    fn test_build_rejects_zero_limit() {
        let result = ExtractorBuilder::new().with_max_input_size(0).build();
        assert!(matches!(result, Err(ShiftSheetError::Config(_))));
    }

    #[test]
    fn test_build_rejects_column_zero() {
        let result = ExtractorBuilder::new()
            .with_name_column(NameColumn::Index(0))
            .build();
        match result {
            Err(ShiftSheetError::Config(msg)) => assert!(msg.contains("start at 1")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_rejects_invalid_tables() {
        let tables = HeuristicTables {
            vacation_stems: Vec::new(),
            ..HeuristicTables::default()
        };
        let result = ExtractorBuilder::new().with_tables(tables).build();
        assert!(matches!(result, Err(ShiftSheetError::Config(_))));
    }

    #[test]
    fn test_extract_and_render() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        let extraction = extractor.extract(&schedule()).unwrap();

        assert_eq!(extraction.name_column, "ПІП");
        assert_eq!(extraction.date_columns.len(), 2);
        assert_eq!(
            extractor.render(extraction.records()),
            "2024-05-01, Jane Doe, 10:00, 20:00\n\
             2024-05-02, Jane Doe, Відпустка\n\
             2024-05-02, John Roe, 9:30, 18:45"
        );
    }

    #[test]
    fn test_space_delimiter_does_not_change_records() {
        let comma = ExtractorBuilder::new().build().unwrap();
        let space = ExtractorBuilder::new()
            .with_delimiter(Delimiter::Space)
            .build()
            .unwrap();

        let a = comma.extract(&schedule()).unwrap();
        let b = space.extract(&schedule()).unwrap();
        assert_eq!(a.records(), b.records());
        assert!(space
            .render(b.records())
            .starts_with("2024-05-01 Jane Doe 10:00 20:00"));
    }

    #[test]
    fn test_unresolvable_name_column_stops_extraction() {
        let extractor = ExtractorBuilder::new()
            .with_name_column(NameColumn::Index(9))
            .build()
            .unwrap();
        let result = extractor.extract(&schedule());
        assert!(matches!(
            result,
            Err(ShiftSheetError::InvalidColumnSelection(_))
        ));
    }

    #[test]
    fn test_write_export_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.txt");
        let extractor = ExtractorBuilder::new().build().unwrap();
        let extraction = extractor.extract(&schedule()).unwrap();

        let written = extractor
            .write_export(extraction.records(), Some(path.as_path()))
            .unwrap();

        assert_eq!(written, path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, extractor.render(extraction.records()));
    }

    #[test]
    fn test_write_export_failure_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("export.txt");
        let extractor = ExtractorBuilder::new().build().unwrap();
        let extraction = extractor.extract(&schedule()).unwrap();

        match extractor.write_export(extraction.records(), Some(path.as_path())) {
            Err(ShiftSheetError::OutputTargetUnavailable { rendered, .. }) => {
                assert!(rendered.contains("John Roe"));
            }
            _ => panic!("Expected OutputTargetUnavailable"),
        }
    }
}
