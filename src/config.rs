//! Heuristic Tables Module
//!
//! Keyword and pattern tables that drive column classification and row
//! scanning. The tables are plain data (serde-loadable from JSON) so a new
//! spreadsheet layout can be supported without touching the scanner.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ShiftSheetError;

/// Keyword and pattern tables
///
/// Every field has a default matching the layout of the schedules this tool
/// was written for. Missing fields in a JSON file fall back to those defaults.
///
/// # Example
///
/// ```rust
/// use shiftsheet::HeuristicTables;
///
/// # fn main() -> Result<(), shiftsheet::ShiftSheetError> {
/// let tables = HeuristicTables::from_json(r#"{ "position_prefixes": ["SM", "TL"] }"#)?;
/// assert_eq!(tables.position_prefixes, vec!["SM", "TL"]);
/// assert!(!tables.noise_tokens.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTables {
    /// Substrings marking a header as a name-column candidate
    pub name_column_keywords: Vec<String>,

    /// How many leading headers are considered for the name column
    pub preview_columns: usize,

    /// Whole-cell values in the name column that are skipped
    pub noise_tokens: Vec<String>,

    /// Role codes that open a position row, e.g. `SM` in `SM 9`
    pub position_prefixes: Vec<String>,

    /// Substrings marking a cell as vacation
    pub vacation_stems: Vec<String>,

    /// Whole-cell vacation abbreviations
    pub vacation_abbreviations: Vec<String>,

    /// Token written for vacation records
    pub vacation_marker: String,

    /// Substrings of sheet names skipped when every sheet is read
    pub excluded_sheet_keywords: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            name_column_keywords: strings(&["піп", "name", "співробітник", "ім'я", "employee"]),
            preview_columns: 10,
            noise_tokens: strings(&["грейд", "піп", "посада", "повне ім'я", "разом", "total"]),
            position_prefixes: strings(&["SM", "SSE", "SE", "Staff"]),
            vacation_stems: strings(&["відпуст", "vacation"]),
            vacation_abbreviations: strings(&["в", "v"]),
            vacation_marker: "Відпустка".to_string(),
            excluded_sheet_keywords: strings(&["відпуст", "info", "довідка", "service"]),
        }
    }
}

impl HeuristicTables {
    /// Parses tables from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ShiftSheetError> {
        serde_json::from_str(json)
            .map_err(|e| ShiftSheetError::Config(format!("Invalid heuristic tables: {}", e)))
    }

    /// Reads tables from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ShiftSheetError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Checks that the tables can drive a scan
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::Config` - a required list is empty, contains a
    ///   blank entry, or `preview_columns` is zero
    pub fn validate(&self) -> Result<(), ShiftSheetError> {
        if self.preview_columns == 0 {
            return Err(ShiftSheetError::Config(
                "preview_columns must be at least 1".to_string(),
            ));
        }

        let required = [
            ("name_column_keywords", &self.name_column_keywords),
            ("position_prefixes", &self.position_prefixes),
            ("vacation_stems", &self.vacation_stems),
        ];
        for (field, list) in required {
            if list.is_empty() {
                return Err(ShiftSheetError::Config(format!("{} must not be empty", field)));
            }
        }

        let all = [
            ("name_column_keywords", &self.name_column_keywords),
            ("noise_tokens", &self.noise_tokens),
            ("position_prefixes", &self.position_prefixes),
            ("vacation_stems", &self.vacation_stems),
            ("vacation_abbreviations", &self.vacation_abbreviations),
            ("excluded_sheet_keywords", &self.excluded_sheet_keywords),
        ];
        for (field, list) in all {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ShiftSheetError::Config(format!(
                    "{} contains a blank entry",
                    field
                )));
            }
        }

        if self.vacation_marker.trim().is_empty() {
            return Err(ShiftSheetError::Config(
                "vacation_marker must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// True when a sheet name contains one of the excluded keywords
    pub fn is_excluded_sheet(&self, sheet_name: &str) -> bool {
        let lower = sheet_name.to_lowercase();
        self.excluded_sheet_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

/// Date embedded in a header: a 202x year, then month and day
pub(crate) const HEADER_DATE_PATTERN: &str = r"202\d-\d{2}-\d{2}";

/// Two `H:MM` / `H.MM` times around a hyphen
pub(crate) const TIME_RANGE_PATTERN: &str = r"(\d{1,2}[:.]\d{2})\s*-\s*(\d{1,2}[:.]\d{2})";

/// Tables compiled into matchers, built once per extractor
#[derive(Debug, Clone)]
pub(crate) struct CompiledTables {
    pub name_column_keywords: Vec<String>,
    pub preview_columns: usize,
    pub noise_tokens: Vec<String>,
    pub position_code: Regex,
    pub header_date: Regex,
    pub time_range: Regex,
    pub vacation_stems: Vec<String>,
    pub vacation_abbreviations: Vec<String>,
}

impl CompiledTables {
    pub fn compile(tables: &HeuristicTables) -> Result<Self, ShiftSheetError> {
        tables.validate()?;

        let prefixes = tables
            .position_prefixes
            .iter()
            .map(|p| regex::escape(p.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let position_code = RegexBuilder::new(&format!(r"^(?:{})\s*\d+", prefixes))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            name_column_keywords: lowercase_all(&tables.name_column_keywords),
            preview_columns: tables.preview_columns,
            noise_tokens: lowercase_all(&tables.noise_tokens),
            position_code,
            header_date: Regex::new(HEADER_DATE_PATTERN)?,
            time_range: Regex::new(TIME_RANGE_PATTERN)?,
            vacation_stems: lowercase_all(&tables.vacation_stems),
            vacation_abbreviations: lowercase_all(&tables.vacation_abbreviations),
        })
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}
