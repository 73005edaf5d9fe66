//! Column Classifier Module
//!
//! Finds the column holding employee names and the columns whose headers
//! carry a calendar date.

use tracing::debug;

use crate::api::NameColumn;
use crate::config::{CompiledTables, HeuristicTables};
use crate::error::ShiftSheetError;
use crate::types::DateColumn;

/// Header classifier
///
/// Runs once per source, before the row scan.
///
/// # Example
///
/// ```rust
/// use shiftsheet::{ColumnClassifier, HeuristicTables};
///
/// # fn main() -> Result<(), shiftsheet::ShiftSheetError> {
/// let classifier = ColumnClassifier::new(&HeuristicTables::default())?;
/// let headers = vec![
///     "Грейд".to_string(),
///     "ПІП".to_string(),
///     "Пт 2024-05-17".to_string(),
/// ];
///
/// assert_eq!(classifier.suggest_name_column(&headers), Some(1));
/// let dates = classifier.date_columns(&headers);
/// assert_eq!(dates[0].date, "2024-05-17");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    tables: CompiledTables,
}

impl ColumnClassifier {
    pub fn new(tables: &HeuristicTables) -> Result<Self, ShiftSheetError> {
        Ok(Self::from_compiled(CompiledTables::compile(tables)?))
    }

    pub(crate) fn from_compiled(tables: CompiledTables) -> Self {
        Self { tables }
    }

    /// Indices of the leading headers that look like a name column
    ///
    /// Only the first `preview_columns` headers are considered; a header is a
    /// candidate when it contains any name keyword, ignoring case.
    pub fn name_column_candidates(&self, headers: &[String]) -> Vec<usize> {
        headers
            .iter()
            .take(self.tables.preview_columns)
            .enumerate()
            .filter(|(_, header)| {
                let lower = header.to_lowercase();
                self.tables
                    .name_column_keywords
                    .iter()
                    .any(|keyword| lower.contains(keyword.as_str()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// First name-column candidate, or `None` when the caller has to choose
    pub fn suggest_name_column(&self, headers: &[String]) -> Option<usize> {
        self.name_column_candidates(headers).into_iter().next()
    }

    /// Resolves a name-column choice to a header
    ///
    /// # Errors
    ///
    /// * `ShiftSheetError::InvalidColumnSelection` - `Auto` without a
    ///   suggestion, an index outside `1..=headers.len()`, or an unknown name
    pub fn resolve_name_column(
        &self,
        headers: &[String],
        choice: &NameColumn,
    ) -> Result<String, ShiftSheetError> {
        match choice {
            NameColumn::Auto => self
                .suggest_name_column(headers)
                .map(|i| headers[i].clone())
                .ok_or_else(|| {
                    ShiftSheetError::InvalidColumnSelection(format!(
                        "no name column found among the first {} headers; choose one explicitly",
                        self.tables.preview_columns
                    ))
                }),

            NameColumn::Index(index) => {
                if *index == 0 || *index > headers.len() {
                    return Err(ShiftSheetError::InvalidColumnSelection(format!(
                        "column number {} is out of range (1-{})",
                        index,
                        headers.len()
                    )));
                }
                Ok(headers[index - 1].clone())
            }

            NameColumn::Name(name) => {
                let name = name.trim();
                headers
                    .iter()
                    .find(|h| h.as_str() == name)
                    .cloned()
                    .ok_or_else(|| {
                        ShiftSheetError::InvalidColumnSelection(format!(
                            "column '{}' not found",
                            name
                        ))
                    })
            }
        }
    }

    /// Columns whose header embeds a `202x-MM-DD` date, in header order
    pub fn date_columns(&self, headers: &[String]) -> Vec<DateColumn> {
        let columns: Vec<DateColumn> = headers
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                self.tables.header_date.find(name).map(|m| DateColumn {
                    index,
                    name: name.clone(),
                    date: m.as_str().to_string(),
                })
            })
            .collect();

        debug!(
            headers = headers.len(),
            date_columns = columns.len(),
            "classified header"
        );
        columns
    }
}
