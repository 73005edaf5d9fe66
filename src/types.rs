//! Types Module
//!
//! Common data types shared by the adapters, the classifier and the scanner.

use serde::Serialize;

/// Value of a single cell after the adapter has stringified it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// Blank, missing or error cell
    #[default]
    Empty,

    /// Stringified cell content
    Text(String),
}

impl CellValue {
    /// Builds a cell from a string, mapping the empty string to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns the text, or `""` for an empty cell
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Empty => "",
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data row; holds exactly one cell per header of its source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at a column index; out-of-range reads are `Empty`
    pub fn get(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

/// Ordered rows under a header of unique column names
///
/// Every row is padded or truncated to the header width on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularSource {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl TabularSource {
    /// Builds a source, normalizing the headers and aligning rows to them
    ///
    /// Headers are trimmed, an empty header becomes `Unnamed: <i>` and
    /// repeated headers get `.1`, `.2` suffixes.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = normalize_headers(headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, CellValue::Empty);
                Row::new(cells)
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column name); unknown positions read as `Empty`
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(r), Some(c)) => r.get(c),
            _ => &EMPTY_CELL,
        }
    }

    /// Stacks several sources into one
    ///
    /// The header is the union of all headers in first-seen order; cells a
    /// source does not have are `Empty`. Row order is preserved.
    pub fn concat(sources: Vec<TabularSource>) -> TabularSource {
        let mut headers: Vec<String> = Vec::new();
        for source in &sources {
            for header in &source.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for source in sources {
            let mapping: Vec<usize> = source
                .headers
                .iter()
                .map(|h| headers.iter().position(|u| u == h).unwrap_or(0))
                .collect();
            for row in source.rows {
                let mut cells = vec![CellValue::Empty; headers.len()];
                for (cell, &target) in row.cells.into_iter().zip(&mapping) {
                    cells[target] = cell;
                }
                rows.push(Row::new(cells));
            }
        }

        TabularSource { headers, rows }
    }
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while result.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        result.push(candidate);
    }
    result
}

/// A column whose header embeds a calendar date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    /// Position of the column in the header
    pub index: usize,
    /// Full header text
    pub name: String,
    /// The `YYYY-MM-DD` substring extracted from the header
    pub date: String,
}

/// A record produced from a position row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedRecord {
    Shift {
        date: String,
        employee: String,
        start: String,
        end: String,
    },
    Vacation {
        date: String,
        employee: String,
    },
}

impl ExtractedRecord {
    pub fn date(&self) -> &str {
        match self {
            ExtractedRecord::Shift { date, .. } | ExtractedRecord::Vacation { date, .. } => date,
        }
    }

    pub fn employee(&self) -> &str {
        match self {
            ExtractedRecord::Shift { employee, .. }
            | ExtractedRecord::Vacation { employee, .. } => employee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_cell_value_text_maps_empty() {
        assert_eq!(CellValue::text(""), CellValue::Empty);
        assert_eq!(CellValue::text("SM 9"), CellValue::Text("SM 9".to_string()));
        assert_eq!(CellValue::Empty.as_str(), "");
        assert!(CellValue::default().is_empty());
    }

    #[test]
    fn test_rows_are_aligned_to_header_width() {
        let source = TabularSource::new(
            vec!["ПІП".to_string(), "2024-05-01".to_string()],
            vec![vec![text("Jane Doe")], vec![text("SM 9"), text("10:00-20:00"), text("extra")]],
        );

        assert_eq!(source.rows()[0].cells().len(), 2);
        assert_eq!(source.rows()[1].cells().len(), 2);
        assert_eq!(source.rows()[0].get(1), &CellValue::Empty);
        assert_eq!(source.cell(1, "2024-05-01").as_str(), "10:00-20:00");
    }

    #[test]
    fn test_headers_are_trimmed_named_and_deduplicated() {
        let source = TabularSource::new(
            vec![
                "  ПІП ".to_string(),
                "".to_string(),
                "2024-05-01".to_string(),
                "2024-05-01".to_string(),
                "2024-05-01".to_string(),
            ],
            Vec::new(),
        );

        assert_eq!(
            source.headers(),
            &["ПІП", "Unnamed: 1", "2024-05-01", "2024-05-01.1", "2024-05-01.2"]
        );
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let source = TabularSource::new(vec!["A".to_string()], vec![vec![text("x")]]);
        assert!(source.cell(5, "A").is_empty());
        assert!(source.cell(0, "missing").is_empty());
        assert!(source.rows()[0].get(10).is_empty());
    }

    #[test]
    fn test_concat_unions_headers_in_first_seen_order() {
        let first = TabularSource::new(
            vec!["ПІП".to_string(), "2024-05-01".to_string()],
            vec![vec![text("Jane Doe"), CellValue::Empty]],
        );
        let second = TabularSource::new(
            vec!["ПІП".to_string(), "2024-05-02".to_string()],
            vec![vec![text("SM 9"), text("9:00-18:00")]],
        );

        let merged = TabularSource::concat(vec![first, second]);

        assert_eq!(merged.headers(), &["ПІП", "2024-05-01", "2024-05-02"]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.cell(0, "ПІП").as_str(), "Jane Doe");
        assert!(merged.cell(0, "2024-05-02").is_empty());
        assert!(merged.cell(1, "2024-05-01").is_empty());
        assert_eq!(merged.cell(1, "2024-05-02").as_str(), "9:00-18:00");
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let merged = TabularSource::concat(Vec::new());
        assert!(merged.is_empty());
        assert!(merged.headers().is_empty());
    }

    #[test]
    fn test_record_accessors() {
        let shift = ExtractedRecord::Shift {
            date: "2024-05-01".to_string(),
            employee: "Jane Doe".to_string(),
            start: "10:00".to_string(),
            end: "20:00".to_string(),
        };
        let vacation = ExtractedRecord::Vacation {
            date: "2024-05-02".to_string(),
            employee: "John".to_string(),
        };

        assert_eq!(shift.date(), "2024-05-01");
        assert_eq!(shift.employee(), "Jane Doe");
        assert_eq!(vacation.date(), "2024-05-02");
        assert_eq!(vacation.employee(), "John");
    }
}
