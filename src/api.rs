//! Public API Types
//!
//! Enums used to configure an extraction.

use std::fmt;
use std::str::FromStr;

/// Field separator of the export lines
///
/// Both conventions exist in the wild; the scanner never depends on which
/// one is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Delimiter {
    /// `2024-05-01, Jane Doe, 10:00, 20:00`
    #[default]
    Comma,

    /// `2024-05-01 Jane Doe 10:00 20:00`
    Space,
}

impl Delimiter {
    /// Separator placed between fields
    pub fn separator(&self) -> &'static str {
        match self {
            Delimiter::Comma => ", ",
            Delimiter::Space => " ",
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "space" | " " => Ok(Delimiter::Space),
            other => Err(format!("unknown delimiter '{}' (expected comma or space)", other)),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Space => write!(f, "space"),
        }
    }
}

/// Which column holds employee names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum NameColumn {
    /// The first header (within the preview window) containing a name keyword
    #[default]
    Auto,

    /// 1-based column number
    Index(usize),

    /// Exact header text
    Name(String),
}

impl FromStr for NameColumn {
    type Err = String;

    /// Digits are read as a 1-based column number, anything else as a header
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(NameColumn::Auto);
        }
        match s.parse::<usize>() {
            Ok(index) => Ok(NameColumn::Index(index)),
            Err(_) => Ok(NameColumn::Name(s.to_string())),
        }
    }
}

/// Which worksheets of a workbook are read
///
/// Ignored for delimited text, which has a single table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// Every sheet whose name has no excluded keyword, stacked in order
    #[default]
    All,

    /// 0-based sheet index
    Index(usize),

    /// Sheet name
    Name(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("comma".parse::<Delimiter>().unwrap(), Delimiter::Comma);
        assert_eq!(" SPACE ".parse::<Delimiter>().unwrap(), Delimiter::Space);
        assert_eq!(",".parse::<Delimiter>().unwrap(), Delimiter::Comma);
        assert!("tab".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_delimiter_display_round_trips() {
        for d in [Delimiter::Comma, Delimiter::Space] {
            assert_eq!(d.to_string().parse::<Delimiter>().unwrap(), d);
        }
    }

    #[test]
    fn test_name_column_from_str() {
        assert_eq!("".parse::<NameColumn>().unwrap(), NameColumn::Auto);
        assert_eq!("3".parse::<NameColumn>().unwrap(), NameColumn::Index(3));
        assert_eq!(
            "ПІП".parse::<NameColumn>().unwrap(),
            NameColumn::Name("ПІП".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Delimiter::default(), Delimiter::Comma);
        assert_eq!(NameColumn::default(), NameColumn::Auto);
        assert_eq!(SheetSelector::default(), SheetSelector::All);
    }
}
