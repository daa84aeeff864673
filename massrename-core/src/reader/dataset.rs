//! Tabular dataset data structures

use std::borrow::Cow;

/// Ordered rows of ordered cell values, as read from one sheet.
///
/// Row and column indices are absolute sheet positions: row 0 is the first
/// row of the sheet even when it is blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    rows: Vec<Vec<CellValue>>,
}

impl TabularDataset {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a dataset from plain text rows. Empty strings become empty cells.
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| CellValue::from(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell the way it is used as a file name fragment.
    ///
    /// Whole numbers drop the fractional part (`12.0` becomes `"12"`).
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Boolean(b) => Cow::Owned(b.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Text("scan".into()).to_text(), "scan");
        assert_eq!(CellValue::Number(12.0).to_text(), "12");
        assert_eq!(CellValue::Number(1.5).to_text(), "1.5");
        assert_eq!(CellValue::Boolean(true).to_text(), "true");
    }

    #[test]
    fn test_from_text_rows() {
        let dataset = TabularDataset::from_text_rows([vec!["a", ""], vec!["b"]]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get_cell(0, 0), Some(&CellValue::Text("a".into())));
        assert_eq!(dataset.get_cell(0, 1), Some(&CellValue::Empty));
        assert_eq!(dataset.get_cell(1, 1), None);
    }
}
