//! Mapping table built from the rows of a mapping spreadsheet

use std::collections::HashMap;
use tracing::debug;

use crate::reader::TabularDataset;

/// Title and column-heading rows at the top of every mapping sheet.
pub const HEADER_ROWS: usize = 2;

const COL_ORIGINAL: usize = 0;
const COL_TARGET_NAME: usize = 1;
const COL_TARGET_EXT: usize = 2;

/// One row's worth of target name/extension override.
///
/// Empty targets mean "keep the source file's own value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntry {
    pub original_base_name: String,
    pub target_base_name: String,
    pub target_extension: String,
}

impl MappingEntry {
    pub fn new(
        original_base_name: impl Into<String>,
        target_base_name: impl Into<String>,
        target_extension: impl Into<String>,
    ) -> Self {
        Self {
            original_base_name: original_base_name.into(),
            target_base_name: target_base_name.into(),
            target_extension: target_extension.into(),
        }
    }
}

/// Lookup from original base name to its mapping entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    /// Build the table from a dataset.
    ///
    /// The first [`HEADER_ROWS`] rows are skipped whatever they contain. Every
    /// other row becomes an entry keyed by its first cell; a later row with
    /// the same key replaces the earlier one. Missing cells read as empty.
    pub fn from_dataset(dataset: &TabularDataset) -> Self {
        let mut entries = HashMap::new();

        for row in dataset.rows().iter().skip(HEADER_ROWS) {
            let cell = |col: usize| {
                row.get(col)
                    .map(|c| c.to_text().into_owned())
                    .unwrap_or_default()
            };

            let entry = MappingEntry::new(
                cell(COL_ORIGINAL),
                cell(COL_TARGET_NAME),
                cell(COL_TARGET_EXT),
            );
            entries.insert(entry.original_base_name.clone(), entry);
        }

        debug!(target: "massrename", event = "mapping_built", entries = entries.len());
        Self { entries }
    }

    pub fn get(&self, original_base_name: &str) -> Option<&MappingEntry> {
        self.entries.get(original_base_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All original base names with an entry
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<MappingEntry> for MappingTable {
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|e| (e.original_base_name.clone(), e))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;

    fn headers() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Mass File Rename"],
            vec!["Current name", "New name", "New extension"],
        ]
    }

    #[test]
    fn test_fewer_than_header_rows_is_empty() {
        assert!(MappingTable::from_dataset(&TabularDataset::default()).is_empty());

        let one_row = TabularDataset::from_text_rows([vec!["a", "b", "png"]]);
        assert!(MappingTable::from_dataset(&one_row).is_empty());

        let two_rows = TabularDataset::from_text_rows([vec!["a", "b", "png"], vec!["c", "d", "jpg"]]);
        assert!(MappingTable::from_dataset(&two_rows).is_empty());
    }

    #[test]
    fn test_rows_after_headers_become_entries() {
        let mut rows = headers();
        rows.push(vec!["a", "b", "png"]);
        rows.push(vec!["c", "", "jpg"]);
        let table = MappingTable::from_dataset(&TabularDataset::from_text_rows(rows));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(&MappingEntry::new("a", "b", "png")));
        assert_eq!(table.get("c"), Some(&MappingEntry::new("c", "", "jpg")));
        assert_eq!(table.get("Current name"), None);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let mut rows = headers();
        rows.push(vec!["report", "first", "pdf"]);
        rows.push(vec!["other", "x", ""]);
        rows.push(vec!["report", "second", ""]);
        let table = MappingTable::from_dataset(&TabularDataset::from_text_rows(rows));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("report"), Some(&MappingEntry::new("report", "second", "")));
    }

    #[test]
    fn test_short_rows_yield_empty_fields() {
        let mut rows = headers();
        rows.push(vec!["lonely"]);
        rows.push(vec![]);
        let table = MappingTable::from_dataset(&TabularDataset::from_text_rows(rows));

        assert_eq!(table.get("lonely"), Some(&MappingEntry::new("lonely", "", "")));
        // A row without cells is still an entry, keyed by the empty name
        assert_eq!(table.get(""), Some(&MappingEntry::default()));
    }

    #[test]
    fn test_numeric_cells_are_rendered_as_text() {
        let dataset = TabularDataset::new(vec![
            vec![],
            vec![],
            vec![
                CellValue::Number(1001.0),
                CellValue::Text("invoice".into()),
                CellValue::Empty,
            ],
        ]);
        let table = MappingTable::from_dataset(&dataset);
        assert_eq!(table.get("1001"), Some(&MappingEntry::new("1001", "invoice", "")));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut rows = headers();
        rows.push(vec!["a", "b", "png"]);
        rows.push(vec!["a", "c", ""]);
        let dataset = TabularDataset::from_text_rows(rows);

        assert_eq!(
            MappingTable::from_dataset(&dataset),
            MappingTable::from_dataset(&dataset)
        );
    }
}
