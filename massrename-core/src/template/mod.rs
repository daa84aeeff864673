//! Example mapping spreadsheet for users to fill in

mod xlsx_writer;

pub use xlsx_writer::write_rows_xlsx;

use anyhow::Result;
use std::path::Path;

/// Sheet name used in the template workbook
pub const TEMPLATE_SHEET: &str = "Mapping";

/// Title row; skipped when the mapping is read back
pub const TEMPLATE_TITLE: &str = "Mass File Rename";

/// Column headings; skipped when the mapping is read back
pub const TEMPLATE_HEADINGS: [&str; 3] = ["Current name", "New name", "New extension"];

const TEMPLATE_EXAMPLES: [[&str; 3]; 3] = [
    ["IMG_0001", "holiday-beach", "jpg"],
    ["scan_042", "invoice-2024-03", ""],
    ["notes", "", "md"],
];

/// Rows of the template sheet: title, headings, then example mappings
pub fn template_rows() -> Vec<Vec<&'static str>> {
    let mut rows = vec![vec![TEMPLATE_TITLE], TEMPLATE_HEADINGS.to_vec()];
    rows.extend(TEMPLATE_EXAMPLES.iter().map(|row| row.to_vec()));
    rows
}

/// Write the template mapping spreadsheet to `path`
pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
    write_rows_xlsx(path.as_ref(), TEMPLATE_SHEET, &template_rows())
}
