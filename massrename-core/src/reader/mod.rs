//! Spreadsheet reader using calamine

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;

pub mod dataset;

pub use dataset::{CellValue, TabularDataset};

use crate::error::{RenameError, Result};

/// Read one sheet of a spreadsheet file into a [`TabularDataset`].
///
/// Any format calamine understands is accepted (xlsx, xlsm, xlsb, xls, ods).
/// When `sheet` is `None` the first sheet is read.
pub fn read_dataset<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<TabularDataset> {
    let path = path.as_ref();
    let parse_error = |source| RenameError::MappingParse {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(parse_error)?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(RenameError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: name.to_string(),
                });
            }
            workbook.worksheet_range(name).map_err(parse_error)?
        }
        // A workbook without sheets has nothing to map
        None => match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(parse_error)?,
            None => Range::empty(),
        },
    };

    let dataset = range_to_dataset(&range);
    debug!(
        target: "massrename",
        event = "dataset_read",
        path = %path.display(),
        rows = dataset.len()
    );
    Ok(dataset)
}

/// Convert a calamine range into absolutely positioned rows.
fn range_to_dataset(range: &Range<Data>) -> TabularDataset {
    let Some((start_row, start_col)) = range.start() else {
        return TabularDataset::default();
    };

    // Blank leading rows still count towards the header rows
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];

    for data_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col as usize];
        row.extend(data_row.iter().map(parse_cell_value));
        rows.push(row);
    }

    TabularDataset::new(rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
