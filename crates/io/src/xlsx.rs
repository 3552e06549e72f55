// Excel import (xlsx, xls, xlsb, ods) and xlsx export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook};

use placerecon::{CellValue, ReconError, Table};

/// xlsx row limit, header included.
const MAX_ROWS: usize = 1_048_576;
/// xlsx column limit.
const MAX_COLS: usize = 16_384;

/// Import the named sheet, or the first sheet when `sheet` is `None`.
/// The first row of the used range is the header.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, ReconError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ReconError::Io(format!("Failed to open Excel file: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                ReconError::Io(format!(
                    "sheet '{name}' not found, available: {}",
                    sheet_names.join(", ")
                ))
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReconError::Io("Excel file contains no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::Io(format!("Failed to read sheet '{sheet_name}': {e}")))?;
    log::debug!("reading sheet '{sheet_name}' from {}", path.display());

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| convert_cell(c).to_string().trim().to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }
    Ok(table)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Errors as their text representation
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        // Dates keep their serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}

/// Export one worksheet: bold, frozen header row, typed cells.
pub fn export(table: &Table, path: &Path) -> Result<(), ReconError> {
    if table.len() + 1 > MAX_ROWS || table.headers.len() > MAX_COLS {
        return Err(ReconError::Io(format!(
            "{} rows x {} columns exceeds the xlsx sheet limit",
            table.len(),
            table.headers.len()
        )));
    }

    let xlsx_err = |e: rust_xlsxwriter::XlsxError| ReconError::Io(format!("Failed to write XLSX: {e}"));
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, name) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(xlsx_err)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;

    for (r, row) in table.rows.iter().enumerate() {
        let row32 = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let col16 = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row32, col16, s).map_err(xlsx_err)?;
                }
                CellValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(row32, col16, *n).map_err(xlsx_err)?;
                }
                CellValue::Number(_) => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row32, col16, *b).map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ReconError::Io(format!("Failed to save XLSX file: {e}")))?;
    Ok(())
}
