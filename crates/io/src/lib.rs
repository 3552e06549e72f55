//! Table file I/O for placerecon: CSV/TSV, Excel workbooks and JSON.
//!
//! Format is chosen by file extension.

use std::path::Path;

use placerecon::{ReconError, Table};

pub mod csv;
pub mod json;
pub mod xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    /// xlsx, xlsm, xls, xlsb, ods. Only xlsx can be written.
    Excel,
    /// Export only.
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, ReconError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            "" => Err(ReconError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(ReconError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Load a table. `sheet` selects a worksheet in Excel files and is ignored otherwise.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, ReconError> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::import(path)?,
        TableFormat::Tsv => csv::import_tsv(path)?,
        TableFormat::Excel => xlsx::import(path, sheet)?,
        TableFormat::Json => {
            return Err(ReconError::UnsupportedFormat(
                "JSON is an output-only format".to_string(),
            ))
        }
    };
    log::info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

pub fn save_table(table: &Table, path: &Path) -> Result<(), ReconError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::export(table, path)?,
        TableFormat::Tsv => csv::export_tsv(table, path)?,
        TableFormat::Excel => {
            let is_xlsx = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
            if !is_xlsx {
                return Err(ReconError::UnsupportedFormat(format!(
                    "{}: only .xlsx can be written",
                    path.display()
                )));
            }
            xlsx::export(table, path)?
        }
        TableFormat::Json => json::export(table, path)?,
    }
    log::info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
