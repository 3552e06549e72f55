// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use placerecon::{ReconError, Table};

/// Table as a JSON array of objects keyed by header, keys in column order.
pub fn to_value(table: &Table) -> Result<serde_json::Value, ReconError> {
    let mut rows = Vec::with_capacity(table.len());
    for row in &table.rows {
        let mut object = serde_json::Map::new();
        for (header, cell) in table.headers.iter().zip(row) {
            let value = serde_json::to_value(cell)
                .map_err(|e| ReconError::Serialization(format!("column '{header}': {e}")))?;
            object.insert(header.clone(), value);
        }
        rows.push(serde_json::Value::Object(object));
    }
    Ok(serde_json::Value::Array(rows))
}

pub fn export(table: &Table, path: &Path) -> Result<(), ReconError> {
    let file = File::create(path).map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_value(table)?).map_err(|e| ReconError::Io(e.to_string()))?;
    Ok(())
}
