// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use placerecon::{CellValue, ReconError, Table};

pub fn import(path: &Path) -> Result<Table, ReconError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_tsv(path: &Path) -> Result<Table, ReconError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, b'\t')
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // (lines agreeing with the header's field count) * field count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed. Scraper exports saved from Excel
/// on Windows arrive as Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReconError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// First record is the header. Cells are text; empty fields are `Empty`.
pub fn import_from_string(content: &str, delimiter: u8) -> Result<Table, ReconError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header
            .map_err(|e| ReconError::Io(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for result in records {
        let record = result.map_err(|e| ReconError::Io(e.to_string()))?;
        table.push_row(record.iter().map(CellValue::from).collect());
    }
    Ok(table)
}

pub fn export(table: &Table, path: &Path) -> Result<(), ReconError> {
    export_with_delimiter(table, path, b',')
}

pub fn export_tsv(table: &Table, path: &Path) -> Result<(), ReconError> {
    export_with_delimiter(table, path, b'\t')
}

fn export_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), ReconError> {
    let io_err = |e: csv::Error| ReconError::Io(format!("{}: {e}", path.display()));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(io_err)?;

    writer.write_record(&table.headers).map_err(io_err)?;
    for row in &table.rows {
        // Display gives integers without decimals, other numbers in shortest
        // round-trip form, booleans as true/false and empty as ""
        let record: Vec<String> = row.iter().map(CellValue::to_string).collect();
        writer.write_record(&record).map_err(io_err)?;
    }

    writer
        .flush()
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
    Ok(())
}
