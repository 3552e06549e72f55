use log::info;

use crate::config::{LabelSet, ReconConfig, DERIVED_COLUMNS};
use crate::error::ReconError;
use crate::geo::{classify_locations, GeoClassifier};
use crate::model::{AnnotatedRecord, ReconMeta, ReconResult};
use crate::report::compute_summary;
use crate::resolve::resolve_table;
use crate::scoring::{score_table, Scorer};
use crate::table::{CellValue, Table};

/// Run the pipeline per config: score, resolve, classify, render.
/// A missing required column aborts the run before any row is processed.
pub fn run(config: &ReconConfig, input: &Table) -> Result<ReconResult, ReconError> {
    let mut table = input.clone();
    table.sanitize();
    info!("run '{}': {} rows, {} columns", config.name, table.len(), table.headers.len());

    let scorer = Scorer::new(config.scoring, config.thresholds);
    let scored = score_table(&table, &config.columns, &scorer)?;

    let resolved = resolve_table(&table, &config.columns, scored)?;

    let classifier = GeoClassifier::new(config.region.clone());
    let records = classify_locations(&table, &config.columns, &classifier, resolved)?;

    let rendered = render_table(&table.headers, &records, &config.labels());
    let output = reorder_columns(&rendered, &config.column_order());

    let summary = compute_summary(&records);
    info!(
        "run complete: {} rows, {} winners, {} duplicates, {} coordinate errors",
        summary.total_rows, summary.winner_count, summary.duplicate_count, summary.coordinate_error_count
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            region: config.region.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        records,
        table: output,
    })
}

/// Input columns (stale derived columns dropped) followed by the derived
/// columns, one row per record in resolution order.
pub fn render_table(headers: &[String], records: &[AnnotatedRecord], labels: &LabelSet) -> Table {
    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !DERIVED_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut out_headers: Vec<String> = kept.iter().map(|&i| headers[i].clone()).collect();
    out_headers.extend(DERIVED_COLUMNS.iter().map(|c| c.to_string()));
    let mut table = Table::new(out_headers);

    for r in records {
        let cells = &r.resolved.scored.record.cells;
        let mut row: Vec<CellValue> = kept
            .iter()
            .map(|&i| cells.get(i).cloned().unwrap_or_default())
            .collect();
        row.extend([
            CellValue::Number(r.similarity_score()),
            CellValue::Text(labels.validation(r.validation_label()).to_string()),
            CellValue::Bool(r.is_winner()),
            CellValue::Text(labels.location(r.location_status()).to_string()),
            CellValue::from_optional_f64(r.geo.clean_latitude),
            CellValue::from_optional_f64(r.geo.clean_longitude),
            CellValue::Text(labels.cluster(r.geo.region_cluster).to_string()),
        ]);
        table.push_row(row);
    }
    table
}

/// Preferred columns that exist come first in preferred order; the rest
/// follow in their current order.
pub fn reorder_columns(table: &Table, preferred: &[String]) -> Table {
    let mut order: Vec<usize> = Vec::with_capacity(table.headers.len());
    for name in preferred {
        if let Some(i) = table.column_index(name) {
            if !order.contains(&i) {
                order.push(i);
            }
        }
    }
    for i in 0..table.headers.len() {
        if !order.contains(&i) {
            order.push(i);
        }
    }

    Table {
        headers: order.iter().map(|&i| table.headers[i].clone()).collect(),
        rows: table
            .rows
            .iter()
            .map(|row| order.iter().map(|&i| row[i].clone()).collect())
            .collect(),
    }
}

/// Parse CSV text into a table of text cells. Header row required.
pub fn load_csv_table(csv_data: &str) -> Result<Table, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        table.push_row(record.iter().map(CellValue::from).collect());
    }
    Ok(table)
}
