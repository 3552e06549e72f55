use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::config::ColumnMapping;
use crate::error::{ReconError, Stage};
use crate::model::{ResolvedRecord, ScoredRecord, ValidationLabel};
use crate::table::Table;

/// Resolution stage with the schema check up front.
pub fn resolve_table(
    table: &Table,
    columns: &ColumnMapping,
    scored: Vec<ScoredRecord>,
) -> Result<Vec<ResolvedRecord>, ReconError> {
    table.require(&columns.match_columns(), Stage::Resolution)?;
    Ok(resolve(scored))
}

/// Winner-take-all dedup per identifier.
///
/// Rows without an identifier pass through one by one as NotFound. Every
/// identifier group is sorted by score, highest first (stable, so the earliest
/// row wins a tie); the head keeps its score-based label and becomes the
/// winner, the rest become Duplicate whatever their score.
///
/// Output order: identifier-less rows in input order, then groups in
/// ascending identifier order, each group highest score first.
pub fn resolve(scored: Vec<ScoredRecord>) -> Vec<ResolvedRecord> {
    let total = scored.len();
    let mut unidentified: Vec<ScoredRecord> = Vec::new();
    let mut groups: BTreeMap<String, Vec<ScoredRecord>> = BTreeMap::new();

    for record in scored {
        match record.record.identifier.clone() {
            Some(id) => groups.entry(id).or_default().push(record),
            None => unidentified.push(record),
        }
    }

    let mut resolved = Vec::with_capacity(total);

    if !unidentified.is_empty() {
        warn!("{} rows have no identifier, labeled not found", unidentified.len());
    }
    for scored in unidentified {
        resolved.push(ResolvedRecord {
            scored,
            validation_label: ValidationLabel::NotFound,
            is_winner: false,
        });
    }

    let mut duplicates = 0usize;
    for (identifier, mut group) in groups {
        group.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        if group.len() > 1 {
            debug!(
                "identifier '{identifier}': {} candidates, winner row {} scored {:.4}",
                group.len(),
                group[0].record.source_row,
                group[0].similarity_score
            );
        }
        for (rank, scored) in group.into_iter().enumerate() {
            let record = if rank == 0 {
                ResolvedRecord {
                    validation_label: scored.score_label,
                    is_winner: true,
                    scored,
                }
            } else {
                duplicates += 1;
                ResolvedRecord {
                    scored,
                    validation_label: ValidationLabel::Duplicate,
                    is_winner: false,
                }
            };
            resolved.push(record);
        }
    }

    info!("resolution complete: {} rows, {} duplicates", resolved.len(), duplicates);
    resolved
}
