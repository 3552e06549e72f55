use log::info;

use crate::config::{ColumnMapping, ScoringWeights, SimilarityThresholds};
use crate::error::{ReconError, Stage};
use crate::model::{CandidateRecord, ScoredRecord, ValidationLabel};
use crate::normalize::normalize_text;
use crate::similarity::sequence_ratio;
use crate::table::Table;

/// Blended query-vs-candidate similarity plus the score-based label.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    weights: ScoringWeights,
    thresholds: SimilarityThresholds,
}

impl Scorer {
    pub fn new(weights: ScoringWeights, thresholds: SimilarityThresholds) -> Self {
        Self { weights, thresholds }
    }

    /// Score in [0, 1]: query against "place address", blended with query
    /// against the place name alone.
    pub fn score(&self, query: Option<&str>, place_name: Option<&str>, address: Option<&str>) -> f64 {
        let query = normalize_text(query);
        let place = normalize_text(place_name);
        let address = normalize_text(address);

        let combined = format!("{place} {address}");
        let sim_combined = sequence_ratio(&query, &combined);
        let sim_place = sequence_ratio(&query, &place);

        self.weights.combined * sim_combined + self.weights.place * sim_place
    }

    /// `high` and above is Found, `medium` and above NeedsReview, the rest NotFound.
    pub fn classify(&self, score: f64) -> ValidationLabel {
        if score >= self.thresholds.high {
            ValidationLabel::Found
        } else if score >= self.thresholds.medium {
            ValidationLabel::NeedsReview
        } else {
            ValidationLabel::NotFound
        }
    }

    pub fn score_record(&self, record: CandidateRecord) -> ScoredRecord {
        let similarity_score = self.score(
            record.query.as_deref(),
            record.place_name.as_deref(),
            record.address.as_deref(),
        );
        ScoredRecord {
            score_label: self.classify(similarity_score),
            similarity_score,
            record,
        }
    }
}

/// Pull the matching fields out of every row. Fails before touching any row
/// when a matching column is absent.
pub fn extract_candidates(
    table: &Table,
    columns: &ColumnMapping,
    stage: Stage,
) -> Result<Vec<CandidateRecord>, ReconError> {
    let idx = table.require(&columns.match_columns(), stage)?;
    let (id_idx, query_idx, place_idx, address_idx) = (idx[0], idx[1], idx[2], idx[3]);

    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(source_row, row)| CandidateRecord {
            source_row,
            identifier: row[id_idx].as_text().map(|s| s.trim().to_string()),
            query: row[query_idx].as_text(),
            place_name: row[place_idx].as_text(),
            address: row[address_idx].as_text(),
            cells: row.clone(),
        })
        .collect())
}

/// Scoring stage: one scored record per input row, in input order.
pub fn score_table(
    table: &Table,
    columns: &ColumnMapping,
    scorer: &Scorer,
) -> Result<Vec<ScoredRecord>, ReconError> {
    let candidates = extract_candidates(table, columns, Stage::Scoring)?;
    info!("scoring {} rows", candidates.len());

    let scored: Vec<ScoredRecord> = candidates
        .into_iter()
        .map(|record| scorer.score_record(record))
        .collect();

    info!("scoring complete");
    Ok(scored)
}
