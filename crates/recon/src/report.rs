use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ReconError;
use crate::model::{
    AnnotatedRecord, LocationStatus, ReconMeta, ReconResult, ReconSummary, ScoreStats, ValidationLabel,
};

/// Compute summary statistics from annotated records.
pub fn compute_summary(records: &[AnnotatedRecord]) -> ReconSummary {
    let mut validation_counts = BTreeMap::new();
    let mut location_counts = BTreeMap::new();
    let mut cluster_counts = BTreeMap::new();
    let mut winner_count = 0;

    for r in records {
        *validation_counts.entry(r.validation_label()).or_insert(0) += 1;
        *location_counts.entry(r.location_status()).or_insert(0) += 1;
        *cluster_counts.entry(r.geo.region_cluster).or_insert(0) += 1;
        if r.is_winner() {
            winner_count += 1;
        }
    }

    let scores: Vec<f64> = records.iter().map(AnnotatedRecord::similarity_score).collect();

    ReconSummary {
        total_rows: records.len(),
        duplicate_count: validation_counts.get(&ValidationLabel::Duplicate).copied().unwrap_or(0),
        coordinate_error_count: location_counts
            .get(&LocationStatus::CoordinateError)
            .copied()
            .unwrap_or(0),
        validation_counts,
        location_counts,
        cluster_counts,
        similarity: score_stats(&scores),
        winner_count,
    }
}

/// Mean, median, sample standard deviation, min and max.
pub fn score_stats(scores: &[f64]) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats::default();
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let std = (scores.len() >= 2).then(|| {
        let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    });

    ScoreStats {
        mean: Some(mean),
        median: Some(median),
        std,
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}

/// Distribution entries with their share of `total`, largest count first.
/// Equal counts keep the key order.
pub fn ranked<K: Copy + Ord>(counts: &BTreeMap<K, usize>, total: usize) -> Vec<(K, usize, f64)> {
    let mut entries: Vec<(K, usize, f64)> = counts
        .iter()
        .map(|(&k, &count)| {
            let pct = if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };
            (k, count, pct)
        })
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Machine-readable report: run metadata plus the summary.
#[derive(Debug, Serialize)]
pub struct ReconReport<'a> {
    pub meta: &'a ReconMeta,
    pub summary: &'a ReconSummary,
}

impl<'a> From<&'a ReconResult> for ReconReport<'a> {
    fn from(result: &'a ReconResult) -> Self {
        Self { meta: &result.meta, summary: &result.summary }
    }
}

pub fn to_json(result: &ReconResult) -> Result<serde_json::Value, ReconError> {
    serde_json::to_value(ReconReport::from(result))
        .map_err(|e| ReconError::Serialization(e.to_string()))
}
