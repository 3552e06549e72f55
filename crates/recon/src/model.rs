use std::collections::BTreeMap;

use serde::Serialize;

use crate::table::CellValue;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single input row with the matching fields pulled out.
///
/// Blank text fields are `None`. `cells` keeps every original cell, in the
/// input table's column order, so pass-through columns survive untouched.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub source_row: usize,
    pub identifier: Option<String>,
    pub query: Option<String>,
    pub place_name: Option<String>,
    pub address: Option<String>,
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Match verdict. Declared from highest to lowest confidence; `Duplicate` is
/// assigned only by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLabel {
    Found,
    NeedsReview,
    NotFound,
    Duplicate,
}

impl std::fmt::Display for ValidationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::NeedsReview => write!(f, "needs_review"),
            Self::NotFound => write!(f, "not_found"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    InRegion,
    OutOfRegion,
    CoordinateError,
}

impl std::fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InRegion => write!(f, "in_region"),
            Self::OutOfRegion => write!(f, "out_of_region"),
            Self::CoordinateError => write!(f, "coordinate_error"),
        }
    }
}

/// Coarse region bucket. A pure relabeling of [`LocationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCluster {
    TargetRegion,
    OutsideRegion,
    Unknown,
}

impl From<LocationStatus> for RegionCluster {
    fn from(status: LocationStatus) -> Self {
        match status {
            LocationStatus::InRegion => Self::TargetRegion,
            LocationStatus::OutOfRegion => Self::OutsideRegion,
            LocationStatus::CoordinateError => Self::Unknown,
        }
    }
}

impl std::fmt::Display for RegionCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetRegion => write!(f, "target_region"),
            Self::OutsideRegion => write!(f, "outside_region"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: CandidateRecord,
    pub similarity_score: f64,
    /// Label implied by the score alone, before dedup.
    pub score_label: ValidationLabel,
}

#[derive(Debug, Clone)]
pub struct ResolvedRecord {
    pub scored: ScoredRecord,
    pub validation_label: ValidationLabel,
    pub is_winner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoAnnotation {
    pub location_status: LocationStatus,
    pub clean_latitude: Option<f64>,
    pub clean_longitude: Option<f64>,
    pub region_cluster: RegionCluster,
}

#[derive(Debug, Clone)]
pub struct AnnotatedRecord {
    pub resolved: ResolvedRecord,
    pub geo: GeoAnnotation,
}

impl AnnotatedRecord {
    pub fn similarity_score(&self) -> f64 {
        self.resolved.scored.similarity_score
    }

    pub fn validation_label(&self) -> ValidationLabel {
        self.resolved.validation_label
    }

    pub fn is_winner(&self) -> bool {
        self.resolved.is_winner
    }

    pub fn location_status(&self) -> LocationStatus {
        self.geo.location_status
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Distribution of the similarity score. All fields are `None` for an empty
/// table; `std` is the sample deviation and needs at least two rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub validation_counts: BTreeMap<ValidationLabel, usize>,
    pub location_counts: BTreeMap<LocationStatus, usize>,
    pub cluster_counts: BTreeMap<RegionCluster, usize>,
    pub similarity: ScoreStats,
    pub winner_count: usize,
    pub duplicate_count: usize,
    pub coordinate_error_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub region: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub records: Vec<AnnotatedRecord>,
    /// Annotated records rendered as a table, columns reordered for reading.
    pub table: crate::table::Table,
    pub summary: ReconSummary,
}
