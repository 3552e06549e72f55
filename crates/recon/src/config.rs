use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{LocationStatus, RegionCluster, ValidationLabel};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Immutable run configuration. Every section is optional; the defaults are the
/// Surabaya profile the scraped data was collected for.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub thresholds: SimilarityThresholds,
    #[serde(default)]
    pub region: RegionProfile,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "place-recon".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            columns: ColumnMapping::default(),
            scoring: ScoringWeights::default(),
            thresholds: SimilarityThresholds::default(),
            region: RegionProfile::default(),
            labels: LabelConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Input column names for the fields the engine reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    pub identifier: String,
    pub query: String,
    pub place_name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            identifier: "idsbr".into(),
            query: "Query".into(),
            place_name: "Actual Place Name".into(),
            address: "Address".into(),
            latitude: "Latitude".into(),
            longitude: "Longitude".into(),
        }
    }
}

impl ColumnMapping {
    /// Columns the scorer and resolver need.
    pub fn match_columns(&self) -> [&str; 4] {
        [&self.identifier, &self.query, &self.place_name, &self.address]
    }

    /// Columns the geo classifier needs.
    pub fn coordinate_columns(&self) -> [&str; 2] {
        [&self.latitude, &self.longitude]
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Blend of the two similarity ratios. Must sum to 1.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Weight of query vs. "place name + address".
    pub combined: f64,
    /// Weight of query vs. place name alone.
    pub place: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { combined: 0.6, place: 0.4 }
    }
}

/// Score cut-offs for the validation label.
///
/// `low` is carried and validated but the classifier never reads it: only
/// `high` and `medium` separate the three score-based labels.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self { high: 0.75, medium: 0.60, low: 0.45 }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Target region: an inclusive lat/lon box plus the plausibility envelope raw
/// coordinates must fall in before they count as parsed at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionProfile {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub envelope: CoordinateEnvelope,
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self {
            name: "Surabaya".into(),
            lat_min: -7.36,
            lat_max: -7.15,
            lon_min: 112.59,
            lon_max: 112.88,
            envelope: CoordinateEnvelope::default(),
        }
    }
}

impl RegionProfile {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let lat_in = self.lat_min <= lat && lat <= self.lat_max;
        let lon_in = self.lon_min <= lon && lon <= self.lon_max;
        lat_in && lon_in
    }
}

/// National-scale sanity range. Defaults cover Indonesia.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinateEnvelope {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for CoordinateEnvelope {
    fn default() -> Self {
        Self { lat_min: -12.0, lat_max: 8.0, lon_min: 95.0, lon_max: 142.0 }
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPreset {
    #[default]
    En,
    /// Indonesian labels, as used in the survey sheets.
    Id,
}

/// Label text written into the output table. Unset fields fall back to the preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub preset: LabelPreset,
    pub found: Option<String>,
    pub needs_review: Option<String>,
    pub not_found: Option<String>,
    pub duplicate: Option<String>,
    pub in_region: Option<String>,
    pub out_of_region: Option<String>,
    pub coordinate_error: Option<String>,
    pub target_region: Option<String>,
    pub outside_region: Option<String>,
    pub unknown: Option<String>,
}

/// Fully resolved label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    pub found: String,
    pub needs_review: String,
    pub not_found: String,
    pub duplicate: String,
    pub in_region: String,
    pub out_of_region: String,
    pub coordinate_error: String,
    pub target_region: String,
    pub outside_region: String,
    pub unknown: String,
}

impl LabelSet {
    pub fn preset(preset: LabelPreset, region_name: &str) -> Self {
        match preset {
            LabelPreset::En => Self {
                found: "Found".into(),
                needs_review: "Needs Review".into(),
                not_found: "Not Found".into(),
                duplicate: "Duplicate".into(),
                in_region: "in_region".into(),
                out_of_region: "out_of_region".into(),
                coordinate_error: "coordinate_error".into(),
                target_region: region_name.into(),
                outside_region: format!("Outside {region_name}"),
                unknown: "Unknown".into(),
            },
            LabelPreset::Id => {
                let lowered = region_name.to_lowercase();
                Self {
                    found: "Ditemukan".into(),
                    needs_review: "Perlu Review".into(),
                    not_found: "Tidak Ditemukan".into(),
                    duplicate: "Duplikat".into(),
                    in_region: format!("di{lowered}"),
                    out_of_region: format!("tidak di{lowered}"),
                    coordinate_error: "error_koordinat".into(),
                    target_region: region_name.into(),
                    outside_region: format!("Luar {region_name}"),
                    unknown: "Unknown".into(),
                }
            }
        }
    }

    pub fn validation(&self, label: ValidationLabel) -> &str {
        match label {
            ValidationLabel::Found => &self.found,
            ValidationLabel::NeedsReview => &self.needs_review,
            ValidationLabel::NotFound => &self.not_found,
            ValidationLabel::Duplicate => &self.duplicate,
        }
    }

    pub fn location(&self, status: LocationStatus) -> &str {
        match status {
            LocationStatus::InRegion => &self.in_region,
            LocationStatus::OutOfRegion => &self.out_of_region,
            LocationStatus::CoordinateError => &self.coordinate_error,
        }
    }

    pub fn cluster(&self, cluster: RegionCluster) -> &str {
        match cluster {
            RegionCluster::TargetRegion => &self.target_region,
            RegionCluster::OutsideRegion => &self.outside_region,
            RegionCluster::Unknown => &self.unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Names of the columns the engine appends.
pub const COL_SIMILARITY_SCORE: &str = "similarity_score";
pub const COL_VALIDATION_LABEL: &str = "validation_label";
pub const COL_IS_WINNER: &str = "is_winner";
pub const COL_LOCATION_STATUS: &str = "location_status";
pub const COL_CLEAN_LATITUDE: &str = "clean_latitude";
pub const COL_CLEAN_LONGITUDE: &str = "clean_longitude";
pub const COL_REGION_CLUSTER: &str = "region_cluster";

/// Derived columns in the order they are appended.
pub const DERIVED_COLUMNS: [&str; 7] = [
    COL_SIMILARITY_SCORE,
    COL_VALIDATION_LABEL,
    COL_IS_WINNER,
    COL_LOCATION_STATUS,
    COL_CLEAN_LATITUDE,
    COL_CLEAN_LONGITUDE,
    COL_REGION_CLUSTER,
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Preferred leading columns. `None` uses the built-in order.
    pub column_order: Option<Vec<String>>,
    pub csv: Option<String>,
    pub xlsx: Option<String>,
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn labels(&self) -> LabelSet {
        let l = &self.labels;
        let mut set = LabelSet::preset(l.preset, &self.region.name);
        let overrides = [
            (&l.found, &mut set.found),
            (&l.needs_review, &mut set.needs_review),
            (&l.not_found, &mut set.not_found),
            (&l.duplicate, &mut set.duplicate),
            (&l.in_region, &mut set.in_region),
            (&l.out_of_region, &mut set.out_of_region),
            (&l.coordinate_error, &mut set.coordinate_error),
            (&l.target_region, &mut set.target_region),
            (&l.outside_region, &mut set.outside_region),
            (&l.unknown, &mut set.unknown),
        ];
        for (custom, slot) in overrides {
            if let Some(text) = custom {
                *slot = text.clone();
            }
        }
        set
    }

    /// Preferred leading column order for the output table.
    pub fn column_order(&self) -> Vec<String> {
        if let Some(ref order) = self.output.column_order {
            return order.clone();
        }
        let c = &self.columns;
        vec![
            c.identifier.clone(),
            c.query.clone(),
            c.place_name.clone(),
            "Category".into(),
            "Rating".into(),
            c.address.clone(),
            "Phone Number".into(),
            "Website".into(),
            c.latitude.clone(),
            c.longitude.clone(),
            COL_CLEAN_LATITUDE.into(),
            COL_CLEAN_LONGITUDE.into(),
            "Status".into(),
            "Open Status".into(),
            "Operation Hours".into(),
            COL_SIMILARITY_SCORE.into(),
            COL_VALIDATION_LABEL.into(),
            COL_IS_WINNER.into(),
            COL_LOCATION_STATUS.into(),
            COL_REGION_CLUSTER.into(),
        ]
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let c = &self.columns;
        let names = [
            ("identifier", &c.identifier),
            ("query", &c.query),
            ("place_name", &c.place_name),
            ("address", &c.address),
            ("latitude", &c.latitude),
            ("longitude", &c.longitude),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{field} must not be empty"
                )));
            }
            if DERIVED_COLUMNS.contains(&name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{field} '{name}' collides with a derived output column"
                )));
            }
        }

        let w = &self.scoring;
        if !(w.combined.is_finite() && w.place.is_finite()) {
            return Err(ReconError::ConfigValidation(format!(
                "scoring weights must be finite, got {} + {}",
                w.combined, w.place
            )));
        }
        if w.combined < 0.0 || w.place < 0.0 {
            return Err(ReconError::ConfigValidation(
                "scoring weights must be non-negative".into(),
            ));
        }
        if (w.combined + w.place - 1.0).abs() > 1e-9 {
            return Err(ReconError::ConfigValidation(format!(
                "scoring weights must sum to 1, got {} + {}",
                w.combined, w.place
            )));
        }

        let t = &self.thresholds;
        if ![t.low, t.medium, t.high].iter().all(|v| v.is_finite()) {
            return Err(ReconError::ConfigValidation(format!(
                "thresholds must be finite, got low={} medium={} high={}",
                t.low, t.medium, t.high
            )));
        }
        let ordered = 0.0 <= t.low && t.low <= t.medium && t.medium <= t.high && t.high <= 1.0;
        if !ordered {
            return Err(ReconError::ConfigValidation(format!(
                "thresholds must satisfy 0 <= low <= medium <= high <= 1, got low={} medium={} high={}",
                t.low, t.medium, t.high
            )));
        }

        let r = &self.region;
        let e = &r.envelope;
        if r.lat_min > r.lat_max || r.lon_min > r.lon_max {
            return Err(ReconError::ConfigValidation(format!(
                "region '{}': bounding box min must not exceed max",
                r.name
            )));
        }
        if e.lat_min > e.lat_max || e.lon_min > e.lon_max {
            return Err(ReconError::ConfigValidation(
                "region.envelope: min must not exceed max".into(),
            ));
        }
        let inside = e.lat_min <= r.lat_min
            && r.lat_max <= e.lat_max
            && e.lon_min <= r.lon_min
            && r.lon_max <= e.lon_max;
        if !inside {
            return Err(ReconError::ConfigValidation(format!(
                "region '{}': bounding box lies outside the plausibility envelope",
                r.name
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_surabaya_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config.columns.identifier, "idsbr");
        assert_eq!(config.columns.place_name, "Actual Place Name");
        assert_eq!(config.thresholds.high, 0.75);
        assert_eq!(config.thresholds.medium, 0.60);
        assert_eq!(config.thresholds.low, 0.45);
        assert_eq!(config.scoring.combined, 0.6);
        assert_eq!(config.scoring.place, 0.4);
        assert_eq!(config.region.lat_min, -7.36);
        assert_eq!(config.region.lon_max, 112.88);
        assert_eq!(config.region.envelope.lon_min, 95.0);
        assert_eq!(config.labels().found, "Found");
    }

    #[test]
    fn parse_custom_region_and_labels() {
        let input = r#"
name = "Sidoarjo survey"

[columns]
identifier = "sbr_id"

[region]
name = "Sidoarjo"
lat_min = -7.60
lat_max = -7.30
lon_min = 112.50
lon_max = 112.90

[labels]
preset = "id"
duplicate = "Ganda"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.name, "Sidoarjo survey");
        assert_eq!(config.columns.identifier, "sbr_id");
        assert_eq!(config.columns.query, "Query");
        assert_eq!(config.region.envelope.lat_min, -12.0);

        let labels = config.labels();
        assert_eq!(labels.found, "Ditemukan");
        assert_eq!(labels.duplicate, "Ganda");
        assert_eq!(labels.in_region, "disidoarjo");
        assert_eq!(labels.outside_region, "Luar Sidoarjo");
    }

    #[test]
    fn indonesian_preset_reproduces_source_labels() {
        let labels = LabelSet::preset(LabelPreset::Id, "Surabaya");
        assert_eq!(labels.needs_review, "Perlu Review");
        assert_eq!(labels.not_found, "Tidak Ditemukan");
        assert_eq!(labels.in_region, "disurabaya");
        assert_eq!(labels.out_of_region, "tidak disurabaya");
        assert_eq!(labels.coordinate_error, "error_koordinat");
        assert_eq!(labels.target_region, "Surabaya");
        assert_eq!(labels.outside_region, "Luar Surabaya");
    }

    #[test]
    fn default_column_order_uses_mapped_names() {
        let mut config = ReconConfig::default();
        config.columns.identifier = "sbr_id".into();
        let order = config.column_order();
        assert_eq!(order[0], "sbr_id");
        assert_eq!(order[3], "Category");
        assert_eq!(order.last().map(String::as_str), Some(COL_REGION_CLUSTER));
        assert_eq!(order.len(), 20);
    }

    #[test]
    fn reject_unordered_thresholds() {
        let input = "[thresholds]\nhigh = 0.5\nmedium = 0.6\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("low <= medium <= high"));
    }

    #[test]
    fn reject_weights_not_summing_to_one() {
        let input = "[scoring]\ncombined = 0.7\nplace = 0.4\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn reject_nan_weights() {
        let input = "[scoring]\ncombined = nan\nplace = nan\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
        assert!(err.to_string().contains("scoring weights must be finite"));
    }

    #[test]
    fn reject_nan_threshold() {
        let err = ReconConfig::from_toml("[thresholds]\nmedium = nan\n").unwrap_err();
        assert!(err.to_string().contains("thresholds must be finite"));
    }

    #[test]
    fn reject_inverted_bounding_box() {
        let input = "[region]\nlat_min = -7.0\nlat_max = -7.5\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("min must not exceed max"));
    }

    #[test]
    fn reject_box_outside_envelope() {
        let input = "[region]\nlon_min = 150.0\nlon_max = 151.0\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("outside the plausibility envelope"));
    }

    #[test]
    fn reject_column_colliding_with_derived_output() {
        let input = "[columns]\nquery = \"is_winner\"\n";
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn reject_unknown_key() {
        let err = ReconConfig::from_toml("[thresholds]\nhihg = 0.8\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn region_box_is_inclusive() {
        let region = RegionProfile::default();
        assert!(region.contains(-7.36, 112.59));
        assert!(region.contains(-7.15, 112.88));
        assert!(!region.contains(-7.37, 112.70));
    }
}
