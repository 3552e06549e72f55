use std::collections::BTreeMap;

use log::{info, warn};

use crate::config::{ColumnMapping, RegionProfile};
use crate::coords::{parse_coordinate, Axis};
use crate::error::{ReconError, Stage};
use crate::model::{AnnotatedRecord, GeoAnnotation, LocationStatus, RegionCluster, ResolvedRecord};
use crate::table::{CellValue, Table};

/// Bounding-box test against one region profile.
///
/// Two independent inclusive range checks, not a polygon: the box overshoots
/// the real boundary in places and clips parts of the coast.
#[derive(Debug, Clone)]
pub struct GeoClassifier {
    region: RegionProfile,
}

impl GeoClassifier {
    pub fn new(region: RegionProfile) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &RegionProfile {
        &self.region
    }

    pub fn annotate(&self, raw_lat: &CellValue, raw_lon: &CellValue) -> GeoAnnotation {
        let envelope = &self.region.envelope;
        let clean_latitude = parse_coordinate(raw_lat, Axis::Latitude, envelope);
        let clean_longitude = parse_coordinate(raw_lon, Axis::Longitude, envelope);
        let location_status = self.status(clean_latitude, clean_longitude);
        GeoAnnotation {
            location_status,
            clean_latitude,
            clean_longitude,
            region_cluster: RegionCluster::from(location_status),
        }
    }

    /// Status for already-parsed coordinates.
    pub fn status(&self, lat: Option<f64>, lon: Option<f64>) -> LocationStatus {
        match (lat, lon) {
            (Some(lat), Some(lon)) if self.region.contains(lat, lon) => LocationStatus::InRegion,
            (Some(_), Some(_)) => LocationStatus::OutOfRegion,
            _ => LocationStatus::CoordinateError,
        }
    }

    pub fn classify(&self, raw_lat: &CellValue, raw_lon: &CellValue) -> LocationStatus {
        self.annotate(raw_lat, raw_lon).location_status
    }
}

/// Geo classification stage. Coordinates are read from the original cells of
/// each record; the coordinate columns must exist in the input table.
pub fn classify_locations(
    table: &Table,
    columns: &ColumnMapping,
    classifier: &GeoClassifier,
    resolved: Vec<ResolvedRecord>,
) -> Result<Vec<AnnotatedRecord>, ReconError> {
    let idx = table.require(&columns.coordinate_columns(), Stage::GeoClassification)?;
    let (lat_idx, lon_idx) = (idx[0], idx[1]);
    info!("classifying {} rows against region '{}'", resolved.len(), classifier.region().name);

    let mut distribution: BTreeMap<LocationStatus, usize> = BTreeMap::new();
    let annotated: Vec<AnnotatedRecord> = resolved
        .into_iter()
        .map(|resolved| {
            let cells = &resolved.scored.record.cells;
            let geo = classifier.annotate(&cells[lat_idx], &cells[lon_idx]);
            *distribution.entry(geo.location_status).or_insert(0) += 1;
            AnnotatedRecord { resolved, geo }
        })
        .collect();

    info!("location distribution: {distribution:?}");
    let unusable = distribution.get(&LocationStatus::CoordinateError).copied().unwrap_or(0);
    if unusable > 0 {
        warn!("{unusable} rows have unusable coordinates, labeled coordinate error");
    }
    Ok(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateRecord, ScoredRecord, ValidationLabel};

    fn classifier() -> GeoClassifier {
        GeoClassifier::new(RegionProfile::default())
    }

    #[test]
    fn inside_box() {
        let status = classifier().classify(&CellValue::Number(-7.20), &CellValue::Number(112.70));
        assert_eq!(status, LocationStatus::InRegion);
    }

    #[test]
    fn south_of_box() {
        let status = classifier().classify(&CellValue::Number(-7.50), &CellValue::Number(112.70));
        assert_eq!(status, LocationStatus::OutOfRegion);
    }

    #[test]
    fn missing_latitude_is_coordinate_error() {
        let status = classifier().classify(&CellValue::Empty, &CellValue::Number(112.70));
        assert_eq!(status, LocationStatus::CoordinateError);
    }

    #[test]
    fn implausible_longitude_is_coordinate_error() {
        let ann = classifier().annotate(&"-7.2".into(), &"12.7".into());
        assert_eq!(ann.location_status, LocationStatus::CoordinateError);
        assert_eq!(ann.clean_latitude, Some(-7.2));
        assert_eq!(ann.clean_longitude, None);
        assert_eq!(ann.region_cluster, RegionCluster::Unknown);
    }

    #[test]
    fn corrupted_text_coordinates_are_recovered() {
        let ann = classifier().annotate(&"-7.265.432".into(), &"112.745.123".into());
        assert_eq!(ann.location_status, LocationStatus::InRegion);
        assert_eq!(ann.region_cluster, RegionCluster::TargetRegion);
        assert_eq!(ann.clean_latitude, Some(-7.265432));
        assert_eq!(ann.clean_longitude, Some(112.745123));
    }

    #[test]
    fn box_edges_are_inclusive() {
        let c = classifier();
        assert_eq!(c.status(Some(-7.36), Some(112.88)), LocationStatus::InRegion);
        assert_eq!(c.status(Some(-7.15), Some(112.59)), LocationStatus::InRegion);
        assert_eq!(c.status(Some(-7.15), Some(112.89)), LocationStatus::OutOfRegion);
    }

    #[test]
    fn other_region_profile() {
        let jakarta = RegionProfile {
            name: "Jakarta".into(),
            lat_min: -6.40,
            lat_max: -6.08,
            lon_min: 106.68,
            lon_max: 106.98,
            ..RegionProfile::default()
        };
        let c = GeoClassifier::new(jakarta);
        assert_eq!(c.status(Some(-6.2), Some(106.8)), LocationStatus::InRegion);
        assert_eq!(c.status(Some(-7.2), Some(112.7)), LocationStatus::OutOfRegion);
    }

    fn resolved(source_row: usize, cells: Vec<CellValue>) -> ResolvedRecord {
        ResolvedRecord {
            scored: ScoredRecord {
                record: CandidateRecord {
                    source_row,
                    identifier: None,
                    query: None,
                    place_name: None,
                    address: None,
                    cells,
                },
                similarity_score: 0.4,
                score_label: ValidationLabel::NotFound,
            },
            validation_label: ValidationLabel::NotFound,
            is_winner: false,
        }
    }

    #[test]
    fn stage_flags_unusable_coordinates_per_row() {
        let table = Table::new(vec!["Latitude".into(), "Longitude".into()]);
        let records = vec![
            resolved(0, vec!["-7.2".into(), "112.7".into()]),
            resolved(1, vec!["abc".into(), "112.7".into()]),
            resolved(2, vec![CellValue::Empty, CellValue::Empty]),
        ];
        let annotated =
            classify_locations(&table, &ColumnMapping::default(), &classifier(), records).unwrap();
        let statuses: Vec<LocationStatus> = annotated.iter().map(|r| r.geo.location_status).collect();
        assert_eq!(
            statuses,
            vec![
                LocationStatus::InRegion,
                LocationStatus::CoordinateError,
                LocationStatus::CoordinateError
            ]
        );
        assert_eq!(annotated[1].resolved.scored.record.source_row, 1);
    }

    #[test]
    fn stage_requires_coordinate_columns() {
        let table = Table::new(vec!["Latitude".into()]);
        let err = classify_locations(&table, &ColumnMapping::default(), &classifier(), Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "geo classification: missing column(s) 'Longitude'");
    }
}
