use std::str::FromStr;

use crate::model::{AnnotatedRecord, LocationStatus, ReconResult, ValidationLabel};
use crate::table::Table;

/// Named subsets of a run's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Found, inside the region, and the winner of its group.
    Verified,
    Review,
    Outside,
    CoordinateErrors,
    Winners,
}

impl Selection {
    pub const ALL: [Selection; 5] = [
        Self::Verified,
        Self::Review,
        Self::Outside,
        Self::CoordinateErrors,
        Self::Winners,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Review => "review",
            Self::Outside => "outside",
            Self::CoordinateErrors => "coordinate-errors",
            Self::Winners => "winners",
        }
    }

    pub fn matches(self, record: &AnnotatedRecord) -> bool {
        match self {
            Self::Verified => {
                record.validation_label() == ValidationLabel::Found
                    && record.location_status() == LocationStatus::InRegion
                    && record.is_winner()
            }
            Self::Review => record.validation_label() == ValidationLabel::NeedsReview,
            Self::Outside => record.location_status() == LocationStatus::OutOfRegion,
            Self::CoordinateErrors => record.location_status() == LocationStatus::CoordinateError,
            Self::Winners => record.is_winner(),
        }
    }

    /// Rows of the output table whose record matches. Same headers.
    pub fn apply(self, result: &ReconResult) -> Table {
        Table {
            headers: result.table.headers.clone(),
            rows: result
                .records
                .iter()
                .zip(&result.table.rows)
                .filter(|(record, _)| self.matches(record))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sel| sel.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|sel| sel.name()).collect();
                format!("unknown selection '{s}', expected one of: {}", names.join(", "))
            })
    }
}
