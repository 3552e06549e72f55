//! Tolerant coordinate parsing.
//!
//! Source sheets carry coordinates mangled by locale formatting: stray
//! punctuation, thousands separators turned into extra dots, lost signs.
//! Parsing never fails; anything unusable comes back as `None`.

use crate::config::CoordinateEnvelope;
use crate::table::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Digits before the reconstructed decimal point, and the minimum digit
    /// count for reconstruction: `-7.xxx` for latitude, `112.xxx` for longitude.
    fn reconstruction_shape(self) -> (usize, usize) {
        match self {
            Self::Latitude => (1, 2),
            Self::Longitude => (3, 4),
        }
    }

    fn in_envelope(self, value: f64, envelope: &CoordinateEnvelope) -> bool {
        match self {
            Self::Latitude => envelope.lat_min <= value && value <= envelope.lat_max,
            Self::Longitude => envelope.lon_min <= value && value <= envelope.lon_max,
        }
    }
}

/// Parse a raw cell into a coordinate inside the envelope.
pub fn parse_coordinate(raw: &CellValue, axis: Axis, envelope: &CoordinateEnvelope) -> Option<f64> {
    let text = match raw {
        CellValue::Empty | CellValue::Bool(_) => return None,
        CellValue::Number(n) if !n.is_finite() => return None,
        CellValue::Number(n) => n.to_string(),
        CellValue::Text(s) => s.clone(),
    };
    parse_coordinate_str(&text, axis, envelope)
}

pub fn parse_coordinate_str(raw: &str, axis: Axis, envelope: &CoordinateEnvelope) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    let value = if cleaned.matches('.').count() > 1 {
        reconstruct(&cleaned, axis)?
    } else {
        cleaned.parse::<f64>().ok()?
    };

    axis.in_envelope(value, envelope).then_some(value)
}

/// Rebuild a value from a string with several dots by dropping every dot and
/// re-inserting one after the axis' integer digits. Longitude drops the sign.
fn reconstruct(cleaned: &str, axis: Axis) -> Option<f64> {
    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
    let (int_digits, min_digits) = axis.reconstruction_shape();
    if digits.len() < min_digits {
        return None;
    }
    let sign = match axis {
        Axis::Latitude if cleaned.contains('-') => "-",
        _ => "",
    };
    let (int_part, frac_part) = digits.split_at(int_digits);
    format!("{sign}{int_part}.{frac_part}").parse().ok()
}
