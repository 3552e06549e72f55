use std::fmt;

/// Pipeline stage that checked the table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scoring,
    Resolution,
    GeoClassification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scoring => write!(f, "scoring"),
            Self::Resolution => write!(f, "resolution"),
            Self::GeoClassification => write!(f, "geo classification"),
        }
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad thresholds, inverted bounding box, etc.).
    ConfigValidation(String),
    /// Required columns absent from the input table. Raised before any row is touched.
    MissingColumns { stage: Stage, columns: Vec<String> },
    /// Unsupported table file format.
    UnsupportedFormat(String),
    /// IO error (file read, workbook open, etc.).
    Io(String),
    /// JSON serialization of a report or table failed.
    Serialization(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumns { stage, columns } => {
                let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
                write!(f, "{stage}: missing column(s) {}", quoted.join(", "))
            }
            Self::UnsupportedFormat(ext) => write!(f, "unsupported table format: {ext}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_names_every_column() {
        let err = ReconError::MissingColumns {
            stage: Stage::Scoring,
            columns: vec!["Query".into(), "Address".into()],
        };
        assert_eq!(err.to_string(), "scoring: missing column(s) 'Query', 'Address'");
    }
}
