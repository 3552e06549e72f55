//! In-memory table: the unit of exchange between file I/O and the engine.

use std::fmt;

use serde::Serialize;

use crate::error::{ReconError, Stage};

/// A single loosely typed cell, as read from a CSV or workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_nan(),
            Self::Bool(_) => false,
        }
    }

    /// Text form of a non-empty cell. Blank text and NaN count as missing.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }

    pub fn from_optional_f64(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            // Integers without decimals, everything else in shortest round-trip form
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Rows x named columns. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Append a row, padding short rows with `Empty` and dropping overflow cells.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        let width = self.headers.len();
        if row.len() > width {
            let dropped = row[width..].iter().filter(|c| !c.is_empty()).count();
            if dropped > 0 {
                log::warn!(
                    "data row {}: {} cells but {} headers, dropping {} non-empty trailing cell(s)",
                    self.rows.len() + 1,
                    row.len(),
                    width,
                    dropped
                );
            }
        }
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every required column to its index, or fail naming all missing ones.
    pub fn require(&self, names: &[&str], stage: Stage) -> Result<Vec<usize>, ReconError> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(ReconError::MissingColumns { stage, columns: missing })
        }
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Copy of this table keeping only the rows accepted by `keep`.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Clean every text cell in place: strip zero-width characters, fold line
    /// breaks into spaces and trim.
    pub fn sanitize(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if let CellValue::Text(s) = cell {
                    let cleaned = sanitize_text(s);
                    *cell = if cleaned.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(cleaned)
                    };
                }
            }
        }
    }
}

fn sanitize_text(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}'))
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
