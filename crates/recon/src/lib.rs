//! `placerecon`: place-candidate reconciliation engine.
//!
//! Pure engine crate: receives a loaded table, scores every scraped candidate
//! against its query, keeps one winner per identifier, and classifies the
//! winner's coordinates against a region box. No CLI or file-format IO.

pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod geo;
pub mod model;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod scoring;
pub mod select;
pub mod similarity;
pub mod table;

pub use config::ReconConfig;
pub use engine::run;
pub use error::{ReconError, Stage};
pub use model::{AnnotatedRecord, LocationStatus, ReconResult, ReconSummary, RegionCluster, ValidationLabel};
pub use select::Selection;
pub use table::{CellValue, Table};
