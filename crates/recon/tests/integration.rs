use std::path::PathBuf;

use placerecon::config::ReconConfig;
use placerecon::engine::{load_csv_table, run};
use placerecon::model::{LocationStatus, RegionCluster, ValidationLabel};
use placerecon::{CellValue, ReconError, ReconResult, Selection, Stage, Table};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> Table {
    let path = fixtures_dir().join(name);
    let csv_data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    load_csv_table(&csv_data).unwrap()
}

fn load_and_run(config_toml: &str, csv_name: &str) -> ReconResult {
    let config = ReconConfig::from_toml(config_toml).unwrap();
    run(&config, &load_fixture(csv_name)).unwrap()
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.into())
}

/// Output rows for one identifier, in output order.
fn rows_for<'a>(table: &'a Table, id_col: &str, id: &str) -> Vec<&'a Vec<CellValue>> {
    let col = table.column_index(id_col).unwrap();
    table.rows.iter().filter(|r| r[col] == text(id)).collect()
}

// -------------------------------------------------------------------------
// Default profile
// -------------------------------------------------------------------------

#[test]
fn surabaya_exact_match_wins_group() {
    let result = load_and_run("", "surabaya_scrape.csv");
    let t = &result.table;
    let place = t.column_index("Actual Place Name").unwrap();
    let label = t.column_index("validation_label").unwrap();
    let winner = t.column_index("is_winner").unwrap();

    let group = rows_for(t, "idsbr", "001");
    assert_eq!(group.len(), 3);
    assert_eq!(group[0][place], text("Toko Makmur"));
    assert_eq!(group[0][label], text("Found"));
    assert_eq!(group[0][winner], CellValue::Bool(true));
    for row in &group[1..] {
        assert_eq!(row[label], text("Duplicate"));
        assert_eq!(row[winner], CellValue::Bool(false));
    }
    // the higher-scoring loser comes before the lower one
    assert_eq!(group[1][place], text("Toko Makmur Jaya"));
    assert_eq!(group[2][place], text("Warung Lain"));
}

#[test]
fn surabaya_summary() {
    let result = load_and_run("", "surabaya_scrape.csv");
    let s = &result.summary;

    assert_eq!(s.total_rows, 10);
    assert_eq!(s.winner_count, 7);
    assert_eq!(s.duplicate_count, 2);
    assert_eq!(s.coordinate_error_count, 1);

    assert_eq!(s.validation_counts[&ValidationLabel::Found], 2);
    assert_eq!(s.validation_counts[&ValidationLabel::NeedsReview], 3);
    assert_eq!(s.validation_counts[&ValidationLabel::NotFound], 3);
    assert_eq!(s.validation_counts[&ValidationLabel::Duplicate], 2);

    assert_eq!(s.location_counts[&LocationStatus::InRegion], 8);
    assert_eq!(s.location_counts[&LocationStatus::OutOfRegion], 1);
    assert_eq!(s.cluster_counts[&RegionCluster::TargetRegion], 8);
    assert_eq!(s.cluster_counts[&RegionCluster::Unknown], 1);

    let close = |a: Option<f64>, b: f64| (a.unwrap() - b).abs() < 1e-9;
    assert!(close(s.similarity.mean, 0.6118054534676834));
    assert!(close(s.similarity.median, 0.6712365591397849));
    assert!(close(s.similarity.std, 0.25427288005258536));
    assert!(close(s.similarity.min, 0.1393939393939394));
    assert!(close(s.similarity.max, 0.9739130434782609));
}

#[test]
fn surabaya_unidentified_row_is_first_and_not_found() {
    let result = load_and_run("", "surabaya_scrape.csv");
    let first = &result.table.rows[0];
    let t = &result.table;
    assert_eq!(first[t.column_index("idsbr").unwrap()], CellValue::Empty);
    assert_eq!(first[t.column_index("Actual Place Name").unwrap()], text("Salon Cantik Ayu"));
    assert_eq!(first[t.column_index("validation_label").unwrap()], text("Not Found"));
    assert_eq!(first[t.column_index("is_winner").unwrap()], CellValue::Bool(false));
}

#[test]
fn surabaya_corrupted_coordinates_are_reconstructed() {
    let result = load_and_run("", "surabaya_scrape.csv");
    let t = &result.table;
    let row = rows_for(t, "idsbr", "005")[0];
    assert_eq!(row[t.column_index("Latitude").unwrap()], text("-7.286.543"));
    assert_eq!(row[t.column_index("clean_latitude").unwrap()], CellValue::Number(-7.286543));
    assert_eq!(row[t.column_index("clean_longitude").unwrap()], CellValue::Number(112.739876));
    assert_eq!(row[t.column_index("location_status").unwrap()], text("in_region"));

    let broken = rows_for(t, "idsbr", "004")[0];
    assert_eq!(broken[t.column_index("clean_latitude").unwrap()], CellValue::Empty);
    assert_eq!(broken[t.column_index("location_status").unwrap()], text("coordinate_error"));
    assert_eq!(broken[t.column_index("region_cluster").unwrap()], text("Unknown"));
}

#[test]
fn surabaya_output_column_order() {
    let result = load_and_run("", "surabaya_scrape.csv");
    assert_eq!(
        result.table.headers,
        vec![
            "idsbr",
            "Query",
            "Actual Place Name",
            "Category",
            "Rating",
            "Address",
            "Phone Number",
            "Website",
            "Latitude",
            "Longitude",
            "clean_latitude",
            "clean_longitude",
            "Status",
            "Open Status",
            "Operation Hours",
            "similarity_score",
            "validation_label",
            "is_winner",
            "location_status",
            "region_cluster",
        ]
    );
}

#[test]
fn surabaya_selections() {
    let result = load_and_run("", "surabaya_scrape.csv");
    let ids = |sel: Selection| -> Vec<String> {
        sel.apply(&result).rows.iter().map(|r| r[0].to_string()).collect()
    };
    assert_eq!(ids(Selection::Verified), vec!["001"]);
    assert_eq!(ids(Selection::Outside), vec!["003"]);
    assert_eq!(ids(Selection::CoordinateErrors), vec!["004"]);
    assert_eq!(ids(Selection::Review), vec!["002", "005", "006"]);
    assert_eq!(ids(Selection::Winners).len(), 7);
}

#[test]
fn rerun_on_own_output_is_stable() {
    let first = load_and_run("", "surabaya_scrape.csv");
    let second = run(&ReconConfig::default(), &first.table).unwrap();
    assert_eq!(first.table, second.table);
    assert_eq!(first.summary, second.summary);
}

// -------------------------------------------------------------------------
// Custom profile
// -------------------------------------------------------------------------

#[test]
fn sidoarjo_profile_with_indonesian_labels() {
    let toml = std::fs::read_to_string(fixtures_dir().join("sidoarjo.recon.toml")).unwrap();
    let result = load_and_run(&toml, "sidoarjo_scrape.csv");
    let t = &result.table;

    assert_eq!(result.meta.config_name, "Sidoarjo survey");
    assert_eq!(result.meta.region, "Sidoarjo");
    assert_eq!(t.headers[..4], ["sbr_id", "Nama Usaha", "Nama Tempat", "Alamat"]);

    let label = t.column_index("validation_label").unwrap();
    let status = t.column_index("location_status").unwrap();
    let cluster = t.column_index("region_cluster").unwrap();

    let s10 = rows_for(t, "sbr_id", "S-10");
    assert_eq!(s10[0][label], text("Ditemukan"));
    assert_eq!(s10[0][status], text("disidoarjo"));
    assert_eq!(s10[0][cluster], text("Sidoarjo"));
    assert_eq!(s10[1][label], text("Duplikat"));

    let s11 = rows_for(t, "sbr_id", "S-11");
    assert_eq!(s11[0][label], text("Ditemukan"));
    assert_eq!(s11[0][status], text("tidak disidoarjo"));
    assert_eq!(s11[0][cluster], text("Luar Sidoarjo"));
}

// -------------------------------------------------------------------------
// Errors
// -------------------------------------------------------------------------

#[test]
fn missing_address_column_is_a_schema_error() {
    let err = run(&ReconConfig::default(), &load_fixture("missing_address.csv")).unwrap_err();
    match err {
        ReconError::MissingColumns { stage, columns } => {
            assert_eq!(stage, Stage::Scoring);
            assert_eq!(columns, vec!["Address"]);
        }
        other => panic!("expected schema error, got {other}"),
    }
}

#[test]
fn empty_table_runs_with_empty_summary() {
    let table = load_csv_table("idsbr,Query,Actual Place Name,Address,Latitude,Longitude\n").unwrap();
    let result = run(&ReconConfig::default(), &table).unwrap();
    assert_eq!(result.summary.total_rows, 0);
    assert_eq!(result.summary.similarity.mean, None);
    assert!(result.table.is_empty());
    assert_eq!(result.table.headers.len(), 13);
}
