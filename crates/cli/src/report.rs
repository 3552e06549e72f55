//! Human-readable run summary for stderr.

use std::collections::BTreeMap;
use std::fmt::Write;

use placerecon::config::LabelSet;
use placerecon::report::ranked;
use placerecon::ReconResult;

pub fn render_summary(result: &ReconResult, labels: &LabelSet) -> String {
    let s = &result.summary;
    let m = &result.meta;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "place recon '{}': region {}, engine {}",
        m.config_name, m.region, m.engine_version
    );
    let _ = writeln!(
        out,
        "{} rows, {} winners, {} duplicates, {} coordinate errors",
        s.total_rows, s.winner_count, s.duplicate_count, s.coordinate_error_count
    );

    section(&mut out, "validation", &s.validation_counts, s.total_rows, |k| labels.validation(*k));
    section(&mut out, "location", &s.location_counts, s.total_rows, |k| labels.location(*k));
    section(&mut out, "cluster", &s.cluster_counts, s.total_rows, |k| labels.cluster(*k));

    let st = &s.similarity;
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
    let _ = writeln!(
        out,
        "similarity: mean {} median {} std {} min {} max {}",
        fmt(st.mean),
        fmt(st.median),
        fmt(st.std),
        fmt(st.min),
        fmt(st.max)
    );
    out
}

fn section<'a, K, F>(out: &mut String, title: &str, counts: &BTreeMap<K, usize>, total: usize, label: F)
where
    K: Copy + Ord,
    F: Fn(&K) -> &'a str,
{
    let _ = writeln!(out, "{title}:");
    for (key, count, pct) in ranked(counts, total) {
        let _ = writeln!(out, "  {:<20} {:>6}  {:>5.1}%", label(&key), count, pct);
    }
}
