//! `placerecon run` / `placerecon validate`.

use std::path::{Path, PathBuf};

use placerecon::{ReconConfig, ReconError, ReconResult, Selection};

use crate::exit_codes::{exit_code_for, EXIT_ERROR, EXIT_IO, EXIT_USAGE};
use crate::report::render_summary;
use crate::CliError;

pub struct RunArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub sheet: Option<String>,
    pub outputs: Vec<PathBuf>,
    pub select: Option<Selection>,
    pub json: bool,
    pub quiet: bool,
}

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::MissingColumns { .. } => Some(
            "map the input's column names under [columns] in a config file (--config)".to_string(),
        ),
        ReconError::UnsupportedFormat(_) => {
            Some("supported: .csv .tsv .xlsx .xls .xlsb .ods (input), .csv .tsv .xlsx .json (output)".to_string())
        }
        _ => None,
    };
    CliError { code: exit_code_for(&err), message: err.to_string(), hint }
}

/// Config from file, or the built-in defaults. Returns the directory that
/// relative `[output]` paths resolve against.
fn load_config(path: Option<&Path>) -> Result<(ReconConfig, PathBuf), CliError> {
    let Some(path) = path else {
        return Ok((ReconConfig::default(), PathBuf::from(".")));
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    let config = ReconConfig::from_toml(&config_str).map_err(recon_err)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base_dir))
}

/// Explicit `-o` paths win; otherwise the config's `[output]` paths.
fn output_paths(args: &RunArgs, config: &ReconConfig, base_dir: &Path) -> Vec<PathBuf> {
    if !args.outputs.is_empty() {
        return args.outputs.clone();
    }
    let o = &config.output;
    [&o.csv, &o.xlsx, &o.json]
        .into_iter()
        .flatten()
        .map(|p| base_dir.join(p))
        .collect()
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (config, base_dir) = load_config(args.config.as_deref())?;

    if !args.input.exists() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("input not found: {}", args.input.display()),
            hint: None,
        });
    }
    let input = placerecon_io::load_table(&args.input, args.sheet.as_deref()).map_err(recon_err)?;

    let result = placerecon::run(&config, &input).map_err(recon_err)?;

    let table = match args.select {
        Some(selection) => {
            let selected = selection.apply(&result);
            log::info!("selection '{selection}': {} of {} rows", selected.len(), result.table.len());
            selected
        }
        None => result.table.clone(),
    };

    let outputs = output_paths(&args, &config, &base_dir);
    for path in &outputs {
        placerecon_io::save_table(&table, path).map_err(recon_err)?;
        if !args.json && !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        let report = json_report(&result, args.select, table.len(), &outputs).map_err(recon_err)?;
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    } else if !args.quiet {
        eprint!("{}", render_summary(&result, &config.labels()));
    }

    Ok(())
}

fn json_report(
    result: &ReconResult,
    select: Option<Selection>,
    selected_rows: usize,
    outputs: &[PathBuf],
) -> Result<serde_json::Value, ReconError> {
    let mut report = placerecon::report::to_json(result)?;
    if let Some(obj) = report.as_object_mut() {
        if let Some(selection) = select {
            obj.insert(
                "selection".into(),
                serde_json::json!({ "name": selection.name(), "rows": selected_rows }),
            );
        }
        let written: Vec<String> = outputs.iter().map(|p| p.display().to_string()).collect();
        obj.insert("outputs".into(), serde_json::json!(written));
    }
    Ok(report)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = load_config(Some(&config_path))?;
    let r = &config.region;
    eprintln!(
        "config ok: '{}' region {} lat [{}, {}] lon [{}, {}]",
        config.name, r.name, r.lat_min, r.lat_max, r.lon_min, r.lon_max
    );
    Ok(())
}
