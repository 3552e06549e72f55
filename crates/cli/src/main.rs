// placerecon CLI - headless place-candidate reconciliation

mod exit_codes;
mod recon;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;

use exit_codes::EXIT_SUCCESS;
use placerecon::Selection;

#[derive(Parser)]
#[command(name = "placerecon")]
#[command(about = "Score scraped place candidates, keep one per identifier, check coordinates")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Only log warnings and errors; no summary on stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline on a scraped table
    #[command(after_help = "\
Examples:
  placerecon run scrape.csv -o hasil.xlsx
  placerecon run scrape.xlsx --sheet Data --config surabaya.recon.toml -o out.csv -o out.json
  placerecon run scrape.csv --select verified -o verified.csv
  placerecon run scrape.csv --json > report.json

Selections: verified, review, outside, coordinate-errors, winners

Logging: RUST_LOG=debug placerecon run scrape.csv")]
    Run {
        /// Input table (.csv, .tsv, .xlsx, .xls, .xlsb, .ods)
        input: PathBuf,

        /// Recon config (.toml); built-in Surabaya defaults when omitted
        #[arg(long, short = 'c', env = "PLACERECON_CONFIG")]
        config: Option<PathBuf>,

        /// Worksheet to read from an Excel input (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output file, format by extension (.csv, .tsv, .xlsx, .json); repeatable
        #[arg(long = "output", short = 'o')]
        outputs: Vec<PathBuf>,

        /// Write only a named subset of rows
        #[arg(long)]
        select: Option<Selection>,

        /// Print the JSON report to stdout instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  placerecon validate surabaya.recon.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("PLACERECON_REVISION"), ")",
        "\nengine:  placerecon ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("PLACERECON_BUILD"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Run { input, config, sheet, outputs, select, json } => recon::cmd_run(recon::RunArgs {
            input,
            config,
            sheet,
            outputs,
            select,
            json,
            quiet: cli.quiet,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
