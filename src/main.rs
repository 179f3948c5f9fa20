// AwaitSleuth - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Capture file discovery
// 4. Analysis run and console report / export

mod report;

use awaitsleuth::app::discover::{self, DiscoveryConfig};
use awaitsleuth::app::run::{self, RunConfig, RunOutcome};
use awaitsleuth::core::export;
use awaitsleuth::util;
use awaitsleuth::util::error::{AwaitSleuthError, ExportError, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// AwaitSleuth - iostat await-time analyser.
///
/// Scans iostat capture files (iostat-<host>-*.output) for device rows
/// whose read or write await time exceeds a threshold, then prints a
/// ranked, per-host report of the worst offenders.
#[derive(Parser, Debug)]
#[command(name = "awaitsleuth", version, about)]
struct Cli {
    /// Threshold for await times in milliseconds.
    #[arg(default_value_t = util::constants::DEFAULT_THRESHOLD_MS)]
    threshold: f64,

    /// Show detailed information for each entry.
    #[arg(short = 'd', long = "detailed")]
    detailed: bool,

    /// Limit number of entries to show (values <= 0 show all).
    #[arg(short = 'l', long = "limit")]
    limit: Option<i64>,

    /// Show only critical entries (>= 1000ms).
    #[arg(short = 'e', long = "extreme-only")]
    extreme_only: bool,

    /// Directory to scan for capture files.
    #[arg(long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Export the ranked record set to this path (.csv or .json).
    #[arg(long = "export")]
    export: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "AwaitSleuth starting"
    );

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let threshold_ms = if cli.extreme_only {
        println!(
            "Showing only CRITICAL entries (>= {}ms)",
            util::constants::EXTREME_ONLY_THRESHOLD_MS
        );
        util::constants::EXTREME_ONLY_THRESHOLD_MS
    } else {
        println!("Analyzing for await times > {}ms", cli.threshold);
        cli.threshold
    };

    // A non-positive limit means "show all"; keep the sentinel out of the
    // core by normalising it here.
    let display_limit = cli.limit.filter(|l| *l > 0).map(|l| l as usize);

    let (files, warnings) = discover::discover_files(&cli.dir, &DiscoveryConfig::default())?;
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    if !files.is_empty() {
        println!("Found {} iostat files to analyze", files.len());
        println!("{}", "=".repeat(80));
    }

    let config = RunConfig {
        threshold_ms,
        display_limit,
    };
    let (outcome, run_warnings) = run::analyze_files(&files, &config)?;
    for warning in &run_warnings {
        tracing::warn!(warning = %warning, "Analysis warning");
    }

    match outcome {
        RunOutcome::NoInputFiles => {
            report::print_no_files(&cli.dir);
        }
        RunOutcome::NoMatchingRecords { files_scanned } => {
            report::print_no_matches(threshold_ms, files_scanned);
        }
        RunOutcome::Report(analysis) => {
            report::print_report(&analysis, cli.detailed);

            if let Some(export_path) = &cli.export {
                let count = export_records(&analysis.records, export_path)?;
                println!(
                    "\nExported {count} entries to '{}'",
                    export_path.display()
                );
            }
        }
    }

    Ok(())
}

/// Write the ranked record set to `path`, choosing the format from the
/// file extension: `.csv` for CSV, anything else for JSON.
fn export_records(
    records: &[awaitsleuth::core::model::LatencyRecord],
    path: &Path,
) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|e| {
        AwaitSleuthError::Export(ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let writer = std::io::BufWriter::new(file);

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let count = if is_csv {
        export::export_csv(records, writer, path)?
    } else {
        export::export_json(records, writer, path)?
    };

    tracing::info!(path = %path.display(), count, "Export complete");
    Ok(count)
}
