// AwaitSleuth - app/run.rs
//
// The per-file analysis loop: read each discovered capture file, extract
// its records, concatenate, then aggregate once over the combined set.
//
// Unreadable files are non-fatal: each contributes zero records and a
// warning, and the run continues with the remaining files. Whether zero
// successfully-read files is itself fatal is the caller's decision; the
// outcome enum makes the empty states explicit instead of error-shaped.

use crate::app::discover::DiscoveredFile;
use crate::core::aggregate::{self, Analysis};
use crate::core::extract;
use crate::util::constants;
use crate::util::error::Result;

/// Parameters for one analysis run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Await-time threshold in milliseconds. Strictly exceeded values qualify.
    pub threshold_ms: f64,

    /// Display cap for table/detail output. `None` or 0 means all.
    pub display_limit: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threshold_ms: constants::DEFAULT_THRESHOLD_MS,
            display_limit: None,
        }
    }
}

/// Outcome of an analysis run.
///
/// The two empty variants are valid results, not failures: the renderer
/// must present them distinctly from an error.
#[derive(Debug)]
pub enum RunOutcome {
    /// No capture files were discovered at all.
    NoInputFiles,

    /// Files were scanned but no record exceeded the threshold.
    NoMatchingRecords { files_scanned: usize },

    /// At least one qualifying record; the full aggregated data set.
    Report(Analysis),
}

/// Run the extraction/aggregation pipeline over the discovered files.
///
/// Returns the outcome plus non-fatal warnings (unreadable files).
/// The only fatal in-pipeline error is `MalformedSourceName` from host
/// grouping, which indicates a naming-convention violation the aggregator
/// cannot paper over.
pub fn analyze_files(
    files: &[DiscoveredFile],
    config: &RunConfig,
) -> Result<(RunOutcome, Vec<String>)> {
    if files.is_empty() {
        return Ok((RunOutcome::NoInputFiles, Vec::new()));
    }

    let mut all_records = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for file in files {
        tracing::info!(file = %file.path.display(), size = file.size, "Processing");

        let content = match std::fs::read_to_string(&file.path) {
            Ok(c) => c,
            Err(e) => {
                let msg = format!("Cannot read '{}': {e}", file.path.display());
                tracing::warn!(warning = %msg, "Skipping unreadable file");
                warnings.push(msg);
                continue;
            }
        };

        let records =
            extract::extract_records(&content, &file.name, &file.path, config.threshold_ms);
        all_records.extend(records);
    }

    if all_records.is_empty() {
        return Ok((
            RunOutcome::NoMatchingRecords {
                files_scanned: files.len(),
            },
            warnings,
        ));
    }

    let analysis = aggregate::aggregate(all_records, config.threshold_ms, config.display_limit)?;

    Ok((RunOutcome::Report(analysis), warnings))
}
