// AwaitSleuth - core/extract.rs
//
// Record extraction from a single iostat capture file.
//
// Pure function of the file content: the caller reads the file and hands
// the text in, so extraction is trivially testable and safe to run for
// many files concurrently. Output preserves file order.
//
// Capture files interleave three kinds of lines:
//   - timestamp lines  ("07/01/2024 03:00:00 PM") that scope every
//     following device row until the next timestamp,
//   - section headers  ("Device ...", "avg-cpu: ...") and banner noise
//     ("Linux 5.14.0 ..."),
//   - device-statistics rows (16 whitespace-separated columns, see
//     core::schema).
// Some captures additionally carry an injected "<digits>|" line-number
// prefix which is stripped before any other matching.

use crate::core::model::LatencyRecord;
use crate::core::schema;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Timestamp line pattern: `MM/DD/YYYY HH:MM:SS AM|PM`.
fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2} [AP]M")
            .expect("timestamp_pattern: invalid regex")
    })
}

/// Carry-forward state threaded through the line scan.
///
/// Scoped to one file: a fresh state is built per `extract_records` call,
/// so timestamps never leak across files.
#[derive(Debug, Default)]
struct ScanState {
    /// Text of the most recent timestamp line, empty before the first one.
    current_timestamp: String,
}

/// Extract the ordered sequence of latency records from one capture file's
/// content whose peak await time exceeds `threshold_ms` (strictly).
///
/// # Arguments
/// * `content` - Full file content (the app layer handles reading)
/// * `source_name` - Capture file name, used for per-host grouping later
/// * `source_path` - Full path to the capture (for record metadata)
/// * `threshold_ms` - Await-time threshold in milliseconds
///
/// Malformed rows (short, non-numeric, banner lines) are skipped, never
/// fatal. A file with no qualifying rows yields an empty vector.
pub fn extract_records(
    content: &str,
    source_name: &str,
    source_path: &Path,
    threshold_ms: f64,
) -> Vec<LatencyRecord> {
    let (records, _) = content.lines().enumerate().fold(
        (Vec::new(), ScanState::default()),
        |(mut records, mut state), (line_idx, line)| {
            let line_number = (line_idx as u64) + 1;

            if let Some(record) = scan_line(
                line,
                line_number,
                source_name,
                source_path,
                threshold_ms,
                &mut state,
            ) {
                records.push(record);
            }

            (records, state)
        },
    );

    tracing::debug!(
        file = source_name,
        records = records.len(),
        threshold_ms,
        "Extraction complete"
    );

    records
}

/// Process one line against the carried state, returning a record when the
/// line is a qualifying device-statistics row.
fn scan_line(
    line: &str,
    line_number: u64,
    source_name: &str,
    source_path: &Path,
    threshold_ms: f64,
    state: &mut ScanState,
) -> Option<LatencyRecord> {
    let raw_text = line.trim();
    let cleaned_text = strip_line_number_prefix(line).trim().to_string();

    // Timestamp lines update the carried state and carry no device data.
    if timestamp_pattern().is_match(&cleaned_text) {
        state.current_timestamp = cleaned_text;
        return None;
    }

    // Section headers and empty lines carry no device data either.
    if cleaned_text.is_empty()
        || cleaned_text.starts_with("Device")
        || cleaned_text.starts_with("avg-cpu")
    {
        return None;
    }

    let fields: Vec<String> = cleaned_text.split_whitespace().map(String::from).collect();

    // Candidate device rows have the full column complement and a real
    // device token; kernel-version banners start with "Linux".
    if fields.len() < schema::MIN_DEVICE_COLUMNS {
        return None;
    }
    let device = &fields[device_column()];
    if device.is_empty() || device == "Linux" {
        return None;
    }

    // Non-numeric (or non-finite) await values mean the row does not match
    // the expected format; skip it rather than abort the file.
    let read_await_ms = parse_await(&fields[read_await_column()])?;
    let write_await_ms = parse_await(&fields[write_await_column()])?;

    if read_await_ms <= threshold_ms && write_await_ms <= threshold_ms {
        return None;
    }

    Some(LatencyRecord {
        source_name: source_name.to_string(),
        source_path: source_path.to_path_buf(),
        line_index: line_number,
        raw_text: raw_text.to_string(),
        timestamp: state.current_timestamp.clone(),
        device: device.clone(),
        read_await_ms,
        write_await_ms,
        cleaned_text,
        fields,
    })
}

/// Remove an injected `<digits>|` line-number prefix, if present.
/// Returns the line unchanged otherwise.
fn strip_line_number_prefix(line: &str) -> &str {
    match line.split_once('|') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) => {
            rest
        }
        _ => line,
    }
}

/// Parse an await-time token. Rejects non-numeric and non-finite values
/// (a literal "NaN" or "inf" token is format noise, not a latency).
fn parse_await(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn device_column() -> usize {
    schema::column_index("Device").expect("Device column missing from schema")
}

fn read_await_column() -> usize {
    schema::column_index("r_await").expect("r_await column missing from schema")
}

fn write_await_column() -> usize {
    schema::column_index("w_await").expect("w_await column missing from schema")
}
