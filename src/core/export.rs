// AwaitSleuth - core/export.rs
//
// CSV and JSON export of the sorted record set.
// Core layer: writes to any Write trait object; the caller owns file
// creation and format selection.

use crate::core::model::LatencyRecord;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export records to CSV format.
///
/// Writes: source_name, line, timestamp, device, r_await_ms, w_await_ms,
/// peak_ms per record, ordered as given (i.e. ranked worst-first when the
/// caller passes the aggregated set).
pub fn export_csv<W: Write>(
    records: &[LatencyRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "source_name",
            "line",
            "timestamp",
            "device",
            "r_await_ms",
            "w_await_ms",
            "peak_ms",
        ])
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for record in records {
        csv_writer
            .write_record([
                record.source_name.as_str(),
                &record.line_index.to_string(),
                record.timestamp.as_str(),
                record.device.as_str(),
                &format!("{:.2}", record.read_await_ms),
                &format!("{:.2}", record.write_await_ms),
                &format!("{:.2}", record.peak()),
            ])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export records to JSON format (array of objects, full record fields).
pub fn export_json<W: Write>(
    records: &[LatencyRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}
