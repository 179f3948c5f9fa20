// AwaitSleuth - core/model.rs
//
// Core data model types. Pure data definitions with no I/O or terminal
// dependencies. These types are the shared vocabulary across all layers:
// the extractor produces LatencyRecords, the aggregator classifies and
// groups them, and the renderer/export collaborators consume plain data.

use crate::util::error::AggregateError;
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Latency Record (normalised output of extraction)
// =============================================================================

/// One device-statistics observation whose read or write await time
/// exceeded the analysis threshold.
///
/// This is the core data unit that flows through aggregation, display,
/// and export.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyRecord {
    /// File name of the originating capture (e.g. `iostat-10.0.0.1-sda.output`).
    pub source_name: String,

    /// Full path to the originating capture file.
    pub source_path: PathBuf,

    /// 1-based line position within the source file.
    pub line_index: u64,

    /// Original unmodified line text.
    pub raw_text: String,

    /// Most recent timestamp line seen before this record in file order.
    /// Empty if no timestamp preceded it. Kept as an opaque label; it is
    /// never parsed into a date type.
    pub timestamp: String,

    /// Device identifier token (first column of the statistics row).
    pub device: String,

    /// Read await time in milliseconds.
    pub read_await_ms: f64,

    /// Write await time in milliseconds.
    pub write_await_ms: f64,

    /// The record line after removing any injected `<digits>|` prefix.
    pub cleaned_text: String,

    /// Ordered whitespace-delimited tokens parsed from `cleaned_text`.
    /// Always at least `schema::MIN_DEVICE_COLUMNS` entries.
    pub fields: Vec<String>,
}

impl LatencyRecord {
    /// Peak latency: the greater of the read and write await times.
    pub fn peak(&self) -> f64 {
        self.read_await_ms.max(self.write_await_ms)
    }

    /// True when the read await time is the peak value. When read and
    /// write are equal both sides report true, so a tied row can be
    /// flagged on both columns independently.
    pub fn read_is_peak(&self) -> bool {
        self.read_await_ms >= self.write_await_ms
    }

    /// True when the write await time is the peak value.
    pub fn write_is_peak(&self) -> bool {
        self.write_await_ms >= self.read_await_ms
    }

    /// Host identifier: the second dash-delimited token of `source_name`
    /// per the `<prefix>-<host>-<suffix>` capture naming convention.
    ///
    /// Fails with `MalformedSourceName` when the name has fewer than two
    /// dash-delimited tokens; there is no sentinel "unknown" host.
    pub fn host(&self) -> Result<&str, AggregateError> {
        self.source_name
            .split('-')
            .nth(1)
            .ok_or_else(|| AggregateError::MalformedSourceName {
                name: self.source_name.clone(),
            })
    }
}

// =============================================================================
// Severity tier
// =============================================================================

/// Latency severity bands, ordered by ascending lower bound.
///
/// A record's peak latency belongs to exactly one tier (half-open,
/// non-overlapping ranges). `Slow` covers `[threshold, 100)` and only
/// occurs when the analysis threshold is below 100 ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SeverityTier {
    Slow,
    MediumHigh,
    Severe,
    VeryHigh,
    Extreme,
    Critical,
    Catastrophic,
}

/// Tier lower bounds in descending order, shared by classification and
/// bucket counting so the band definitions live in exactly one place.
/// `Slow` carries no entry: it is the fall-through below the lowest bound.
const TIER_FLOORS: &[(f64, SeverityTier)] = &[
    (5000.0, SeverityTier::Catastrophic),
    (1000.0, SeverityTier::Critical),
    (500.0, SeverityTier::Extreme),
    (250.0, SeverityTier::VeryHigh),
    (200.0, SeverityTier::Severe),
    (100.0, SeverityTier::MediumHigh),
];

impl SeverityTier {
    /// Classify a peak latency value. Pure function of the value; the
    /// first (highest) bound at or below the peak wins.
    pub fn classify(peak_ms: f64) -> SeverityTier {
        for (floor, tier) in TIER_FLOORS {
            if peak_ms >= *floor {
                return *tier;
            }
        }
        SeverityTier::Slow
    }

    /// All tiers in display order (most severe first).
    pub fn all() -> &'static [SeverityTier] {
        &[
            SeverityTier::Catastrophic,
            SeverityTier::Critical,
            SeverityTier::Extreme,
            SeverityTier::VeryHigh,
            SeverityTier::Severe,
            SeverityTier::MediumHigh,
            SeverityTier::Slow,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Catastrophic => "Catastrophic",
            SeverityTier::Critical => "Critical",
            SeverityTier::Extreme => "Extreme",
            SeverityTier::VeryHigh => "Very High",
            SeverityTier::Severe => "Severe",
            SeverityTier::MediumHigh => "Medium High",
            SeverityTier::Slow => "Slow",
        }
    }

    /// The band's range in milliseconds, for breakdown headings.
    /// `Slow`'s lower bound is the run threshold, which only the caller
    /// knows, so its range is rendered by the caller instead.
    pub fn range_label(&self) -> &'static str {
        match self {
            SeverityTier::Catastrophic => ">=5000ms",
            SeverityTier::Critical => "1000-4999ms",
            SeverityTier::Extreme => "500-999ms",
            SeverityTier::VeryHigh => "250-499ms",
            SeverityTier::Severe => "200-249ms",
            SeverityTier::MediumHigh => "100-199ms",
            SeverityTier::Slow => "<100ms",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Host group
// =============================================================================

/// All qualifying records attributable to one source host, with the
/// worst peak latency observed across the group.
#[derive(Debug, Clone, Serialize)]
pub struct HostGroup {
    /// Host identifier derived from the capture file name.
    pub host: String,

    /// Number of qualifying records for this host.
    pub entries: usize,

    /// Maximum peak latency across the group, in milliseconds.
    pub max_peak_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_record(source_name: &str, read: f64, write: f64) -> LatencyRecord {
        LatencyRecord {
            source_name: source_name.to_string(),
            source_path: PathBuf::from(source_name),
            line_index: 1,
            raw_text: String::new(),
            timestamp: String::new(),
            device: "sda".to_string(),
            read_await_ms: read,
            write_await_ms: write,
            cleaned_text: String::new(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_peak_is_max_of_read_and_write() {
        assert_eq!(make_record("iostat-h1-a.output", 150.5, 12.0).peak(), 150.5);
        assert_eq!(make_record("iostat-h1-a.output", 12.0, 150.5).peak(), 150.5);
    }

    /// A row where read and write awaits are equal flags both columns.
    #[test]
    fn test_tied_awaits_flag_both_sides() {
        let rec = make_record("iostat-h1-a.output", 300.0, 300.0);
        assert!(rec.read_is_peak());
        assert!(rec.write_is_peak());
    }

    #[test]
    fn test_host_extraction() {
        let rec = make_record("iostat-10.0.0.1-sda.output", 200.0, 1.0);
        assert_eq!(rec.host().unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_host_extraction_fails_without_delimiter() {
        let rec = make_record("capture.output", 200.0, 1.0);
        assert!(matches!(
            rec.host(),
            Err(AggregateError::MalformedSourceName { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Tier classification boundaries
    // -------------------------------------------------------------------------

    #[test]
    fn test_classify_tier_boundaries() {
        assert_eq!(SeverityTier::classify(50.0), SeverityTier::Slow);
        assert_eq!(SeverityTier::classify(99.99), SeverityTier::Slow);
        assert_eq!(SeverityTier::classify(100.0), SeverityTier::MediumHigh);
        assert_eq!(SeverityTier::classify(199.99), SeverityTier::MediumHigh);
        assert_eq!(SeverityTier::classify(200.0), SeverityTier::Severe);
        assert_eq!(SeverityTier::classify(249.99), SeverityTier::Severe);
        assert_eq!(SeverityTier::classify(250.0), SeverityTier::VeryHigh);
        assert_eq!(SeverityTier::classify(500.0), SeverityTier::Extreme);
        assert_eq!(SeverityTier::classify(999.99), SeverityTier::Extreme);
        assert_eq!(SeverityTier::classify(1000.0), SeverityTier::Critical);
        assert_eq!(SeverityTier::classify(4999.99), SeverityTier::Critical);
        assert_eq!(SeverityTier::classify(5000.0), SeverityTier::Catastrophic);
        assert_eq!(SeverityTier::classify(60000.0), SeverityTier::Catastrophic);
    }

    /// Tiers are a partition: every peak lands in exactly one band.
    #[test]
    fn test_classify_is_total() {
        for peak in [0.0, 12.5, 100.0, 150.0, 210.0, 260.0, 750.0, 2000.0, 9000.0] {
            let tier = SeverityTier::classify(peak);
            let matches = SeverityTier::all()
                .iter()
                .filter(|t| **t == tier)
                .count();
            assert_eq!(matches, 1, "peak {peak} should land in exactly one tier");
        }
    }

    #[test]
    fn test_tier_ordering_follows_severity() {
        assert!(SeverityTier::Catastrophic > SeverityTier::Critical);
        assert!(SeverityTier::MediumHigh > SeverityTier::Slow);
    }
}
