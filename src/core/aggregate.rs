// AwaitSleuth - core/aggregate.rs
//
// Aggregation and classification over the concatenated record set from
// all capture files: global ranking, per-host grouping, and severity
// bucket counts. Runs once, after every file has been extracted.
//
// Ordering guarantees:
//   - the global sort is descending by peak latency and STABLE, so equal
//     peaks keep their concatenation order (file order first, then
//     intra-file line order),
//   - host groups appear in first-seen order over the concatenated input,
//     before sorting, so group order is independent of latency values.

use crate::core::model::{HostGroup, LatencyRecord, SeverityTier};
use crate::util::constants;
use crate::util::error::AggregateError;
use std::collections::HashMap;

// =============================================================================
// Severity breakdown
// =============================================================================

/// Per-tier record counts. Tiers are half-open, non-overlapping bands, so
/// each record is counted exactly once and the counts sum to the total.
#[derive(Debug, Clone, Default)]
pub struct SeverityBreakdown {
    counts: HashMap<SeverityTier, usize>,
}

impl SeverityBreakdown {
    fn add(&mut self, tier: SeverityTier) {
        *self.counts.entry(tier).or_insert(0) += 1;
    }

    /// Number of records classified into `tier`.
    pub fn count(&self, tier: SeverityTier) -> usize {
        self.counts.get(&tier).copied().unwrap_or(0)
    }

    /// Total records across all tiers.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

// =============================================================================
// Analysis (the reportable data set)
// =============================================================================

/// The complete aggregation output handed to presentation collaborators.
/// Plain data: the renderer and exporters choose their own layout.
#[derive(Debug)]
pub struct Analysis {
    /// All qualifying records, sorted descending by peak latency with a
    /// stable tie-break preserving concatenation order.
    pub records: Vec<LatencyRecord>,

    /// Host groups in first-seen order of distinct hosts.
    pub hosts: Vec<HostGroup>,

    /// Record counts per severity tier.
    pub breakdown: SeverityBreakdown,

    /// The threshold this analysis ran with, in milliseconds.
    pub threshold_ms: f64,

    /// Display cap for the table/detail views. `None` means all.
    pub display_limit: Option<usize>,
}

impl Analysis {
    /// The truncated top-N view of the sorted records. A missing or
    /// non-positive limit means the full set.
    pub fn top(&self) -> &[LatencyRecord] {
        match self.display_limit {
            Some(limit) if limit > 0 && limit < self.records.len() => &self.records[..limit],
            _ => &self.records,
        }
    }

    /// Whether the Slow bucket is meaningful for this run: it only exists
    /// when the effective threshold is below the bucket's ceiling and at
    /// least one record landed in it.
    pub fn show_slow_bucket(&self) -> bool {
        self.threshold_ms < constants::SLOW_TIER_CEILING_MS
            && self.breakdown.count(SeverityTier::Slow) > 0
    }
}

/// Aggregate the concatenated, already threshold-filtered records from all
/// capture files into the final reportable data set.
///
/// Fails with `MalformedSourceName` if any record's capture file name does
/// not yield a host; everything else in this step is infallible.
pub fn aggregate(
    records: Vec<LatencyRecord>,
    threshold_ms: f64,
    display_limit: Option<usize>,
) -> Result<Analysis, AggregateError> {
    // Host grouping first, over concatenation order, so first-seen group
    // order and the fail-fast naming check are independent of the sort.
    let hosts = group_by_host(&records)?;

    let mut breakdown = SeverityBreakdown::default();
    for record in &records {
        breakdown.add(SeverityTier::classify(record.peak()));
    }

    let mut records = records;
    // sort_by is stable; total_cmp gives a total order over the finite
    // values the extractor admits.
    records.sort_by(|a, b| b.peak().total_cmp(&a.peak()));

    tracing::debug!(
        records = records.len(),
        hosts = hosts.len(),
        threshold_ms,
        "Aggregation complete"
    );

    Ok(Analysis {
        records,
        hosts,
        breakdown,
        threshold_ms,
        display_limit,
    })
}

/// Group records by host in first-seen order of distinct hosts.
fn group_by_host(records: &[LatencyRecord]) -> Result<Vec<HostGroup>, AggregateError> {
    let mut groups: Vec<HostGroup> = Vec::new();
    let mut index_by_host: HashMap<String, usize> = HashMap::new();

    for record in records {
        let host = record.host()?;
        match index_by_host.get(host) {
            Some(&idx) => {
                let group = &mut groups[idx];
                group.entries += 1;
                group.max_peak_ms = group.max_peak_ms.max(record.peak());
            }
            None => {
                index_by_host.insert(host.to_string(), groups.len());
                groups.push(HostGroup {
                    host: host.to_string(),
                    entries: 1,
                    max_peak_ms: record.peak(),
                });
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_record(source_name: &str, device: &str, read: f64, write: f64) -> LatencyRecord {
        LatencyRecord {
            source_name: source_name.to_string(),
            source_path: PathBuf::from(source_name),
            line_index: 1,
            raw_text: String::new(),
            timestamp: String::new(),
            device: device.to_string(),
            read_await_ms: read,
            write_await_ms: write,
            cleaned_text: String::new(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_sort_is_descending_by_peak() {
        let records = vec![
            make_record("iostat-h1-a.output", "sda", 150.0, 1.0),
            make_record("iostat-h1-a.output", "sdb", 1.0, 900.0),
            make_record("iostat-h1-a.output", "sdc", 300.0, 1.0),
        ];
        let analysis = aggregate(records, 100.0, None).unwrap();
        let peaks: Vec<f64> = analysis.records.iter().map(|r| r.peak()).collect();
        assert_eq!(peaks, vec![900.0, 300.0, 150.0]);
    }

    /// Equal peaks keep their concatenation order (stable tie-break).
    #[test]
    fn test_sort_tie_break_preserves_input_order() {
        let records = vec![
            make_record("iostat-h1-a.output", "sda", 300.0, 1.0),
            make_record("iostat-h1-a.output", "sdb", 1.0, 300.0),
            make_record("iostat-h2-b.output", "sdc", 300.0, 2.0),
        ];
        let analysis = aggregate(records, 100.0, None).unwrap();
        let devices: Vec<&str> = analysis.records.iter().map(|r| r.device.as_str()).collect();
        assert_eq!(devices, vec!["sda", "sdb", "sdc"]);
    }

    /// Two-file scenario: host groups carry per-host maxima and the global
    /// sort places the worst record first.
    #[test]
    fn test_host_grouping_scenario() {
        let records = vec![
            make_record("iostat-10.0.0.1-a.output", "sda", 300.0, 1.0),
            make_record("iostat-10.0.0.2-b.output", "sdb", 6000.0, 1.0),
        ];
        let analysis = aggregate(records, 100.0, None).unwrap();

        assert_eq!(analysis.hosts.len(), 2);
        assert_eq!(analysis.hosts[0].host, "10.0.0.1");
        assert_eq!(analysis.hosts[0].max_peak_ms, 300.0);
        assert_eq!(analysis.hosts[1].host, "10.0.0.2");
        assert_eq!(analysis.hosts[1].max_peak_ms, 6000.0);
        assert_eq!(analysis.records[0].peak(), 6000.0);
    }

    #[test]
    fn test_host_groups_first_seen_order_and_counts() {
        let records = vec![
            make_record("iostat-hostB-a.output", "sda", 200.0, 1.0),
            make_record("iostat-hostA-a.output", "sdb", 400.0, 1.0),
            make_record("iostat-hostB-c.output", "sdc", 700.0, 1.0),
        ];
        let analysis = aggregate(records, 100.0, None).unwrap();

        assert_eq!(analysis.hosts[0].host, "hostB");
        assert_eq!(analysis.hosts[0].entries, 2);
        assert_eq!(analysis.hosts[0].max_peak_ms, 700.0);
        assert_eq!(analysis.hosts[1].host, "hostA");
        assert_eq!(analysis.hosts[1].entries, 1);
    }

    #[test]
    fn test_malformed_source_name_is_fatal() {
        let records = vec![make_record("capture.output", "sda", 200.0, 1.0)];
        assert!(matches!(
            aggregate(records, 100.0, None),
            Err(AggregateError::MalformedSourceName { .. })
        ));
    }

    /// Bucket counts are a partition of the record set.
    #[test]
    fn test_breakdown_counts_sum_to_total() {
        let records = vec![
            make_record("iostat-h1-a.output", "sda", 150.0, 1.0),  // MediumHigh
            make_record("iostat-h1-a.output", "sdb", 220.0, 1.0),  // Severe
            make_record("iostat-h1-a.output", "sdc", 260.0, 1.0),  // VeryHigh
            make_record("iostat-h1-a.output", "sdd", 750.0, 1.0),  // Extreme
            make_record("iostat-h1-a.output", "sde", 2000.0, 1.0), // Critical
            make_record("iostat-h1-a.output", "sdf", 9000.0, 1.0), // Catastrophic
            make_record("iostat-h1-a.output", "sdg", 60.0, 1.0),   // Slow
        ];
        let total = records.len();
        let analysis = aggregate(records, 50.0, None).unwrap();

        assert_eq!(analysis.breakdown.total(), total);
        assert_eq!(analysis.breakdown.count(SeverityTier::MediumHigh), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::Severe), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::VeryHigh), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::Extreme), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::Critical), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::Catastrophic), 1);
        assert_eq!(analysis.breakdown.count(SeverityTier::Slow), 1);
        assert!(analysis.show_slow_bucket());
    }

    /// The Slow bucket disappears once the threshold reaches 100 ms: no
    /// record at or below the threshold exists to populate it.
    #[test]
    fn test_slow_bucket_hidden_at_high_threshold() {
        let records = vec![make_record("iostat-h1-a.output", "sda", 150.0, 1.0)];
        let analysis = aggregate(records, 100.0, None).unwrap();
        assert_eq!(analysis.breakdown.count(SeverityTier::Slow), 0);
        assert!(!analysis.show_slow_bucket());
    }

    #[test]
    fn test_top_respects_display_limit() {
        let records = vec![
            make_record("iostat-h1-a.output", "sda", 900.0, 1.0),
            make_record("iostat-h1-a.output", "sdb", 800.0, 1.0),
            make_record("iostat-h1-a.output", "sdc", 700.0, 1.0),
        ];
        let analysis = aggregate(records, 100.0, Some(2)).unwrap();
        assert_eq!(analysis.top().len(), 2);
        assert_eq!(analysis.top()[0].peak(), 900.0);
    }

    /// A zero or absent limit means "all".
    #[test]
    fn test_top_unlimited() {
        let records = vec![
            make_record("iostat-h1-a.output", "sda", 900.0, 1.0),
            make_record("iostat-h1-a.output", "sdb", 800.0, 1.0),
        ];
        let unlimited = aggregate(records.clone(), 100.0, None).unwrap();
        assert_eq!(unlimited.top().len(), 2);

        let zero = aggregate(records, 100.0, Some(0)).unwrap();
        assert_eq!(zero.top().len(), 2);
    }

    #[test]
    fn test_empty_record_set_aggregates_cleanly() {
        let analysis = aggregate(Vec::new(), 100.0, None).unwrap();
        assert!(analysis.records.is_empty());
        assert!(analysis.hosts.is_empty());
        assert_eq!(analysis.breakdown.total(), 0);
    }
}
