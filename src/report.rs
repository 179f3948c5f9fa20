// AwaitSleuth - report.rs
//
// Console rendering of the analysis: ANSI colours, severity icons, the
// per-host summary, the ranked table, optional per-entry detail blocks,
// and the severity breakdown.
//
// Presentation only. Everything here consumes plain data from the core
// layer; layout, colouring and iconography can change freely without
// affecting analysis correctness.

use awaitsleuth::core::aggregate::Analysis;
use awaitsleuth::core::model::{LatencyRecord, SeverityTier};
use awaitsleuth::core::schema;
use std::path::Path;

// ---------------------------------------------------------------------------
// ANSI palette
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[91m";
const BOLD_RED: &str = "\x1b[91m\x1b[1m";
const YELLOW: &str = "\x1b[93m";
const ORANGE: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";

/// Icon for a severity tier.
fn tier_icon(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Catastrophic => "\u{1f480}", // skull
        SeverityTier::Critical => "\u{1f525}",     // fire
        SeverityTier::Extreme => "\u{26a0}\u{fe0f} ", // warning sign
        SeverityTier::VeryHigh => "\u{1f534}",     // red circle
        SeverityTier::Severe => "\u{1f7e0}",       // orange circle
        SeverityTier::MediumHigh => "\u{1f7e1}",   // yellow circle
        SeverityTier::Slow => "\u{1f7e4}",         // brown circle
    }
}

/// Colour code for a severity tier.
fn tier_colour(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Catastrophic | SeverityTier::Critical => BOLD_RED,
        SeverityTier::Extreme => RED,
        SeverityTier::VeryHigh => YELLOW,
        SeverityTier::Severe => MAGENTA,
        SeverityTier::MediumHigh | SeverityTier::Slow => ORANGE,
    }
}

/// Upper-cased, colour-wrapped severity label.
fn severity_text(tier: SeverityTier) -> String {
    format!(
        "{}{}{RESET}",
        tier_colour(tier),
        tier.label().to_uppercase()
    )
}

// ---------------------------------------------------------------------------
// Empty-result states (valid outcomes, rendered distinctly from errors)
// ---------------------------------------------------------------------------

pub fn print_no_files(root: &Path) {
    println!(
        "No iostat-*.output files found under '{}'",
        root.display()
    );
}

pub fn print_no_matches(threshold_ms: f64, files_scanned: usize) {
    println!(
        "\nNo r_await or w_await times found greater than {threshold_ms}ms \
         across {files_scanned} file(s)"
    );
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

pub fn print_report(analysis: &Analysis, detailed: bool) {
    println!(
        "\n\n\u{1f3af} FOUND {} entries with await times > {}ms",
        analysis.records.len(),
        analysis.threshold_ms
    );
    println!("{}", "\u{2550}".repeat(85));

    print_host_summary(analysis);
    print_summary_table(analysis);

    if detailed {
        println!("\n\nDETAILED ENTRIES:");
        for (i, record) in analysis.top().iter().enumerate() {
            print_detailed_entry(record, i, analysis.threshold_ms);
        }
    }

    print_severity_breakdown(analysis);
}

/// Per-host summary: entry count and worst peak for each host, in
/// first-seen order.
fn print_host_summary(analysis: &Analysis) {
    println!("\n\u{1f5a5}\u{fe0f}  SUMMARY BY HOST:");
    println!("{}", "\u{2550}".repeat(85));
    for group in &analysis.hosts {
        let tier = SeverityTier::classify(group.max_peak_ms);
        println!(
            "{} Host {}: {:3} entries, max await: {BOLD}{:8.2}ms{RESET} ({})",
            tier_icon(tier),
            group.host,
            group.entries,
            group.max_peak_ms,
            severity_text(tier)
        );
    }
}

/// The ranked table of the worst entries, truncated to the display limit.
fn print_summary_table(analysis: &Analysis) {
    println!(
        "\n\n\u{1f4ca} SUMMARY TABLE - Top entries > {}ms:",
        analysis.threshold_ms
    );
    println!("{}", "\u{2550}".repeat(140));
    println!(
        "{:<4} {:<2} {:<15} {:<38} {:<6} {:<8} {:<10} {:<10} {:<10} {:<22}",
        "#", " ", "Host", "File", "Line", "Dev", "r_await", "w_await", "Max", "Timestamp"
    );
    println!("{}", "\u{2550}".repeat(140));

    for (i, record) in analysis.top().iter().enumerate() {
        let tier = SeverityTier::classify(record.peak());
        println!(
            "{:<4} {:<2} {:<15} {:<38} {:<6} {:<8} {:<10} {:<10} {:<10} {:<22}",
            i + 1,
            tier_icon(tier),
            record.host().unwrap_or("?"),
            record.source_name,
            record.line_index,
            record.device,
            await_cell(record.read_await_ms, record.read_is_peak(), analysis.threshold_ms),
            await_cell(record.write_await_ms, record.write_is_peak(), analysis.threshold_ms),
            format!("{}{:8.2}{RESET}", tier_colour(tier), record.peak()),
            record.timestamp
        );
    }
}

/// One await-time cell, highlighted red when this side is the peak value
/// and above the threshold. Both sides highlight on a tie.
fn await_cell(value_ms: f64, is_peak: bool, threshold_ms: f64) -> String {
    if is_peak && value_ms > threshold_ms {
        format!("{RED}{value_ms:8.2}{RESET}")
    } else {
        format!("{value_ms:8.2}")
    }
}

/// Full per-entry detail block: provenance, both await times, the raw and
/// cleaned line text, and every parsed field against the column schema.
fn print_detailed_entry(record: &LatencyRecord, index: usize, threshold_ms: f64) {
    let tier = SeverityTier::classify(record.peak());

    println!("\n{}", "=".repeat(85));
    println!(
        "{} Entry #{} - {}",
        tier_icon(tier),
        index + 1,
        severity_text(tier)
    );
    println!("{}", "=".repeat(85));
    println!(
        "\u{1f5a5}\u{fe0f}  Host: {BOLD}{}{RESET}",
        record.host().unwrap_or("?")
    );
    println!("\u{1f4c1} Source File: {}", record.source_name);
    println!("\u{1f4cd} Full Path: {}", record.source_path.display());
    println!("\u{1f4cf} Line Number: {BOLD}{}{RESET}", record.line_index);
    println!("\u{23f0} Timestamp: {}", record.timestamp);
    println!("\u{1f4be} Device: {BOLD}{}{RESET}", record.device);
    println!("\u{1f4d6} Read Await: {:.2} ms", record.read_await_ms);
    println!(
        "\u{270d}\u{fe0f}  Write Await: {BOLD}{:.2} ms{RESET}",
        record.write_await_ms
    );
    println!("\u{1f4ca} Max Await: {BOLD}{:.2} ms{RESET}", record.peak());
    println!("\n\u{1f4c4} Original Line from File:");
    println!("   {}", record.raw_text);
    println!("\n\u{1f527} Cleaned/Parsed Line:");
    println!("   {}", record.cleaned_text);
    println!("\n\u{1f4cb} Parsed Fields:");

    for (i, (header, value)) in schema::DEVICE_COLUMNS
        .iter()
        .zip(record.fields.iter())
        .enumerate()
    {
        // Flag each await column independently: on a read/write tie both
        // columns carry a marker.
        let marker = if *header == "r_await" && record.read_is_peak() && record.read_await_ms > threshold_ms
        {
            format!(" {RED}<-- HIGH READ{RESET}")
        } else if *header == "w_await"
            && record.write_is_peak()
            && record.write_await_ms > threshold_ms
        {
            format!(" {RED}<-- HIGH WRITE{RESET}")
        } else {
            String::new()
        };
        println!("   {i:2}. {header:10}: {value:>12}{marker}");
    }
}

/// Record counts per severity band, most severe first. The Slow bucket
/// only appears when the threshold makes it reachable and it is non-empty.
fn print_severity_breakdown(analysis: &Analysis) {
    println!("\n\n\u{1f4c8} SEVERITY BREAKDOWN:");
    println!("{}", "\u{2550}".repeat(85));

    for tier in SeverityTier::all() {
        if *tier == SeverityTier::Slow {
            if analysis.show_slow_bucket() {
                println!(
                    "{} {} ({:.0}-99ms): {}{:3} entries{RESET}",
                    tier_icon(*tier),
                    tier.label(),
                    analysis.threshold_ms,
                    tier_colour(*tier),
                    analysis.breakdown.count(*tier)
                );
            }
            continue;
        }
        println!(
            "{} {} ({}): {}{:3} entries{RESET}",
            tier_icon(*tier),
            tier.label(),
            tier.range_label(),
            tier_colour(*tier),
            analysis.breakdown.count(*tier)
        );
    }
}
