// AwaitSleuth - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "AwaitSleuth";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Analysis defaults
// =============================================================================

/// Default await-time threshold in milliseconds when none is given on the CLI.
pub const DEFAULT_THRESHOLD_MS: f64 = 100.0;

/// Threshold forced by --extreme-only: only Critical-and-above entries survive.
pub const EXTREME_ONLY_THRESHOLD_MS: f64 = 1000.0;

/// Upper bound of the Slow bucket. Peaks below this value only appear in the
/// report when the effective threshold is itself below the bound.
pub const SLOW_TIER_CEILING_MS: f64 = 100.0;

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum number of capture files to discover in a single run.
pub const DEFAULT_MAX_FILES: usize = 1_000;

/// Default include glob patterns for iostat capture file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["iostat-*.output"];

/// Default exclude glob patterns for capture file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.gz", "*.zip", "*.bak", "*.tmp", ".git"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
