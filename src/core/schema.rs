// AwaitSleuth - core/schema.rs
//
// The iostat extended-statistics column schema.
//
// Device rows are parsed positionally. All column positions are derived
// from this one header table via named lookup; the extractor carries no
// index literals.

/// Column headers of an iostat `-x` device-statistics row, in field order.
pub const DEVICE_COLUMNS: &[&str] = &[
    "Device", "r/s", "w/s", "rkB/s", "wkB/s", "rrqm/s", "wrqm/s", "%rrqm", "%wrqm", "r_await",
    "w_await", "aqu-sz", "rareq-sz", "wareq-sz", "svctm", "%util",
];

/// Minimum token count for a line to qualify as a device-statistics row.
pub const MIN_DEVICE_COLUMNS: usize = DEVICE_COLUMNS.len();

/// Position of a named column within a device-statistics row.
///
/// Returns `None` for unknown column names; callers index rows only
/// through this lookup.
pub fn column_index(name: &str) -> Option<usize> {
    DEVICE_COLUMNS.iter().position(|c| *c == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_sixteen_columns() {
        assert_eq!(MIN_DEVICE_COLUMNS, 16);
    }

    /// The await columns sit at the positions iostat emits them in -x mode.
    /// A mismatch here would silently misread throughput columns as latency.
    #[test]
    fn test_await_column_positions() {
        assert_eq!(column_index("Device"), Some(0));
        assert_eq!(column_index("r_await"), Some(9));
        assert_eq!(column_index("w_await"), Some(10));
        assert_eq!(column_index("%util"), Some(15));
    }

    #[test]
    fn test_unknown_column_is_none() {
        assert_eq!(column_index("d_await"), None);
        assert_eq!(column_index(""), None);
    }
}
