// AwaitSleuth - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal
// chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all AwaitSleuth operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AwaitSleuthError {
    /// Capture file discovery failed.
    Discovery(DiscoveryError),

    /// Aggregation over extracted records failed.
    Aggregate(AggregateError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for AwaitSleuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Aggregate(e) => write!(f, "Aggregation error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AwaitSleuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Aggregate(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to capture file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root scan path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Maximum file count exceeded during the scan.
    MaxFilesExceeded { max: usize },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Scan path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::MaxFilesExceeded { max } => {
                write!(
                    f,
                    "Discovery stopped: exceeded maximum of {max} files. \
                     Narrow the scan directory or tighten the include pattern."
                )
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for AwaitSleuthError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Aggregation errors
// ---------------------------------------------------------------------------

/// Errors related to record aggregation and host grouping.
#[derive(Debug)]
pub enum AggregateError {
    /// A capture file name does not follow the `<prefix>-<host>-<suffix>`
    /// convention, so no host can be extracted for per-host grouping.
    MalformedSourceName { name: String },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSourceName { name } => write!(
                f,
                "Capture file name '{name}' does not match the expected \
                 '<prefix>-<host>-<suffix>' convention; cannot derive a host"
            ),
        }
    }
}

impl std::error::Error for AggregateError {}

impl From<AggregateError> for AwaitSleuthError {
    fn from(e: AggregateError) -> Self {
        Self::Aggregate(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for AwaitSleuthError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for AwaitSleuth results.
pub type Result<T> = std::result::Result<T, AwaitSleuthError>;
