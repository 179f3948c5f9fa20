// AwaitSleuth - app/discover.rs
//
// Directory traversal and iostat capture file discovery.
//
// Uses `walkdir` for traversal and reads only file *metadata* (size,
// mtime); file contents are read later by the run loop. Per-file I/O
// errors are non-fatal and collected as warnings; only an invalid root
// or a blown file limit aborts discovery.

use crate::util::constants;
use crate::util::error::DiscoveryError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of capture files before discovery aborts with
    /// `MaxFilesExceeded`. The set is never silently truncated.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Metadata about a capture file found during discovery, before reading.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File name, used as the record `source_name` during extraction.
    pub name: String,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp.
    pub modified: Option<DateTime<Utc>>,
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover iostat capture files under `root`, applying include/exclude
/// glob patterns. The result is sorted by path so file processing order
/// (and therefore record concatenation order) is deterministic.
///
/// # Non-fatal errors
/// Files/directories that cannot be accessed are recorded as
/// human-readable strings in the returned warnings vector and do NOT
/// cause the function to return `Err`.
///
/// # Fatal errors
/// Returns `Err` if the root path is invalid (`RootNotFound`,
/// `NotADirectory`, `PermissionDenied`) or more than `max_files`
/// matching files exist (`MaxFilesExceeded`).
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<(Vec<DiscoveredFile>, Vec<String>), DiscoveryError> {
    // Pre-flight: fs::metadata rather than Path::is_dir so an
    // access-denied root is distinguishable from a missing one.
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    tracing::debug!(
        root = %root.display(),
        max_depth = config.max_depth,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    // Compile glob patterns once; log and skip any that fail compilation.
    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files: Vec<DiscoveredFile> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // `filter_entry` short-circuits directory descent for excluded
    // directory names, so excluded subtrees are never traversed at all.
    let walker = walkdir::WalkDir::new(root)
        .max_depth(config.max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() {
                // Always allow the root itself.
                if e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_str().unwrap_or("");
                return !is_excluded_component(name, &exclude_pats);
            }
            true // Visit files; we filter them individually below
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }
        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if files.len() >= config.max_files {
            return Err(DiscoveryError::MaxFilesExceeded {
                max: config.max_files,
            });
        }

        files.push(DiscoveredFile {
            path: path.to_path_buf(),
            name: file_name.to_string(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    // Deterministic processing order regardless of walkdir's traversal order.
    files.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `dir_name` matches any exclude pattern that contains no
/// wildcard characters. These are treated as directory component exclusions
/// (e.g. ".git") rather than filename glob patterns.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

/// Returns true if `file_name` matches any exclude pattern (wildcard or literal).
fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

/// Returns true if `file_name` matches at least one include pattern.
/// An empty include list means "include all" (returns true).
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats.iter().any(|p| p.matches(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str) {
        fs::write(dir.join(name), "content").unwrap();
    }

    #[test]
    fn test_discovers_only_matching_captures() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "iostat-10.0.0.1-sda.output");
        write_file(dir.path(), "iostat-10.0.0.2-sdb.output");
        write_file(dir.path(), "notes.txt");
        write_file(dir.path(), "iostat-10.0.0.3-sdc.output.gz");

        let (files, warnings) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();

        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "iostat-10.0.0.1-sda.output",
                "iostat-10.0.0.2-sdb.output"
            ]
        );
    }

    /// Results come back path-sorted so concatenation order is deterministic.
    #[test]
    fn test_results_are_path_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "iostat-zz-a.output");
        write_file(dir.path(), "iostat-aa-a.output");

        let (files, _) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(files[0].name, "iostat-aa-a.output");
        assert_eq!(files[1].name, "iostat-zz-a.output");
    }

    #[test]
    fn test_nonexistent_root_returns_error() {
        let result = discover_files(
            Path::new("/nonexistent/awaitsleuth-test-path"),
            &DiscoveryConfig::default(),
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_file_returns_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("iostat-h-a.output");
        fs::write(&file, "content").unwrap();

        let result = discover_files(&file, &DiscoveryConfig::default());
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_max_files_exceeded_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "iostat-h1-a.output");
        write_file(dir.path(), "iostat-h2-a.output");

        let config = DiscoveryConfig {
            max_files: 1,
            ..Default::default()
        };
        let result = discover_files(dir.path(), &config);
        assert!(matches!(
            result,
            Err(DiscoveryError::MaxFilesExceeded { max: 1 })
        ));
    }

    #[test]
    fn test_excluded_directory_is_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "iostat-h1-a.output");
        let excluded = dir.path().join(".git");
        fs::create_dir(&excluded).unwrap();
        write_file(&excluded, "iostat-h2-a.output");

        let (files, _) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "iostat-h1-a.output");
    }

    #[test]
    fn test_empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let (files, warnings) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert!(files.is_empty());
        assert!(warnings.is_empty());
    }
}
