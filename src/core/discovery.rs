// werview - core/discovery.rs
//
// Recursive directory traversal and report file discovery.
//
// Reads only file *paths*; file contents are owned by the parser. Per-file
// I/O errors during traversal are non-fatal and collected as warnings; only
// an unusable root is a hard error.

use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
///
/// All limits reference named constants from `util::constants` so they are
/// auditable in a single place.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of matching files to return before stopping.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
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

// =============================================================================
// Discovery
// =============================================================================

/// Discover report files under `root`, applying include/exclude glob
/// patterns.
///
/// # Progress reporting
/// `on_file_found` is called once per accepted file with the path and the
/// running count. The callback should be cheap; it runs on the caller's
/// thread.
///
/// # Non-fatal errors
/// Files/directories that cannot be accessed are recorded as human-readable
/// strings in the returned warnings vector and do NOT cause `Err`.
///
/// # Fatal errors
/// Returns `Err` only when the root path is unusable (`RootNotFound`,
/// `NotADirectory`, `PermissionDenied`).
pub fn discover_report_files<F>(
    root: &Path,
    config: &DiscoveryConfig,
    mut on_file_found: F,
) -> Result<(Vec<PathBuf>, Vec<String>), DiscoveryError>
where
    F: FnMut(&Path, usize),
{
    use crate::util::constants;

    // Pre-flight validation via fs::metadata rather than Path::exists(),
    // which maps ALL errors (including PermissionDenied) to `false`.
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            });
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
    }

    // Clamp config limits to absolute bounds.
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        max_files,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files: Vec<PathBuf> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // `filter_entry` short-circuits descent into excluded directory names,
    // so excluded subtrees are never traversed at all.
    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
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
            true // Visit files; they are filtered individually below.
        });

    for entry_result in walker {
        if files.len() >= max_files {
            warnings.push(format!(
                "Discovery stopped at the limit of {max_files} report files; \
                 narrow the scan path to see the rest."
            ));
            tracing::info!(limit = max_files, "File enumeration truncated");
            break;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // Inaccessible entry: non-fatal, record warning.
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

        // Directories are handled above by filter_entry.
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

        let count = files.len() + 1;
        on_file_found(path, count);
        files.push(path.to_path_buf());
    }

    tracing::debug!(
        files_found = files.len(),
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
/// rather than filename glob patterns.
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

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        // Two report directories with the WER layout.
        let crash = root.join("AppCrash_notepad_a1_b2_c3");
        fs::create_dir(&crash).expect("mkdir crash");
        fs::write(crash.join("Report.wer"), "stub").expect("write crash report");

        let hang = root.join("AppHang_word_d4_e5_f6");
        fs::create_dir(&hang).expect("mkdir hang");
        fs::write(hang.join("Report.wer"), "stub").expect("write hang report");

        // Non-report files that must be skipped.
        fs::write(crash.join("memory.hdmp"), "dump").expect("write dump");
        fs::write(root.join("notes.txt"), "text").expect("write txt");

        dir
    }

    #[test]
    fn test_discovers_only_report_files() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig::default();
        let (files, warnings) =
            discover_report_files(dir.path(), &config, |_, _| {}).unwrap();

        assert_eq!(files.len(), 2, "expected the two .wer files, got {files:?}");
        assert!(files
            .iter()
            .all(|p| p.extension().is_some_and(|e| e == "wer")));
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_max_depth_zero_finds_no_files() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_depth: 0,
            ..Default::default()
        };
        let (files, _) = discover_report_files(dir.path(), &config, |_, _| {}).unwrap();
        assert_eq!(files.len(), 0);
    }

    #[test]
    fn test_max_files_truncates_with_warning() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_files: 1,
            ..Default::default()
        };
        let (files, warnings) =
            discover_report_files(dir.path(), &config, |_, _| {}).unwrap();
        assert_eq!(files.len(), 1);
        assert!(
            warnings.iter().any(|w| w.contains("limit")),
            "expected a truncation warning, got {warnings:?}"
        );
    }

    #[test]
    fn test_excluded_directory_not_descended() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            exclude_patterns: vec!["AppHang_word_d4_e5_f6".to_string()],
            ..Default::default()
        };
        let (files, _) = discover_report_files(dir.path(), &config, |_, _| {}).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].to_str().unwrap().contains("AppCrash"));
    }

    #[test]
    fn test_root_not_found() {
        let result = discover_report_files(
            Path::new("/nonexistent/path/werview"),
            &DiscoveryConfig::default(),
            |_, _| {},
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Report.wer");
        fs::write(&file, "content").unwrap();
        let result = discover_report_files(&file, &DiscoveryConfig::default(), |_, _| {});
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_progress_callback_called_for_each_file() {
        let dir = make_temp_tree();
        let mut callback_count = 0usize;
        let (files, _) =
            discover_report_files(dir.path(), &DiscoveryConfig::default(), |_, _| {
                callback_count += 1;
            })
            .unwrap();
        assert_eq!(
            callback_count,
            files.len(),
            "callback should fire for each accepted file"
        );
    }
}
