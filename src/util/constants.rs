// werview - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "werview";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Report field defaults
// =============================================================================

/// Sentinel stored in textual report fields that are absent from the source
/// file. Distinguishes "not present in the report" from an empty value.
pub const UNSET_FIELD: &str = "-";

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum number of report files to discover in a single batch.
pub const DEFAULT_MAX_FILES: usize = 10_000;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 100_000;

/// Hard upper bound on max depth (prevents infinite traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Default include glob patterns for report file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.wer"];

/// Default exclude glob patterns for report file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[];

// =============================================================================
// Directory-name conventions
// =============================================================================

/// Token count of a standard report directory name:
/// `{event}_{program}_{hash1}_{hash2}_{reportId}`.
pub const DIR_NAME_TOKENS: usize = 5;

/// Token count when the program name itself contains an underscore:
/// `{event}_{program1}_{program2}_{hash1}_{hash2}_{reportId}`.
pub const DIR_NAME_TOKENS_SPLIT_PROGRAM: usize = 6;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
