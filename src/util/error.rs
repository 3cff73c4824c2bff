// werview - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant names the file (and
// field/code where relevant) that produced it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all werview operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum WerViewError {
    /// Report file discovery failed.
    Discovery(DiscoveryError),

    /// A single report file failed to parse.
    Parse(ParseError),
}

impl fmt::Display for WerViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for WerViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to report file discovery. All variants are fatal for the
/// batch: without an enumerable root there is nothing to parse. Per-entry
/// traversal failures are collected as warnings instead (never here).
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root scan path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },
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

impl From<DiscoveryError> for WerViewError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors that fail a single report file. The batch records the failure and
/// continues with the next file; none of these abort the whole run.
#[derive(Debug)]
pub enum ParseError {
    /// The file content could not be decoded as UTF-16.
    Decode { file: PathBuf, detail: String },

    /// The containing directory name does not follow either supported
    /// underscore-delimited convention (5 or 6 tokens).
    Structural {
        file: PathBuf,
        directory: String,
        token_count: usize,
    },

    /// A mandatory plain field or mandatory record family is absent.
    MissingField { file: PathBuf, field: String },

    /// A report-type or consent code is not in the catalog. These are closed
    /// enumerations; an unknown code indicates a new, unhandled WER code and
    /// must surface rather than be silently defaulted.
    CatalogLookup {
        file: PathBuf,
        kind: &'static str,
        code: String,
    },

    /// I/O error while reading a report file.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { file, detail } => {
                write!(
                    f,
                    "'{}': not valid UTF-16 report data: {detail}",
                    file.display()
                )
            }
            Self::Structural {
                file,
                directory,
                token_count,
            } => write!(
                f,
                "'{}': report directory name '{directory}' has {token_count} \
                 underscore-delimited tokens, expected 5 or 6",
                file.display()
            ),
            Self::MissingField { file, field } => {
                write!(
                    f,
                    "'{}': mandatory field '{field}' is missing",
                    file.display()
                )
            }
            Self::CatalogLookup { file, kind, code } => {
                write!(f, "'{}': unknown {kind} code '{code}'", file.display())
            }
            Self::Io { file, source } => {
                write!(f, "'{}': I/O error: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for WerViewError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Convenience type alias for werview results.
pub type Result<T> = std::result::Result<T, WerViewError>;
