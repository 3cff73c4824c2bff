// werview - core/parser.rs
//
// Per-file report parsing: UTF-16 decode, line classification, and
// sub-record reconstruction, feeding the normalizer.
//
// A report file is a flat sequence of `Key=Value` lines. Some lines belong
// to repeated, indexed families (`Sig[0].Name=...` / `Sig[0].Value=...`)
// that are interleaved with plain lines; classification buckets them per
// family, reconstruction pairs same-index fragments back into sub-records.
//
// All transient state lives in a `LineBuckets` value created inside each
// parse invocation. Nothing is shared or carried across files.

use crate::core::model::{KeyValue, NameValue, WerReport, WerResponse};
use crate::core::normalize;
use crate::util::error::ParseError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

// =============================================================================
// Result of parsing a single report file
// =============================================================================

/// One parsed report plus the non-fatal diagnostics collected on the way
/// (unrecognised signature labels, unrenderable timestamps).
#[derive(Debug)]
pub struct ParsedReport {
    pub report: WerReport,
    pub warnings: Vec<String>,
}

// =============================================================================
// Entry points
// =============================================================================

/// Read and parse one `.wer` file.
///
/// The file is read whole and decoded as UTF-16 before any classification;
/// the read buffer is dropped on every exit path before the caller moves to
/// the next file.
pub fn parse_report_file(path: &Path) -> Result<ParsedReport, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    let content = decode_utf16(&bytes, path)?;
    parse_content(&content, path)
}

/// Parse already-decoded report content attributed to `path`.
///
/// `path` supplies the file identity (file name and the underscore-delimited
/// containing-directory name the normalizer splits).
pub fn parse_content(content: &str, path: &Path) -> Result<ParsedReport, ParseError> {
    let buckets = classify_lines(content);

    tracing::debug!(
        file = %path.display(),
        plain = buckets.plain.len(),
        sig = buckets.sig.len(),
        dynamic_sig = buckets.dynamic_sig.len(),
        response = buckets.response.len(),
        "Lines classified"
    );

    let families = reconstruct_families(&buckets);
    normalize::assemble(path, buckets.plain, families)
}

// =============================================================================
// UTF-16 decoding
// =============================================================================

/// Decode report bytes as UTF-16.
///
/// Little-endian without a BOM is the Windows default; a BOM (LE or BE) is
/// honoured when present. Malformed sequences (including a trailing odd
/// byte) fail the file.
fn decode_utf16(bytes: &[u8], path: &Path) -> Result<String, ParseError> {
    let (text, encoding, had_errors) = encoding_rs::UTF_16LE.decode(bytes);
    if had_errors {
        return Err(ParseError::Decode {
            file: path.to_path_buf(),
            detail: format!("malformed {} sequence", encoding.name()),
        });
    }
    Ok(text.into_owned())
}

// =============================================================================
// Line classification
// =============================================================================

/// Per-family line buckets for one file. Created fresh inside each parse
/// invocation and consumed by reconstruction; never reused across files.
#[derive(Debug, Default)]
pub(crate) struct LineBuckets {
    pub(crate) plain: HashMap<String, String>,
    pub(crate) response: Vec<String>,
    pub(crate) sig: Vec<String>,
    pub(crate) dynamic_sig: Vec<String>,
    pub(crate) ui: Vec<String>,
    pub(crate) loaded_modules: Vec<String>,
    pub(crate) state: Vec<String>,
    pub(crate) os_info: Vec<String>,
}

/// Bucket each decoded line by family.
///
/// Markers are tested as substrings in priority order; `DynamicSig[` must be
/// tested before `Sig[` because the latter is a substring of the former.
/// A line matching no marker is a plain `Key=Value` line split on the FIRST
/// `=` (a value containing further `=` is preserved verbatim). Empty lines
/// are skipped; a non-empty line without `=` is skipped with a debug log.
pub(crate) fn classify_lines(content: &str) -> LineBuckets {
    let mut buckets = LineBuckets::default();

    for raw_line in content.lines() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if line.contains("Response.") {
            buckets.response.push(line.to_string());
        } else if line.contains("DynamicSig[") {
            buckets.dynamic_sig.push(line.to_string());
        } else if line.contains("Sig[") {
            buckets.sig.push(line.to_string());
        } else if line.contains("UI[") {
            buckets.ui.push(line.to_string());
        } else if line.contains("LoadedModule[") {
            buckets.loaded_modules.push(line.to_string());
        } else if line.contains("State[") {
            buckets.state.push(line.to_string());
        } else if line.contains("OsInfo[") {
            buckets.os_info.push(line.to_string());
        } else {
            match line.split_once('=') {
                Some((key, value)) => {
                    buckets.plain.insert(key.to_string(), value.to_string());
                }
                None => {
                    tracing::debug!(line, "Plain line without '=', skipped");
                }
            }
        }
    }

    buckets
}

// =============================================================================
// Sub-record reconstruction
// =============================================================================

/// Reconstructed sub-records of every indexed family, ready for the
/// normalizer. `None` marks a family with no lines at all (the normalizer
/// decides whether absence is tolerated or a missing-field error).
pub(crate) struct ReconstructedFamilies {
    pub(crate) response: Option<WerResponse>,
    pub(crate) signature: Vec<NameValue>,
    pub(crate) dynamic_signature: Vec<NameValue>,
    pub(crate) ui: Vec<String>,
    pub(crate) loaded_modules: Vec<String>,
    pub(crate) state: Vec<KeyValue>,
    pub(crate) os_info: Option<Vec<KeyValue>>,
}

/// Run every family's reconstruction over its bucket.
fn reconstruct_families(buckets: &LineBuckets) -> ReconstructedFamilies {
    ReconstructedFamilies {
        response: if buckets.response.is_empty() {
            None
        } else {
            Some(reconstruct_response(&buckets.response))
        },
        signature: reconstruct_pairs(&buckets.sig, "Sig", "Name")
            .into_iter()
            .map(|(name, value)| NameValue { name, value })
            .collect(),
        dynamic_signature: reconstruct_pairs(&buckets.dynamic_sig, "DynamicSig", "Name")
            .into_iter()
            .map(|(name, value)| NameValue { name, value })
            .collect(),
        ui: reconstruct_single(&buckets.ui, "UI"),
        loaded_modules: reconstruct_single(&buckets.loaded_modules, "LoadedModule"),
        state: reconstruct_pairs(&buckets.state, "State", "Key")
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect(),
        os_info: if buckets.os_info.is_empty() {
            None
        } else {
            Some(
                reconstruct_pairs(&buckets.os_info, "OsInfo", "Key")
                    .into_iter()
                    .map(|(key, value)| KeyValue { key, value })
                    .collect(),
            )
        },
    }
}

/// `Family[n].Slot=value` line shape shared by Sig, DynamicSig, State and
/// OsInfo.
fn pair_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern is exercised by the unit tests below, so a mistake here shows
    // up as a failing test rather than a runtime panic.
    RE.get_or_init(|| Regex::new(r"^(\w+)\[(\d+)\]\.(\w+)=(.*)$").expect("pair line regex"))
}

/// `Family[n]=value` line shape shared by UI and LoadedModule.
fn single_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\[(\d+)\]=(.*)$").expect("single line regex"))
}

/// `Response.Key=value` line shape. The value capture stops at whitespace.
fn response_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Response\.(\w+)=(\S+)").expect("response line regex"))
}

/// Pair `<name_slot>=` / `Value=` lines sharing the same bracketed index
/// into `(name, value)` records, preserving file order (NOT numeric index
/// order).
///
/// Pairing is intentionally lossy on malformed input: a name fragment with
/// no matching value for the same index yields no record, as does an orphan
/// value. Dropped fragments are traced, never raised.
fn reconstruct_pairs(lines: &[String], family: &str, name_slot: &str) -> Vec<(String, String)> {
    let re = pair_line_re();
    let mut records = Vec::new();
    // (index, name) of a name fragment awaiting its value.
    let mut pending: Option<(String, String)> = None;

    for line in lines {
        let Some(caps) = re.captures(line) else {
            tracing::trace!(family, line, "Unmatched indexed line, dropped");
            continue;
        };
        if &caps[1] != family {
            tracing::trace!(family, line, "Foreign family in bucket, dropped");
            continue;
        }
        let index = caps[2].to_string();
        let slot = &caps[3];
        let value = caps[4].to_string();

        if slot == name_slot {
            if let Some((dropped_index, _)) = pending.replace((index, value)) {
                tracing::trace!(family, index = dropped_index, "Unpaired name fragment dropped");
            }
        } else if slot == "Value" {
            match pending.take() {
                Some((pending_index, name)) if pending_index == index => {
                    records.push((name, value));
                }
                Some((pending_index, _)) => {
                    tracing::trace!(
                        family,
                        expected = pending_index,
                        got = index,
                        "Index mismatch between name and value fragments, both dropped"
                    );
                }
                None => {
                    tracing::trace!(family, index, "Orphan value fragment dropped");
                }
            }
        } else {
            tracing::trace!(family, slot, "Unknown slot, dropped");
        }
    }

    records
}

/// Extract the bare value of each `Family[n]=value` line, in file order.
fn reconstruct_single(lines: &[String], family: &str) -> Vec<String> {
    let re = single_line_re();
    lines
        .iter()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            if &caps[1] != family {
                tracing::trace!(family, line, "Foreign family in bucket, dropped");
                return None;
            }
            Some(caps[3].to_string())
        })
        .collect()
}

/// Map `Response.*` lines onto the response slots. Unknown keys are skipped.
fn reconstruct_response(lines: &[String]) -> WerResponse {
    let re = response_line_re();
    let mut response = WerResponse::default();

    for line in lines {
        let Some(caps) = re.captures(line) else {
            tracing::trace!(line, "Unmatched response line, dropped");
            continue;
        };
        let value = caps[2].to_string();
        match &caps[1] {
            "BucketId" => response.bucket_id = value,
            "BucketTable" => response.bucket_table = value,
            "LegacyBucketId" => response.legacy_bucket_id = value,
            "type" => response.response_type = value,
            other => {
                tracing::debug!(key = other, "Unknown response key, skipped");
            }
        }
    }

    response
}

// =============================================================================
// Tests
// =============================================================================
