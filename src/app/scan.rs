// werview - app/scan.rs
//
// Batch lifecycle: discovery followed by a strictly sequential per-file
// parse loop. Orchestration only; all parsing behaviour lives in core.
//
// Per-file failures are isolated: a file that cannot be decoded or
// normalized is recorded in the outcome and the batch continues with the
// next file. Nothing about one file's parse survives into the next —
// every transient bucket is scoped inside `parser::parse_content`.

use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::model::WerReport;
use crate::core::parser;
use crate::util::error::{DiscoveryError, ParseError};
use std::path::{Path, PathBuf};

// =============================================================================
// Outcome
// =============================================================================

/// One file that failed to parse, with the error that failed it.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ParseError,
}

/// Aggregated result of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successfully parsed reports, in discovery order.
    pub reports: Vec<WerReport>,

    /// Files that failed, each with its per-file error.
    pub failures: Vec<FileFailure>,

    /// Non-fatal diagnostics: discovery warnings plus per-file parse
    /// warnings prefixed with the file path.
    pub warnings: Vec<String>,
}

// =============================================================================
// Batch pipeline
// =============================================================================

/// Discover and parse every report file under `root`, one file at a time.
///
/// `on_file_done(path, completed, total)` fires after each file finishes
/// (parsed or failed) so the caller can drive a progress indicator.
///
/// Returns `Err` only when discovery itself fails (unusable root); every
/// per-file error lands in `BatchOutcome::failures` instead.
pub fn run_batch<F>(
    root: &Path,
    config: &DiscoveryConfig,
    mut on_file_done: F,
) -> Result<BatchOutcome, DiscoveryError>
where
    F: FnMut(&Path, usize, usize),
{
    let (files, mut warnings) = discovery::discover_report_files(root, config, |path, count| {
        tracing::trace!(file = %path.display(), count, "Report file discovered");
    })?;

    let total = files.len();
    tracing::info!(root = %root.display(), total, "Batch parse starting");

    let mut reports = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (i, path) in files.iter().enumerate() {
        match parser::parse_report_file(path) {
            Ok(parsed) => {
                for warning in parsed.warnings {
                    warnings.push(format!("{}: {warning}", path.display()));
                }
                reports.push(parsed.report);
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), %error, "Report file failed to parse");
                failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
        on_file_done(path, i + 1, total);
    }

    tracing::info!(
        parsed = reports.len(),
        failed = failures.len(),
        warnings = warnings.len(),
        "Batch parse complete"
    );

    Ok(BatchOutcome {
        reports,
        failures,
        warnings,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Minimal complete report content (mandatory plain fields + OsInfo).
    fn report_content(program: &str) -> String {
        format!(
            "Version=1\r\n\
             EventType=APPCRASH\r\n\
             EventTime=133498250000000000\r\n\
             Consent=1\r\n\
             UploadTime=133498250600000000\r\n\
             ReportStatus=0\r\n\
             ReportIdentifier=id-{program}\r\n\
             Wow64Host=34404\r\n\
             AppSessionGuid=guid-{program}\r\n\
             BootId=1\r\n\
             TargetAsId=2\r\n\
             FriendlyEventName=Stopped working\r\n\
             ConsentKey=APPCRASH\r\n\
             AppName={program}\r\n\
             ApplicationIdentity=ident\r\n\
             MetadataHash=123\r\n\
             Sig[0].Name=Application Name\r\n\
             Sig[0].Value={program}.exe\r\n\
             OsInfo[0].Key=vermaj\r\n\
             OsInfo[0].Value=10\r\n"
        )
    }

    fn write_utf16le(path: &Path, content: &str) {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(content.encode_utf16().flat_map(|u| u.to_le_bytes()));
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_batch_parses_every_file() {
        let dir = tempfile::tempdir().unwrap();
        for (event, program) in [("AppCrash", "notepad"), ("AppHang", "word")] {
            let report_dir = dir
                .path()
                .join(format!("{event}_{program}_a1_b2_c3"));
            fs::create_dir(&report_dir).unwrap();
            write_utf16le(&report_dir.join("Report.wer"), &report_content(program));
        }

        let outcome =
            run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
        assert_eq!(outcome.reports.len(), 2);
        assert!(outcome.failures.is_empty());
        let programs: Vec<_> = outcome
            .reports
            .iter()
            .map(|r| r.program_name.as_str())
            .collect();
        assert!(programs.contains(&"notepad"));
        assert!(programs.contains(&"word"));
    }

    /// One malformed file fails alone; the rest of the batch still parses.
    #[test]
    fn test_batch_isolates_per_file_failures() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("AppCrash_notepad_a1_b2_c3");
        fs::create_dir(&good).unwrap();
        write_utf16le(&good.join("Report.wer"), &report_content("notepad"));

        // Odd byte count: not decodable as UTF-16.
        let bad = dir.path().join("AppCrash_broken_a1_b2_c3");
        fs::create_dir(&bad).unwrap();
        fs::write(bad.join("Report.wer"), [0xFF, 0xFE, 0x41]).unwrap();

        let outcome =
            run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(outcome.failures[0].error, ParseError::Decode { .. }));
        assert!(outcome.failures[0]
            .path
            .to_str()
            .unwrap()
            .contains("broken"));
    }

    #[test]
    fn test_progress_fires_after_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let report_dir = dir.path().join("AppCrash_notepad_a1_b2_c3");
        fs::create_dir(&report_dir).unwrap();
        write_utf16le(&report_dir.join("Report.wer"), &report_content("notepad"));

        let mut seen = Vec::new();
        run_batch(dir.path(), &DiscoveryConfig::default(), |_, done, total| {
            seen.push((done, total));
        })
        .unwrap();
        assert_eq!(seen, vec![(1, 1)]);
    }

    #[test]
    fn test_per_file_warnings_are_prefixed_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let report_dir = dir.path().join("AppCrash_notepad_a1_b2_c3");
        fs::create_dir(&report_dir).unwrap();
        let mut content = report_content("notepad");
        content.push_str("Sig[1].Name=Unbekanntes Feld\r\nSig[1].Value=x\r\n");
        write_utf16le(&report_dir.join("Report.wer"), &content);

        let outcome =
            run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
        assert_eq!(outcome.reports.len(), 1);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("Report.wer") && w.contains("Unbekanntes Feld")));
    }

    #[test]
    fn test_unusable_root_is_fatal() {
        let result = run_batch(
            Path::new("/nonexistent/werview-batch-root"),
            &DiscoveryConfig::default(),
            |_, _, _| {},
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }
}
