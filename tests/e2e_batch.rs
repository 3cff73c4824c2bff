// werview - tests/e2e_batch.rs
//
// End-to-end tests for the discovery and batch parse pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, real
// UTF-16 decoding, and real timestamp rendering — no mocks, no stubs. Each
// test builds a temp tree of report directories containing UTF-16LE .wer
// files and runs the full path from raw bytes on disk to normalized
// WerReport values.

use std::fs;
use std::path::Path;

use werview::app::render;
use werview::app::scan::run_batch;
use werview::core::discovery::DiscoveryConfig;
use werview::util::error::{DiscoveryError, ParseError};

// =============================================================================
// Helpers
// =============================================================================

/// FILETIME ticks for a Unix timestamp in seconds.
fn ticks(unix_secs: i64) -> i64 {
    116_444_736_000_000_000 + unix_secs * 10_000_000
}

/// Complete report content with every mandatory plain field.
fn report_content(program: &str, event_ticks: i64) -> String {
    format!(
        "Version=1\r\n\
         EventType=APPCRASH\r\n\
         EventTime={event_ticks}\r\n\
         ReportType=2\r\n\
         Consent=2\r\n\
         UploadTime={upload_ticks}\r\n\
         ReportStatus=268435456\r\n\
         ReportIdentifier=id-{program}\r\n\
         Wow64Host=34404\r\n\
         AppSessionGuid=guid-{program}\r\n\
         BootId=4294967295\r\n\
         TargetAsId=2362\r\n\
         FriendlyEventName=Stopped working\r\n\
         ConsentKey=APPCRASH\r\n\
         AppName={program}\r\n\
         ApplicationIdentity=5CB4092BAD2F00859596EAA34D7AC57C\r\n\
         MetadataHash=1371942804\r\n\
         Response.BucketId=1342877660590364180\r\n\
         Sig[0].Name=Application Name\r\n\
         Sig[0].Value={program}.exe\r\n\
         Sig[1].Name=오류 모듈 이름\r\n\
         Sig[1].Value=ntdll.dll\r\n\
         DynamicSig[1].Name=OS Version\r\n\
         DynamicSig[1].Value=10.0.19045.2.0.0.256.48\r\n\
         LoadedModule[0]=C:\\Windows\\SYSTEM32\\ntdll.dll\r\n\
         State[0].Key=Transport.DoneStage1\r\n\
         State[0].Value=1\r\n\
         OsInfo[0].Key=vermaj\r\n\
         OsInfo[0].Value=10\r\n",
        upload_ticks = event_ticks + 600_000_000,
    )
}

/// Write `content` as UTF-16LE with a BOM, the encoding WER uses.
fn write_report(dir: &Path, dir_name: &str, content: &str) {
    let report_dir = dir.join(dir_name);
    fs::create_dir(&report_dir).unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(content.encode_utf16().flat_map(|u| u.to_le_bytes()));
    fs::write(report_dir.join("Report.wer"), bytes).unwrap();
}

// =============================================================================
// Batch E2E
// =============================================================================

/// A tree of valid reports parses completely, and the rendered table lists
/// them newest-first with the signature's faulting module.
#[test]
fn e2e_batch_parses_and_renders_sorted_table() {
    let dir = tempfile::tempdir().unwrap();

    // notepad crashed a day after word.
    write_report(
        dir.path(),
        "AppCrash_notepad_a1b2_c3d4_001",
        &report_content("notepad", ticks(1_705_329_022)),
    );
    write_report(
        dir.path(),
        "AppCrash_word_e5f6_a7b8_002",
        &report_content("word", ticks(1_705_242_622)),
    );

    let outcome = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    assert_eq!(outcome.reports.len(), 2, "failures: {:?}", outcome.failures);
    assert!(outcome.failures.is_empty());

    let mut reports = outcome.reports;
    render::sort_by_event_time_desc(&mut reports);
    assert_eq!(reports[0].app_name, "notepad");
    assert_eq!(reports[1].app_name, "word");

    // Normalized content survived the full pipeline.
    let notepad = &reports[0];
    assert_eq!(notepad.program_name, "notepad");
    assert_eq!(notepad.dir_event, "AppCrash");
    assert_eq!(
        notepad.report_type_description,
        "ApplicationCrash(2, 애플리케이션 크래시)"
    );
    assert_eq!(notepad.signature.application_name, "notepad.exe");
    assert_eq!(notepad.signature.error_module_name, "ntdll.dll");
    assert_eq!(notepad.response.bucket_id, "1342877660590364180");
    assert_eq!(notepad.os_info[0].key, "vermaj");

    let table = render::summary_table(&reports).to_string();
    assert!(table.contains("notepad"));
    assert!(table.contains("ntdll.dll"));
    assert!(table.contains("APPCRASH"));
}

/// A six-token directory name concatenates the split program name.
#[test]
fn e2e_six_token_directory_program_name() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "AppHang_my_tool_a1b2_c3d4_003",
        &report_content("mytool", ticks(1_705_329_022)),
    );

    let outcome = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    assert_eq!(outcome.reports.len(), 1, "failures: {:?}", outcome.failures);
    assert_eq!(outcome.reports[0].program_name, "mytool");
    assert_eq!(outcome.reports[0].first_hash, "a1b2");
    assert_eq!(outcome.reports[0].report_id, "003");
}

/// A file missing a mandatory field fails alone, naming the key; the rest
/// of the batch still parses.
#[test]
fn e2e_missing_mandatory_field_is_isolated() {
    let dir = tempfile::tempdir().unwrap();

    write_report(
        dir.path(),
        "AppCrash_notepad_a1b2_c3d4_001",
        &report_content("notepad", ticks(1_705_329_022)),
    );
    let broken = report_content("broken", ticks(1_705_329_022)).replace("Version=1\r\n", "");
    write_report(dir.path(), "AppCrash_broken_a1b2_c3d4_004", &broken);

    let outcome = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    match &outcome.failures[0].error {
        ParseError::MissingField { field, .. } => assert_eq!(field, "Version"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

/// Parsing the same tree twice yields field-for-field equal reports.
#[test]
fn e2e_batch_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "AppCrash_notepad_a1b2_c3d4_001",
        &report_content("notepad", ticks(1_705_329_022)),
    );

    let first = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    let second = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    assert_eq!(first.reports, second.reports);
}

/// Non-.wer files in report directories are never parsed.
#[test]
fn e2e_sibling_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "AppCrash_notepad_a1b2_c3d4_001",
        &report_content("notepad", ticks(1_705_329_022)),
    );
    // Heap dump next to the report; binary, not UTF-16, must be ignored.
    fs::write(
        dir.path()
            .join("AppCrash_notepad_a1b2_c3d4_001")
            .join("memory.hdmp"),
        [0x4D, 0x44, 0x4D, 0x50],
    )
    .unwrap();

    let outcome = run_batch(dir.path(), &DiscoveryConfig::default(), |_, _, _| {}).unwrap();
    assert_eq!(outcome.reports.len(), 1);
    assert!(outcome.failures.is_empty());
}

/// A nonexistent root fails the whole batch up front.
#[test]
fn e2e_nonexistent_root_returns_error() {
    let result = run_batch(
        Path::new("/nonexistent/werview-e2e-test-path"),
        &DiscoveryConfig::default(),
        |_, _, _| {},
    );
    assert!(
        matches!(result, Err(DiscoveryError::RootNotFound { .. })),
        "expected RootNotFound, got {result:?}"
    );
}
