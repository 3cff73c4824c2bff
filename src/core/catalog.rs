// werview - core/catalog.rs
//
// Field catalog: the authoritative WER taxonomy tables.
//
// Three fixed mappings:
//   - report-type code -> description (closed enumeration, codes "0".."5")
//   - consent code     -> description (closed enumeration, codes "1".."5")
//   - signature label  -> canonical field (open in practice: WER localises
//     signature labels per machine, so the same field arrives under
//     different names depending on the host language)
//
// Extending locale coverage is a table addition here, never a parser change.
// Pure data and pure lookups; no mutable state.

use serde::Serialize;

// =============================================================================
// Report type codes
// =============================================================================

/// WER report-type code descriptions, keyed by the raw `ReportType` value.
const REPORT_TYPES: &[(&str, &str)] = &[
    ("0", "NonCritical(0, 중요하지 않음)"),
    ("1", "Critical(1, 심각)"),
    ("2", "ApplicationCrash(2, 애플리케이션 크래시)"),
    ("3", "ApplicationHang(3, 애플리케이션 중단)"),
    ("4", "Kernel(4, 커널)"),
    ("5", "Invalid(5, 올바르지 않음)"),
];

/// Look up the description for a raw `ReportType` code.
///
/// Returns `None` for codes outside the closed enumeration; the caller
/// surfaces that as a catalog-lookup failure rather than defaulting.
pub fn report_type_description(code: &str) -> Option<&'static str> {
    REPORT_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

// =============================================================================
// Consent codes
// =============================================================================

/// WER consent code descriptions, keyed by the raw `Consent` value.
const CONSENT_CODES: &[(&str, &str)] = &[
    ("1", "NotAsked:사용자에게 동의를 요청하지 않았습니다"),
    ("2", "Approved:사용자가 승인한 동의입니다"),
    ("3", "Denied:사용자가 동의를 거부했습니다"),
    ("4", "AlwaysPrompt:사용자는 항상 동의를 요청합니다"),
    ("5", "Max:최댓값"),
];

/// Look up the description for a raw `Consent` code.
pub fn consent_description(code: &str) -> Option<&'static str> {
    CONSENT_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

// =============================================================================
// Signature fields
// =============================================================================

/// Canonical signature field identifiers.
///
/// These are the stable slot names of `WerSignature`, independent of the
/// label's source language. Population happens through an explicit match in
/// `WerSignature::set_field` — never dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignatureField {
    ApplicationName,
    ApplicationVersion,
    ApplicationTimestamp,
    ErrorModuleName,
    ErrorModuleVersion,
    ErrorModuleTimestamp,
    ExceptionCode,
    ExceptionOffset,
    ExceptionData,
    HangSignature,
    HangType,
    PackageFullName,
    ClientAppId,
    HResult,
    OsVersion,
    OsRevision,
    DeviceClass,
    ProductHash,
}

/// Localized-or-English signature label -> canonical field.
///
/// Korean labels come from machines running Korean Windows; the English rows
/// are the labels WER emits on English hosts for the same fields.
const SIGNATURE_LABELS: &[(&str, SignatureField)] = &[
    ("응용 프로그램 이름", SignatureField::ApplicationName),
    ("Application Name", SignatureField::ApplicationName),
    ("응용 프로그램 버전", SignatureField::ApplicationVersion),
    ("Application Version", SignatureField::ApplicationVersion),
    ("응용 프로그램 타임스탬프", SignatureField::ApplicationTimestamp),
    ("Application Timestamp", SignatureField::ApplicationTimestamp),
    ("오류 모듈 이름", SignatureField::ErrorModuleName),
    ("Fault Module Name", SignatureField::ErrorModuleName),
    ("오류 모듈 버전", SignatureField::ErrorModuleVersion),
    ("Fault Module Version", SignatureField::ErrorModuleVersion),
    ("오류 모듈 타임스탬프", SignatureField::ErrorModuleTimestamp),
    ("Fault Module Timestamp", SignatureField::ErrorModuleTimestamp),
    ("예외 코드", SignatureField::ExceptionCode),
    ("Exception Code", SignatureField::ExceptionCode),
    ("예외 오프셋", SignatureField::ExceptionOffset),
    ("Exception Offset", SignatureField::ExceptionOffset),
    ("예외 데이터", SignatureField::ExceptionData),
    ("Exception Data", SignatureField::ExceptionData),
    ("Hang Signature", SignatureField::HangSignature),
    ("Hang Type", SignatureField::HangType),
    ("Package Full Name", SignatureField::PackageFullName),
    ("ClientAppId", SignatureField::ClientAppId),
    ("HResult", SignatureField::HResult),
    ("OSVersion", SignatureField::OsVersion),
    ("OSRevision", SignatureField::OsRevision),
    ("DeviceClass", SignatureField::DeviceClass),
    ("ProductHash", SignatureField::ProductHash),
];

/// Resolve a signature label (any known locale variant) to its canonical
/// field. Unknown labels return `None`; the normalizer drops them from the
/// signature and records a non-fatal warning.
pub fn canonical_field(label: &str) -> Option<SignatureField> {
    SIGNATURE_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, field)| *field)
}

// =============================================================================
// Tests
// =============================================================================
