// werview - core/normalize.rs
//
// Report normalization: the flat plain-line map plus the reconstructed
// family records of one file become a single canonical `WerReport`.
//
// Mandatory fields fail the file with an error naming the key; optional
// fields fall back to defined sentinels. Report-type and consent codes are
// closed enumerations resolved through the catalog; unknown codes surface
// as errors. Signature labels resolve through the catalog's localized-name
// dictionary; unknown labels are dropped from the signature and recorded on
// the warning channel.

use crate::core::catalog;
use crate::core::model::{WerReport, WerSignature};
use crate::core::parser::{ParsedReport, ReconstructedFamilies};
use crate::core::timefmt;
use crate::util::constants::{DIR_NAME_TOKENS, DIR_NAME_TOKENS_SPLIT_PROGRAM, UNSET_FIELD};
use crate::util::error::ParseError;
use std::collections::HashMap;
use std::path::Path;

// =============================================================================
// Directory-name identity
// =============================================================================

/// The four identity components encoded in a report directory name.
struct DirComponents {
    event: String,
    program: String,
    first_hash: String,
    second_hash: String,
    report_id: String,
}

/// Split a report directory name on `_`.
///
/// Five tokens map directly; six tokens mean the program name itself
/// contained an underscore, so tokens 1 and 2 are concatenated. Any other
/// count violates the naming convention and fails the file.
fn split_directory_name(path: &Path, directory: &str) -> Result<DirComponents, ParseError> {
    let tokens: Vec<&str> = directory.split('_').collect();

    match tokens.len() {
        n if n == DIR_NAME_TOKENS => Ok(DirComponents {
            event: tokens[0].to_string(),
            program: tokens[1].to_string(),
            first_hash: tokens[2].to_string(),
            second_hash: tokens[3].to_string(),
            report_id: tokens[4].to_string(),
        }),
        n if n == DIR_NAME_TOKENS_SPLIT_PROGRAM => Ok(DirComponents {
            event: tokens[0].to_string(),
            program: format!("{}{}", tokens[1], tokens[2]),
            first_hash: tokens[3].to_string(),
            second_hash: tokens[4].to_string(),
            report_id: tokens[5].to_string(),
        }),
        n => Err(ParseError::Structural {
            file: path.to_path_buf(),
            directory: directory.to_string(),
            token_count: n,
        }),
    }
}

// =============================================================================
// Field access
// =============================================================================

/// Fetch a mandatory plain field, failing with an error naming the key.
fn require(
    fields: &HashMap<String, String>,
    key: &str,
    path: &Path,
) -> Result<String, ParseError> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| ParseError::MissingField {
            file: path.to_path_buf(),
            field: key.to_string(),
        })
}

/// Fetch an optional plain field, substituting `default` when absent.
fn optional(fields: &HashMap<String, String>, key: &str, default: &str) -> String {
    fields.get(key).cloned().unwrap_or_else(|| default.to_string())
}

/// Render a raw tick field into its readable companion, recording a warning
/// when the value is not a renderable tick count.
fn readable_time(key: &str, raw: &str, warnings: &mut Vec<String>) -> String {
    match timefmt::format_raw_ticks(raw) {
        Some(rendered) => rendered,
        None => {
            tracing::warn!(key, raw, "Timestamp field is not a renderable tick count");
            warnings.push(format!("{key} '{raw}' is not a renderable tick count"));
            UNSET_FIELD.to_string()
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Build one `WerReport` from the parsed pieces of one file.
pub(crate) fn assemble(
    path: &Path,
    fields: HashMap<String, String>,
    families: ReconstructedFamilies,
) -> Result<ParsedReport, ParseError> {
    let mut warnings = Vec::new();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let file_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let dir = split_directory_name(path, &file_dir)?;

    // --- mandatory plain fields ---
    let version = require(&fields, "Version", path)?;
    let event_type = require(&fields, "EventType", path)?;
    let event_time = require(&fields, "EventTime", path)?;
    let consent = require(&fields, "Consent", path)?;
    let upload_time = require(&fields, "UploadTime", path)?;
    let report_status = require(&fields, "ReportStatus", path)?;
    let report_identifier = require(&fields, "ReportIdentifier", path)?;
    let wow64_host = require(&fields, "Wow64Host", path)?;
    let app_session_guid = require(&fields, "AppSessionGuid", path)?;
    let boot_id = require(&fields, "BootId", path)?;
    let target_as_id = require(&fields, "TargetAsId", path)?;
    let friendly_event_name = require(&fields, "FriendlyEventName", path)?;
    let consent_key = require(&fields, "ConsentKey", path)?;
    let app_name = require(&fields, "AppName", path)?;
    let application_identity = require(&fields, "ApplicationIdentity", path)?;
    let metadata_hash = require(&fields, "MetadataHash", path)?;

    // --- catalog resolution (closed enumerations fail fast) ---
    let report_type = optional(&fields, "ReportType", UNSET_FIELD);
    let report_type_description = match fields.get("ReportType") {
        Some(code) => catalog::report_type_description(code)
            .ok_or_else(|| ParseError::CatalogLookup {
                file: path.to_path_buf(),
                kind: "report-type",
                code: code.clone(),
            })?
            .to_string(),
        None => UNSET_FIELD.to_string(),
    };
    let consent_description = catalog::consent_description(&consent)
        .ok_or_else(|| ParseError::CatalogLookup {
            file: path.to_path_buf(),
            kind: "consent",
            code: consent.clone(),
        })?
        .to_string();

    // --- readable timestamp companions ---
    let event_time_readable = readable_time("EventTime", &event_time, &mut warnings);
    let upload_time_readable = readable_time("UploadTime", &upload_time, &mut warnings);

    // --- signature assembly via the catalog's localized-name dictionary ---
    let mut signature = WerSignature::default();
    for record in &families.signature {
        match catalog::canonical_field(&record.name) {
            Some(field) => signature.set_field(field, record.value.clone()),
            None => {
                tracing::warn!(
                    file = %path.display(),
                    label = %record.name,
                    "Signature label not in catalog, dropped"
                );
                warnings.push(format!("unrecognised signature label '{}'", record.name));
            }
        }
    }

    // --- mandatory family ---
    let os_info = families.os_info.ok_or_else(|| ParseError::MissingField {
        file: path.to_path_buf(),
        field: "OsInfo".to_string(),
    })?;

    let report = WerReport {
        file_name,
        file_dir,
        dir_event: dir.event,
        program_name: dir.program,
        first_hash: dir.first_hash,
        second_hash: dir.second_hash,
        report_id: dir.report_id,

        version,
        event_type,
        event_time,
        event_time_readable,
        report_type,
        report_type_description,
        consent,
        consent_description,
        upload_time,
        upload_time_readable,
        report_flags: optional(&fields, "ReportFlags", UNSET_FIELD),
        report_status,
        report_identifier,
        integrator_report_identifier: optional(&fields, "IntegratorReportIdentifier", UNSET_FIELD),
        wow64_host,
        app_session_guid,
        boot_id,
        heap_dump_attached: optional(&fields, "HeapdumpAttached", ""),
        target_as_id,
        target_app_id: optional(&fields, "TargetAppId", UNSET_FIELD),
        target_app_ver: optional(&fields, "TargetAppVer", UNSET_FIELD),
        user_impact_vector: optional(&fields, "UserImpactVector", ""),
        is_fatal: optional(&fields, "IsFatal", ""),
        friendly_event_name,
        consent_key,
        app_name,
        ns_partner: optional(&fields, "NsPartner", ""),
        ns_group: optional(&fields, "NsGroup", ""),
        application_identity,
        metadata_hash,
        original_file_name: optional(&fields, "OriginalFilename", UNSET_FIELD),

        response: families.response.unwrap_or_default(),
        signature,
        dynamic_signature: families.dynamic_signature,
        ui: families.ui,
        loaded_modules: families.loaded_modules,
        state: families.state,
        os_info,

        raw_fields: fields,
    };

    Ok(ParsedReport { report, warnings })
}

// =============================================================================
// Tests
// =============================================================================
