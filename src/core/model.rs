// werview - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across parsing, batch collection,
// and rendering. One `WerReport` is produced per source file and is
// immutable once the normalizer returns it.

use crate::core::catalog::SignatureField;
use crate::util::constants::UNSET_FIELD;
use serde::Serialize;
use std::collections::HashMap;

// =============================================================================
// Sub-records
// =============================================================================

/// A reconstructed `Name`/`Value` sub-record (Sig and DynamicSig families).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

/// A reconstructed `Key`/`Value` sub-record (State and OsInfo families).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

// =============================================================================
// Response
// =============================================================================

/// The `Response.*` sub-entity of a report. Every field is optional in the
/// source data and defaults to empty; an absent Response family yields an
/// all-default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WerResponse {
    pub bucket_id: String,
    pub bucket_table: String,
    pub legacy_bucket_id: String,
    #[serde(rename = "type")]
    pub response_type: String,
}

// =============================================================================
// Signature
// =============================================================================

/// The normalized crash signature: one slot per canonical field name,
/// independent of the label's source language. Every slot defaults to the
/// `"-"` sentinel so no field is ever uninitialised.
///
/// Slots are populated through `set_field` — an explicit dispatch on
/// `SignatureField`, never by attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WerSignature {
    pub application_name: String,
    pub application_version: String,
    pub application_timestamp: String,
    pub error_module_name: String,
    pub error_module_version: String,
    pub error_module_timestamp: String,
    pub exception_code: String,
    pub exception_offset: String,
    pub exception_data: String,
    pub hang_signature: String,
    pub hang_type: String,
    pub package_full_name: String,
    pub client_app_id: String,
    pub h_result: String,
    pub os_version: String,
    pub os_revision: String,
    pub device_class: String,
    pub product_hash: String,
}

impl Default for WerSignature {
    fn default() -> Self {
        let unset = || UNSET_FIELD.to_string();
        Self {
            application_name: unset(),
            application_version: unset(),
            application_timestamp: unset(),
            error_module_name: unset(),
            error_module_version: unset(),
            error_module_timestamp: unset(),
            exception_code: unset(),
            exception_offset: unset(),
            exception_data: unset(),
            hang_signature: unset(),
            hang_type: unset(),
            package_full_name: unset(),
            client_app_id: unset(),
            h_result: unset(),
            os_version: unset(),
            os_revision: unset(),
            device_class: unset(),
            product_hash: unset(),
        }
    }
}

impl WerSignature {
    /// Store `value` in the slot identified by `field`.
    pub fn set_field(&mut self, field: SignatureField, value: String) {
        match field {
            SignatureField::ApplicationName => self.application_name = value,
            SignatureField::ApplicationVersion => self.application_version = value,
            SignatureField::ApplicationTimestamp => self.application_timestamp = value,
            SignatureField::ErrorModuleName => self.error_module_name = value,
            SignatureField::ErrorModuleVersion => self.error_module_version = value,
            SignatureField::ErrorModuleTimestamp => self.error_module_timestamp = value,
            SignatureField::ExceptionCode => self.exception_code = value,
            SignatureField::ExceptionOffset => self.exception_offset = value,
            SignatureField::ExceptionData => self.exception_data = value,
            SignatureField::HangSignature => self.hang_signature = value,
            SignatureField::HangType => self.hang_type = value,
            SignatureField::PackageFullName => self.package_full_name = value,
            SignatureField::ClientAppId => self.client_app_id = value,
            SignatureField::HResult => self.h_result = value,
            SignatureField::OsVersion => self.os_version = value,
            SignatureField::OsRevision => self.os_revision = value,
            SignatureField::DeviceClass => self.device_class = value,
            SignatureField::ProductHash => self.product_hash = value,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// One normalized WER report, produced from exactly one `.wer` file.
///
/// Immutable once constructed. Raw timestamp fields carry the source tick
/// strings; the `_readable` companions are rendered in the host-local zone.
/// `raw_fields` retains the original flat plain-line map for traceability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WerReport {
    // --- file identity ---
    /// Report file name (e.g. `Report.wer`).
    pub file_name: String,
    /// Name of the containing report directory.
    pub file_dir: String,
    /// Event tag parsed from the directory name (e.g. `APPCRASH`).
    pub dir_event: String,
    /// Program name parsed from the directory name.
    pub program_name: String,
    /// First hash component of the directory name.
    pub first_hash: String,
    /// Second hash component of the directory name.
    pub second_hash: String,
    /// Report id component of the directory name.
    pub report_id: String,

    // --- report metadata ---
    pub version: String,
    pub event_type: String,
    pub event_time: String,
    pub event_time_readable: String,
    pub report_type: String,
    pub report_type_description: String,
    pub consent: String,
    pub consent_description: String,
    pub upload_time: String,
    pub upload_time_readable: String,
    pub report_flags: String,
    pub report_status: String,
    pub report_identifier: String,
    pub integrator_report_identifier: String,
    pub wow64_host: String,
    pub app_session_guid: String,
    pub boot_id: String,
    pub heap_dump_attached: String,
    pub target_as_id: String,
    pub target_app_id: String,
    pub target_app_ver: String,
    pub user_impact_vector: String,
    pub is_fatal: String,
    pub friendly_event_name: String,
    pub consent_key: String,
    pub app_name: String,
    pub ns_partner: String,
    pub ns_group: String,
    pub application_identity: String,
    pub metadata_hash: String,
    pub original_file_name: String,

    // --- sub-entities ---
    pub response: WerResponse,
    pub signature: WerSignature,
    pub dynamic_signature: Vec<NameValue>,
    pub ui: Vec<String>,
    pub loaded_modules: Vec<String>,
    pub state: Vec<KeyValue>,
    pub os_info: Vec<KeyValue>,

    // --- traceability ---
    /// The original flat `Key=Value` map, verbatim.
    pub raw_fields: HashMap<String, String>,
}

// =============================================================================
// Tests
// =============================================================================
