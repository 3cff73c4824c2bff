// werview - app/render.rs
//
// Console presentation of a parsed batch: newest events first, one row per
// report.

use crate::core::model::WerReport;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Sort reports by their readable event time, newest first.
///
/// The readable form is `YYYY-MM-DD HH:MM:SS.ffffff <zone>`, so
/// lexicographic order equals chronological order within one host zone.
/// Reports whose event time could not be rendered carry the sentinel and
/// sort to the end.
pub fn sort_by_event_time_desc(reports: &mut [WerReport]) {
    reports.sort_by(|a, b| b.event_time_readable.cmp(&a.event_time_readable));
}

/// Build the batch summary table: event time, program name, event type and
/// the signature's faulting module.
pub fn summary_table(reports: &[WerReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Event Time",
            "Program Name",
            "Event Type",
            "Signature",
        ]);

    for report in reports {
        table.add_row(vec![
            report.event_time_readable.as_str(),
            report.app_name.as_str(),
            report.event_type.as_str(),
            report.signature.error_module_name.as_str(),
        ]);
    }

    table
}

// =============================================================================
// Tests
// =============================================================================
