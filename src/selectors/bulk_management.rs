//! Bulk grade operations: import errors, upload history and the
//! pending/success/error classification that gates the export controls.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::models::{
    AppState, BulkManagementState, HistoryData, HistoryRecord, HistorySummary, RowsProcessed,
};
use crate::selectors::grades;

pub const IMPORT_ERROR_PREFIX: &str = "Errors while processing: ";
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y at %-I:%M %p UTC";

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%b %d %Y"];

/// `None` means no bulk management run has produced a snapshot yet, which
/// is distinct from a run with an empty history.
pub fn bulk_management(state: &AppState) -> Option<&BulkManagementState> {
    state.grades.bulk_management.as_ref()
}

pub fn upload_success(state: &AppState) -> bool {
    bulk_management(state)
        .and_then(|bulk| bulk.upload_success)
        .unwrap_or(false)
}

pub fn error_messages(state: &AppState) -> &[String] {
    bulk_management(state)
        .and_then(|bulk| bulk.error_messages.as_deref())
        .unwrap_or(&[])
}

pub fn bulk_import_error(state: &AppState) -> String {
    let messages = error_messages(state);
    if messages.is_empty() {
        return String::new();
    }
    format!("{IMPORT_ERROR_PREFIX}{}", messages.join(", "))
}

/// Upload history as stored upstream, most recent first.
pub fn bulk_management_history(state: &AppState) -> &[HistoryRecord] {
    bulk_management(state)
        .and_then(|bulk| bulk.history.as_deref())
        .unwrap_or(&[])
}

/// Counts are not validated; inconsistent upstream data yields negative or
/// clamped values rather than a panic.
pub fn get_rows_processed(data: &HistoryData) -> RowsProcessed {
    RowsProcessed {
        total: data.total_rows,
        successfully_processed: data.saved_rows,
        failed: data.processed_rows.saturating_sub(data.saved_rows),
        skipped: data.total_rows.saturating_sub(data.processed_rows),
    }
}

fn parse_modified(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).naive_utc());
    }
    if let Some(parsed) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(parsed);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Renders a history timestamp for display, e.g.
/// `January 10, 2021 at 3:04 PM UTC`. Unparseable input is returned as-is.
pub fn format_date_for_display(raw: &str) -> String {
    match parse_modified(raw) {
        Some(parsed) => parsed.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

pub fn transform_history_entry(record: &HistoryRecord) -> HistorySummary {
    transform_history_entry_with(record, format_date_for_display, get_rows_processed)
}

pub fn transform_history_entry_with<D, R>(
    record: &HistoryRecord,
    format_date: D,
    rows_processed: R,
) -> HistorySummary
where
    D: Fn(&str) -> String,
    R: Fn(&HistoryData) -> RowsProcessed,
{
    HistorySummary {
        time_uploaded: format_date(&record.modified),
        original_filename: record.original_filename.clone(),
        summary_of_rows_processed: rows_processed(&record.data),
    }
}

pub fn bulk_management_history_entries(state: &AppState) -> Vec<HistorySummary> {
    bulk_management_history_entries_with(state, bulk_management_history, transform_history_entry)
}

/// Maps every history record through `transform`, keeping upstream order.
pub fn bulk_management_history_entries_with<'s, H, T, O>(
    state: &'s AppState,
    history: H,
    transform: T,
) -> Vec<O>
where
    H: Fn(&'s AppState) -> &'s [HistoryRecord],
    T: Fn(&HistoryRecord) -> O,
{
    history(state).iter().map(transform).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

impl BulkOperationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkOperationStatus::Idle => "idle",
            BulkOperationStatus::Pending => "pending",
            BulkOperationStatus::Success => "success",
            BulkOperationStatus::Error => "error",
        }
    }
}

impl fmt::Display for BulkOperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the snapshot across every export/import operation.
/// An in-flight operation wins over any recorded outcome.
pub fn bulk_operation_status(state: &AppState) -> BulkOperationStatus {
    if grades::show_spinner(state) {
        BulkOperationStatus::Pending
    } else if !error_messages(state).is_empty() {
        BulkOperationStatus::Error
    } else if upload_success(state) {
        BulkOperationStatus::Success
    } else {
        BulkOperationStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperationKind {
    GradeExport,
    InterventionExport,
}

impl BulkOperationKind {
    pub const ALL: [BulkOperationKind; 2] = [
        BulkOperationKind::GradeExport,
        BulkOperationKind::InterventionExport,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BulkOperationKind::GradeExport => "Bulk Management",
            BulkOperationKind::InterventionExport => "Interventions*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub kind: BulkOperationKind,
    pub label: &'static str,
    pub pending: bool,
    pub disabled: bool,
}

/// A control keeps its label while pending and cannot be re-triggered.
pub fn control_state(kind: BulkOperationKind, show_spinner: bool) -> ControlState {
    ControlState {
        kind,
        label: kind.label(),
        pending: show_spinner,
        disabled: show_spinner,
    }
}

pub fn control_states(state: &AppState) -> Vec<ControlState> {
    let pending = grades::show_spinner(state);
    BulkOperationKind::ALL
        .iter()
        .map(|kind| control_state(*kind, pending))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_bulk(bulk: Option<BulkManagementState>) -> AppState {
        let mut state = AppState::default();
        state.grades.bulk_management = bulk;
        state
    }

    fn record(filename: &str) -> HistoryRecord {
        HistoryRecord {
            modified: "2021-01-10T15:04:05Z".to_string(),
            original_filename: filename.to_string(),
            data: HistoryData {
                total_rows: 50,
                saved_rows: 10,
                processed_rows: 20,
            },
        }
    }

    #[test]
    fn rows_processed_derive_failed_and_skipped() {
        let data = HistoryData {
            total_rows: 50,
            saved_rows: 10,
            processed_rows: 20,
        };
        assert_eq!(
            get_rows_processed(&data),
            RowsProcessed {
                total: 50,
                successfully_processed: 10,
                failed: 10,
                skipped: 30,
            }
        );
    }

    #[test]
    fn rows_processed_clamp_inconsistent_counts() {
        let data = HistoryData {
            total_rows: 0,
            saved_rows: i64::MAX,
            processed_rows: -2,
        };
        let rows = get_rows_processed(&data);
        assert_eq!(rows.failed, i64::MIN);
        assert_eq!(rows.skipped, 2);

        let data = HistoryData {
            total_rows: i64::MIN,
            saved_rows: 0,
            processed_rows: i64::MAX,
        };
        assert_eq!(get_rows_processed(&data).skipped, i64::MIN);

        let data = HistoryData {
            total_rows: 10,
            saved_rows: 8,
            processed_rows: 5,
        };
        assert_eq!(get_rows_processed(&data).failed, -3);
    }

    #[test]
    fn import_error_is_empty_without_errors() {
        assert_eq!(bulk_import_error(&state_with_bulk(None)), "");
        let success = BulkManagementState {
            upload_success: Some(true),
            ..BulkManagementState::default()
        };
        assert_eq!(bulk_import_error(&state_with_bulk(Some(success))), "");
        let empty = BulkManagementState {
            error_messages: Some(Vec::new()),
            ..BulkManagementState::default()
        };
        assert_eq!(bulk_import_error(&state_with_bulk(Some(empty))), "");
    }

    #[test]
    fn import_error_joins_messages() {
        let bulk = BulkManagementState {
            error_messages: Some(vec!["error1".to_string(), "also error2".to_string()]),
            ..BulkManagementState::default()
        };
        assert_eq!(
            bulk_import_error(&state_with_bulk(Some(bulk))),
            "Errors while processing: error1, also error2"
        );
    }

    #[test]
    fn upload_success_defaults_to_false() {
        assert!(!upload_success(&AppState::default()));
        let bulk = BulkManagementState {
            upload_success: Some(true),
            ..BulkManagementState::default()
        };
        assert!(upload_success(&state_with_bulk(Some(bulk))));
    }

    #[test]
    fn history_defaults_to_empty_and_keeps_order() {
        let empty = BulkManagementState::default();
        assert!(bulk_management_history(&state_with_bulk(Some(empty))).is_empty());

        let bulk = BulkManagementState {
            history: Some(vec![record("newest.csv"), record("older.csv")]),
            ..BulkManagementState::default()
        };
        let state = state_with_bulk(Some(bulk));
        let names: Vec<&str> = bulk_management_history(&state)
            .iter()
            .map(|entry| entry.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["newest.csv", "older.csv"]);
    }

    #[test]
    fn transform_uses_injected_collaborators() {
        let entry = record("fileName");
        let summary = transform_history_entry_with(
            &entry,
            |raw| format!("formatted {raw}"),
            |_| RowsProcessed {
                total: 1,
                successfully_processed: 1,
                failed: 0,
                skipped: 0,
            },
        );
        assert_eq!(summary.time_uploaded, "formatted 2021-01-10T15:04:05Z");
        assert_eq!(summary.original_filename, "fileName");
        assert_eq!(summary.summary_of_rows_processed.total, 1);
    }

    #[test]
    fn transform_formats_date_and_summarizes_rows() {
        let summary = transform_history_entry(&record("grades.csv"));
        assert_eq!(summary.time_uploaded, "January 10, 2021 at 3:04 PM UTC");
        assert_eq!(summary.original_filename, "grades.csv");
        assert_eq!(summary.summary_of_rows_processed, get_rows_processed(&record("grades.csv").data));
    }

    #[test]
    fn dates_accept_several_shapes() {
        assert_eq!(format_date_for_display("Jan 10 2021"), "January 10, 2021 at 12:00 AM UTC");
        assert_eq!(
            format_date_for_display("2021-03-04 09:30:00.123"),
            "March 4, 2021 at 9:30 AM UTC"
        );
        assert_eq!(format_date_for_display("not a date"), "not a date");
    }

    #[test]
    fn history_entries_map_with_injected_collaborators() {
        let state = AppState::default();
        let records = vec![record("some"), record("entries"), record("for"), record("testing")];
        let entries = bulk_management_history_entries_with(
            &state,
            |_| records.as_slice(),
            |entry| vec![entry.original_filename.clone()],
        );
        assert_eq!(
            entries,
            vec![
                vec!["some".to_string()],
                vec!["entries".to_string()],
                vec!["for".to_string()],
                vec!["testing".to_string()],
            ]
        );
    }

    #[test]
    fn history_entries_default_pipeline() {
        let bulk = BulkManagementState {
            history: Some(vec![record("a.csv")]),
            ..BulkManagementState::default()
        };
        let entries = bulk_management_history_entries(&state_with_bulk(Some(bulk)));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summary_of_rows_processed.skipped, 30);
    }

    #[test]
    fn status_precedence() {
        assert_eq!(bulk_operation_status(&AppState::default()), BulkOperationStatus::Idle);

        let success = BulkManagementState {
            upload_success: Some(true),
            ..BulkManagementState::default()
        };
        assert_eq!(
            bulk_operation_status(&state_with_bulk(Some(success))),
            BulkOperationStatus::Success
        );

        let failed = BulkManagementState {
            upload_success: Some(true),
            error_messages: Some(vec!["bad row".to_string()]),
            history: None,
        };
        let mut state = state_with_bulk(Some(failed));
        assert_eq!(bulk_operation_status(&state), BulkOperationStatus::Error);

        state.grades.show_spinner = Some(true);
        assert_eq!(bulk_operation_status(&state), BulkOperationStatus::Pending);
    }

    #[test]
    fn controls_disable_while_pending() {
        let pending = control_state(BulkOperationKind::InterventionExport, true);
        assert_eq!(pending.label, "Interventions*");
        assert!(pending.pending && pending.disabled);

        let idle = control_states(&AppState::default());
        assert_eq!(idle.len(), 2);
        assert!(idle.iter().all(|control| !control.disabled));
        assert_eq!(idle[0].label, "Bulk Management");
    }
}
