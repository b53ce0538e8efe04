use std::fmt::Write;

use serde::Serialize;

use crate::models::{AppState, HistorySummary};
use crate::selectors::{bulk_management, filters, grades, tracks};

#[derive(Debug, Serialize)]
struct HistoryCsvRow<'a> {
    time_uploaded: &'a str,
    original_filename: &'a str,
    total: i64,
    successfully_processed: i64,
    failed: i64,
    skipped: i64,
}

/// Writes the export header row as a single CSV record. An empty header
/// row (no results yet) writes nothing.
pub fn write_headings_csv<W: std::io::Write>(writer: W, headings: &[String]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if !headings.is_empty() {
        csv_writer.write_record(headings)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_history_csv<W: std::io::Write>(
    writer: W,
    entries: &[HistorySummary],
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        let rows = &entry.summary_of_rows_processed;
        csv_writer.serialize(HistoryCsvRow {
            time_uploaded: &entry.time_uploaded,
            original_filename: &entry.original_filename,
            total: rows.total,
            successfully_processed: rows.successfully_processed,
            failed: rows.failed,
            skipped: rows.skipped,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn build_report(state: &AppState) -> String {
    let mut output = String::new();
    let course_label = grades::course_id(state).unwrap_or("unknown course");

    let _ = writeln!(output, "# Gradebook Report View");
    let _ = writeln!(
        output,
        "Generated for {} ({} of {} learners shown)",
        course_label,
        grades::filtered_users_count(state),
        grades::total_users_count(state)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Export Columns");

    let headings = grades::headings(state);
    if headings.is_empty() {
        let _ = writeln!(output, "No grade results loaded.");
    } else {
        for heading in headings.iter() {
            let _ = writeln!(output, "- {heading}");
        }
    }

    let params = grades::export_filter_params(state);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Active Filters");
    let active: Vec<(&str, &str)> = [
        ("Assignment", params.assignment.as_deref()),
        ("Assignment type", params.assignment_type.as_deref()),
        ("Assignment grade min", params.assignment_grade_min.as_deref()),
        ("Assignment grade max", params.assignment_grade_max.as_deref()),
        ("Course grade min", params.course_grade_min.as_deref()),
        ("Course grade max", params.course_grade_max.as_deref()),
        ("Track", params.track.as_deref()),
        ("Cohort", params.cohort.as_deref()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| (name, value)))
    .collect();

    if active.is_empty() && !params.include_course_role_members {
        let _ = writeln!(output, "No filters applied.");
    } else {
        for (name, value) in active {
            let _ = writeln!(output, "- {name}: {value}");
        }
        if params.include_course_role_members {
            let _ = writeln!(output, "- Course role members included");
        }
    }

    if let Some(selected) = filters::selected_assignment(state) {
        let _ = writeln!(
            output,
            "- Selected assignment: {} ({}, {})",
            selected.label, selected.assignment_type, selected.subsection_label
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Bulk Management");
    let _ = writeln!(
        output,
        "Status: {}",
        bulk_management::bulk_operation_status(state)
    );

    let import_error = bulk_management::bulk_import_error(state);
    if !import_error.is_empty() {
        let _ = writeln!(output, "{import_error}");
    }

    let entries = bulk_management::bulk_management_history_entries(state);
    if entries.is_empty() {
        let _ = writeln!(output, "No uploads recorded.");
    } else {
        for entry in entries.iter().take(5) {
            let rows = &entry.summary_of_rows_processed;
            let _ = writeln!(
                output,
                "- {} uploaded {}: {} rows, {} saved, {} failed, {} skipped",
                entry.original_filename,
                entry.time_uploaded,
                rows.total,
                rows.successfully_processed,
                rows.failed,
                rows.skipped
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tracks");
    let all_tracks = tracks::all_tracks(state);
    if all_tracks.is_empty() {
        let _ = writeln!(output, "No enrollment tracks recorded.");
    } else {
        let slugs: Vec<&str> = all_tracks.iter().map(|track| track.slug.as_str()).collect();
        let _ = writeln!(output, "Tracks: {}", slugs.join(", "));
    }
    let _ = writeln!(
        output,
        "Masters track: {}",
        if tracks::has_masters_track(all_tracks) {
            "yes"
        } else {
            "no"
        }
    );

    output
}
