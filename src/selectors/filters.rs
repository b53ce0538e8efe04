use crate::models::{AppState, AssignmentData, AssignmentFilter, FilterState, ReportRow, ResultsEntry};

/// Assignment type filter value meaning "no type restriction".
pub const ALL_ASSIGNMENT_TYPES: &str = "All";

static EMPTY_FILTERS: FilterState = FilterState {
    assignment: None,
    assignment_type: None,
    assignment_grade_min: None,
    assignment_grade_max: None,
    course_grade_min: None,
    course_grade_max: None,
    track: None,
    cohort: None,
    include_course_role_members: None,
};

pub fn choose_relevant_assignment_data(row: &ReportRow) -> AssignmentData {
    AssignmentData {
        label: row.label.clone(),
        subsection_label: row.subsection_label.clone(),
        assignment_type: row.assignment_type.clone(),
        id: row.id.clone(),
    }
}

/// Breakdown of the first results entry. Every entry shares the same
/// assignment schema, so the first one stands in for all of them.
pub fn get_assignments_from_results_substate(results: &[ResultsEntry]) -> &[ReportRow] {
    results
        .first()
        .and_then(|entry| entry.section_breakdown.as_deref())
        .unwrap_or(&[])
}

/// Resolves an opaque assignment id against the breakdown. `None` means
/// "no selection".
pub fn relevant_assignment_data_from_results(
    results: &[ResultsEntry],
    id: &str,
) -> Option<AssignmentData> {
    get_assignments_from_results_substate(results)
        .iter()
        .find(|row| row.id == id)
        .map(choose_relevant_assignment_data)
}

pub fn all_filters(state: &AppState) -> &FilterState {
    state.filters.as_ref().unwrap_or(&EMPTY_FILTERS)
}

/// Returns the type to filter by, or `None` when the filter is unset, empty
/// or "All".
pub fn active_type_filter(assignment_type: Option<&str>) -> Option<&str> {
    assignment_type.filter(|value| !value.is_empty() && *value != ALL_ASSIGNMENT_TYPES)
}

pub fn selectable_assignments(state: &AppState) -> Vec<&ReportRow> {
    let rows = get_assignments_from_results_substate(&state.grades.results);
    match active_type_filter(assignment_type(state)) {
        Some(selected) => rows
            .iter()
            .filter(|row| row.assignment_type == selected)
            .collect(),
        None => rows.iter().collect(),
    }
}

pub fn selectable_assignment_labels(state: &AppState) -> Vec<AssignmentData> {
    selectable_assignments(state)
        .into_iter()
        .map(choose_relevant_assignment_data)
        .collect()
}

pub fn assignment(state: &AppState) -> Option<&AssignmentFilter> {
    all_filters(state).assignment.as_ref()
}

pub fn assignment_type(state: &AppState) -> Option<&str> {
    all_filters(state).assignment_type.as_deref()
}

pub fn assignment_grade_min(state: &AppState) -> Option<&str> {
    all_filters(state).assignment_grade_min.as_deref()
}

pub fn assignment_grade_max(state: &AppState) -> Option<&str> {
    all_filters(state).assignment_grade_max.as_deref()
}

pub fn course_grade_min(state: &AppState) -> Option<&str> {
    all_filters(state).course_grade_min.as_deref()
}

pub fn course_grade_max(state: &AppState) -> Option<&str> {
    all_filters(state).course_grade_max.as_deref()
}

pub fn track(state: &AppState) -> Option<&str> {
    all_filters(state).track.as_deref()
}

pub fn cohort(state: &AppState) -> Option<&str> {
    all_filters(state).cohort.as_deref()
}

pub fn include_course_role_members(state: &AppState) -> bool {
    all_filters(state).include_course_role_members.unwrap_or(false)
}

pub fn selected_assignment_id(state: &AppState) -> Option<&str> {
    assignment(state).and_then(|selected| selected.id.as_deref())
}

pub fn selected_assignment_label(state: &AppState) -> Option<&str> {
    assignment(state).and_then(|selected| selected.label.as_deref())
}

/// The selected assignment as it appears in the current results, if any.
pub fn selected_assignment(state: &AppState) -> Option<AssignmentData> {
    let id = selected_assignment_id(state)?;
    relevant_assignment_data_from_results(&state.grades.results, id)
}
