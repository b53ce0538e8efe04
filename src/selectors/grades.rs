use crate::models::{AppState, ExportFilterParams, ReportRow, ResultsEntry};
use crate::selectors::filters::{self, ALL_ASSIGNMENT_TYPES};

pub const USERNAME_HEADING: &str = "Username";
pub const EMAIL_HEADING: &str = "Email";
pub const TOTAL_COURSE_GRADE_HEADING: &str = "Total Grade (%)";

type GradeFormatter = for<'a> fn(&'a str, Option<&str>) -> Option<&'a str>;

/// Lowest grade a bound can take; a bound at this value is "no restriction".
pub const MIN_GRADE: &str = "0";
/// Highest grade a bound can take; a bound at this value is "no restriction".
pub const MAX_GRADE: &str = "100";

pub fn all_grades(state: &AppState) -> &[ResultsEntry] {
    &state.grades.results
}

pub fn course_id(state: &AppState) -> Option<&str> {
    state.grades.course_id.as_deref()
}

pub fn filtered_users_count(state: &AppState) -> u64 {
    state.grades.filtered_users_count.unwrap_or(0)
}

pub fn total_users_count(state: &AppState) -> u64 {
    state.grades.total_users_count.unwrap_or(0)
}

pub fn grade_format(state: &AppState) -> Option<&str> {
    state.grades.grade_format.as_deref()
}

pub fn show_spinner(state: &AppState) -> bool {
    state.grades.show_spinner.unwrap_or(false)
}

pub fn show_success(state: &AppState) -> bool {
    state.grades.show_success.unwrap_or(false)
}

pub fn grade_overrides(state: &AppState) -> &[serde_json::Value] {
    state
        .grades
        .grade_override_history_results
        .as_deref()
        .unwrap_or(&[])
}

pub fn grade_override_history_error(state: &AppState) -> &str {
    state
        .grades
        .grade_override_history_error
        .as_deref()
        .unwrap_or("")
}

pub fn grade_override_current_earned_graded_override(state: &AppState) -> Option<f64> {
    state.grades.grade_override_current_earned_graded_override
}

pub fn grade_original_earned_graded(state: &AppState) -> Option<f64> {
    state.grades.grade_original_earned_graded
}

pub fn grade_original_possible_graded(state: &AppState) -> Option<f64> {
    state.grades.grade_original_possible_graded
}

pub fn get_example_section_breakdown(state: &AppState) -> &[ReportRow] {
    filters::get_assignments_from_results_substate(&state.grades.results)
}

/// Builds the export header mapper for a type filter and an optional label
/// filter.
///
/// The returned function yields `[Username, Email, <labels>, Total Grade (%)]`
/// with labels in backend row order, or an empty row when no rows are given.
/// This column order is what spreadsheet consumers of the export expect.
pub fn heading_mapper(
    assignment_type: &str,
    assignment_label: Option<&str>,
) -> impl Fn(Option<&[ReportRow]>) -> Vec<String> {
    let assignment_type = assignment_type.to_string();
    let assignment_label = assignment_label.map(str::to_string);

    move |rows: Option<&[ReportRow]>| {
        let Some(rows) = rows else {
            return Vec::new();
        };

        let labels = rows
            .iter()
            .filter(|row| !row.label.is_empty())
            .filter(|row| {
                assignment_type == ALL_ASSIGNMENT_TYPES || row.assignment_type == assignment_type
            })
            .filter(|row| {
                assignment_label
                    .as_deref()
                    .map_or(true, |label| row.label == label)
            })
            .map(|row| row.label.clone());

        let mut headings = Vec::with_capacity(rows.len() + 3);
        headings.push(USERNAME_HEADING.to_string());
        headings.push(EMAIL_HEADING.to_string());
        headings.extend(labels);
        headings.push(TOTAL_COURSE_GRADE_HEADING.to_string());
        headings
    }
}

/// Export headings for the snapshot's own filters.
pub fn headings(state: &AppState) -> Vec<String> {
    let assignment_type = filters::assignment_type(state)
        .filter(|value| !value.is_empty())
        .unwrap_or(ALL_ASSIGNMENT_TYPES);
    let rows = state
        .grades
        .results
        .first()
        .and_then(|entry| entry.section_breakdown.as_deref());
    heading_mapper(assignment_type, filters::selected_assignment_label(state))(rows)
}

fn is_boundary(grade: &str, boundary: &str) -> bool {
    let grade = grade.trim();
    if grade == boundary {
        return true;
    }
    match (grade.parse::<f64>(), boundary.parse::<f64>()) {
        (Ok(value), Ok(limit)) => value == limit,
        _ => false,
    }
}

fn has_selection(selected_assignment_id: Option<&str>) -> bool {
    selected_assignment_id.is_some_and(|id| !id.is_empty())
}

pub fn format_min_assignment_grade<'a>(
    grade: &'a str,
    selected_assignment_id: Option<&str>,
) -> Option<&'a str> {
    if !has_selection(selected_assignment_id) || is_boundary(grade, MIN_GRADE) {
        return None;
    }
    Some(grade)
}

pub fn format_max_assignment_grade<'a>(
    grade: &'a str,
    selected_assignment_id: Option<&str>,
) -> Option<&'a str> {
    if !has_selection(selected_assignment_id) || is_boundary(grade, MAX_GRADE) {
        return None;
    }
    Some(grade)
}

/// Course bounds do not depend on the selected assignment; the argument is
/// accepted so all four formatters share one shape.
pub fn format_min_course_grade<'a>(
    grade: &'a str,
    _selected_assignment_id: Option<&str>,
) -> Option<&'a str> {
    (!is_boundary(grade, MIN_GRADE)).then_some(grade)
}

pub fn format_max_course_grade<'a>(
    grade: &'a str,
    _selected_assignment_id: Option<&str>,
) -> Option<&'a str> {
    (!is_boundary(grade, MAX_GRADE)).then_some(grade)
}

/// Filter values to persist alongside an export, with boundary and
/// meaningless bounds cleared.
pub fn export_filter_params(state: &AppState) -> ExportFilterParams {
    let selected = filters::selected_assignment_id(state);
    let bound = |value: Option<&str>, format: GradeFormatter| {
        value
            .and_then(|grade| format(grade, selected))
            .map(str::to_string)
    };

    ExportFilterParams {
        assignment: selected.map(str::to_string),
        assignment_type: filters::active_type_filter(filters::assignment_type(state))
            .map(str::to_string),
        assignment_grade_min: bound(
            filters::assignment_grade_min(state),
            format_min_assignment_grade,
        ),
        assignment_grade_max: bound(
            filters::assignment_grade_max(state),
            format_max_assignment_grade,
        ),
        course_grade_min: bound(filters::course_grade_min(state), format_min_course_grade),
        course_grade_max: bound(filters::course_grade_max(state), format_max_course_grade),
        track: filters::track(state).map(str::to_string),
        cohort: filters::cohort(state).map(str::to_string),
        include_course_role_members: filters::include_course_role_members(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentFilter, FilterState};
    use crate::selectors::test_fixtures::{generic_rows, state_with_rows};

    const SELECTED: Option<&str> = Some("block-v1:edX+type@sequential+block@abcde");

    fn expected_headers(labels: &[&str]) -> Vec<String> {
        let mut headers = vec![USERNAME_HEADING.to_string(), EMAIL_HEADING.to_string()];
        headers.extend(labels.iter().map(|label| label.to_string()));
        headers.push(TOTAL_COURSE_GRADE_HEADING.to_string());
        headers
    }

    #[test]
    fn headers_cover_all_assignments_without_filtering() {
        let rows = generic_rows();
        assert_eq!(
            heading_mapper("All", None)(Some(rows.as_slice())),
            expected_headers(&["HW 01", "HW 02", "Lab 01"])
        );
    }

    #[test]
    fn headers_follow_type_filter() {
        let rows = generic_rows();
        assert_eq!(
            heading_mapper("Homework", None)(Some(rows.as_slice())),
            expected_headers(&["HW 01", "HW 02"])
        );
    }

    #[test]
    fn label_filter_narrows_type_filter() {
        let rows = generic_rows();
        assert_eq!(
            heading_mapper("Homework", Some("HW 02"))(Some(rows.as_slice())),
            expected_headers(&["HW 02"])
        );
        assert_eq!(
            heading_mapper("Lab", Some("HW 02"))(Some(rows.as_slice())),
            expected_headers(&[])
        );
    }

    #[test]
    fn headers_are_empty_without_rows() {
        assert!(heading_mapper("all", None)(None).is_empty());
        assert!(heading_mapper("All", Some("HW 01"))(None).is_empty());
    }

    #[test]
    fn headers_skip_unlabelled_rows() {
        let mut rows = generic_rows();
        rows[1].label.clear();
        assert_eq!(
            heading_mapper("All", None)(Some(rows.as_slice())),
            expected_headers(&["HW 01", "Lab 01"])
        );
    }

    #[test]
    fn state_headings_use_selected_label() {
        let mut state = state_with_rows(generic_rows());
        state.filters = Some(FilterState {
            assignment_type: Some("Homework".to_string()),
            assignment: Some(AssignmentFilter {
                id: Some("block-v1:edX+Term+type@sequential+block@1".to_string()),
                label: Some("HW 01".to_string()),
                assignment_type: Some("Homework".to_string()),
            }),
            ..FilterState::default()
        });
        assert_eq!(headings(&state), expected_headers(&["HW 01"]));
        assert!(headings(&AppState::default()).is_empty());
    }

    #[test]
    fn min_assignment_grade_clears_boundary_and_missing_selection() {
        assert_eq!(format_min_assignment_grade("1", SELECTED), Some("1"));
        assert_eq!(format_min_assignment_grade(MIN_GRADE, SELECTED), None);
        assert_eq!(format_min_assignment_grade("1", None), None);
        assert_eq!(format_min_assignment_grade("1", Some("")), None);
    }

    #[test]
    fn max_assignment_grade_clears_boundary_and_missing_selection() {
        assert_eq!(format_max_assignment_grade("99", SELECTED), Some("99"));
        assert_eq!(format_max_assignment_grade(MAX_GRADE, SELECTED), None);
        assert_eq!(format_max_assignment_grade("99", None), None);
    }

    #[test]
    fn course_grades_ignore_selection() {
        assert_eq!(format_min_course_grade("37", SELECTED), Some("37"));
        assert_eq!(format_min_course_grade("37", None), Some("37"));
        assert_eq!(format_min_course_grade(MIN_GRADE, SELECTED), None);
        assert_eq!(format_max_course_grade("42", None), Some("42"));
        assert_eq!(format_max_course_grade(MAX_GRADE, SELECTED), None);
        assert_eq!(format_max_course_grade("100.0", None), None);
    }

    #[test]
    fn export_params_drop_unrestricted_values() {
        let mut state = state_with_rows(generic_rows());
        state.filters = Some(FilterState {
            assignment_type: Some("All".to_string()),
            assignment_grade_min: Some("10".to_string()),
            assignment_grade_max: Some("100".to_string()),
            course_grade_min: Some("0".to_string()),
            course_grade_max: Some("80".to_string()),
            cohort: Some("Fall".to_string()),
            include_course_role_members: Some(true),
            ..FilterState::default()
        });
        let params = export_filter_params(&state);
        assert_eq!(params.assignment, None);
        assert_eq!(params.assignment_type, None);
        assert_eq!(params.assignment_grade_min, None);
        assert_eq!(params.assignment_grade_max, None);
        assert_eq!(params.course_grade_min, None);
        assert_eq!(params.course_grade_max.as_deref(), Some("80"));
        assert_eq!(params.cohort.as_deref(), Some("Fall"));
        assert!(params.include_course_role_members);
    }

    #[test]
    fn simple_accessors_default_when_absent() {
        let state = AppState::default();
        assert!(all_grades(&state).is_empty());
        assert_eq!(course_id(&state), None);
        assert_eq!(filtered_users_count(&state), 0);
        assert_eq!(total_users_count(&state), 0);
        assert_eq!(grade_format(&state), None);
        assert!(!show_spinner(&state));
        assert!(!show_success(&state));
        assert!(get_example_section_breakdown(&state).is_empty());
        assert!(grade_overrides(&state).is_empty());
        assert_eq!(grade_override_history_error(&state), "");
        assert_eq!(grade_override_current_earned_graded_override(&state), None);
        assert_eq!(grade_original_earned_graded(&state), None);
        assert_eq!(grade_original_possible_graded(&state), None);
    }

    #[test]
    fn grade_override_accessors_read_grades_substate() {
        let mut state = AppState::default();
        state.grades.grade_override_history_results =
            Some(vec![serde_json::json!({ "adjusted_grade": 8.0, "reason": "regrade" })]);
        state.grades.grade_override_history_error = Some("Unable to load history".to_string());
        state.grades.grade_override_current_earned_graded_override = Some(8.0);
        state.grades.grade_original_earned_graded = Some(6.0);
        state.grades.grade_original_possible_graded = Some(10.0);

        assert_eq!(grade_overrides(&state).len(), 1);
        assert_eq!(grade_overrides(&state)[0]["reason"], "regrade");
        assert_eq!(grade_override_history_error(&state), "Unable to load history");
        assert_eq!(grade_override_current_earned_graded_override(&state), Some(8.0));
        assert_eq!(grade_original_earned_graded(&state), Some(6.0));
        assert_eq!(grade_original_possible_graded(&state), Some(10.0));
    }
}
