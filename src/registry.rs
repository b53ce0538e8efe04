//! Closed registry of the derivations exposed to presentation code.
//!
//! In Rust the selector modules are already a closed, statically checked
//! namespace. This registry only exists for the string boundary (the `get`
//! command and other dynamic callers): names resolve to an enumerated
//! [`SelectorKey`] and dispatch through an exhaustive match, so an unknown
//! name is an explicit [`GuardError`] instead of a silent default.
//!
//! Only selectors of the whole snapshot are registered. Derivations that take
//! other arguments (`heading_mapper`, the grade formatters,
//! `choose_relevant_assignment_data`, `relevant_assignment_data_from_results`,
//! `transform_history_entry`...) are called directly by name in Rust.

use std::backtrace::Backtrace;
use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

use crate::models::AppState;
use crate::selectors::{bulk_management, filters, grades, tracks};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("invalid selector \"{name}\"")]
    UnknownSelector { name: String },
    #[error("unknown guard policy \"{0}\" (expected strict or lenient)")]
    UnknownPolicy(String),
}

/// What happens when an undeclared selector name is requested. Both
/// policies log the diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Return [`GuardError::UnknownSelector`].
    #[default]
    Strict,
    /// Resolve to `None` and keep going.
    Lenient,
}

impl FromStr for GuardPolicy {
    type Err = GuardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(GuardPolicy::Strict),
            "lenient" => Ok(GuardPolicy::Lenient),
            _ => Err(GuardError::UnknownPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKey {
    AllFilters,
    Assignment,
    AssignmentType,
    AssignmentGradeMin,
    AssignmentGradeMax,
    CourseGradeMin,
    CourseGradeMax,
    Track,
    Cohort,
    IncludeCourseRoleMembers,
    SelectedAssignmentId,
    SelectedAssignmentLabel,
    SelectedAssignment,
    SelectableAssignments,
    SelectableAssignmentLabels,
    AllGrades,
    CourseId,
    FilteredUsersCount,
    TotalUsersCount,
    GradeFormat,
    ShowSpinner,
    ShowSuccess,
    GradeOverrides,
    GradeOverrideHistoryError,
    GradeOverrideCurrentEarnedGradedOverride,
    GradeOriginalEarnedGraded,
    GradeOriginalPossibleGraded,
    ExampleSectionBreakdown,
    Headings,
    ExportFilterParams,
    UploadSuccess,
    BulkImportError,
    BulkManagementHistory,
    BulkManagementHistoryEntries,
    BulkOperationStatus,
    BulkControls,
    AllTracks,
    StateHasMastersTrack,
}

impl SelectorKey {
    pub const ALL: [SelectorKey; 38] = [
        SelectorKey::AllFilters,
        SelectorKey::Assignment,
        SelectorKey::AssignmentType,
        SelectorKey::AssignmentGradeMin,
        SelectorKey::AssignmentGradeMax,
        SelectorKey::CourseGradeMin,
        SelectorKey::CourseGradeMax,
        SelectorKey::Track,
        SelectorKey::Cohort,
        SelectorKey::IncludeCourseRoleMembers,
        SelectorKey::SelectedAssignmentId,
        SelectorKey::SelectedAssignmentLabel,
        SelectorKey::SelectedAssignment,
        SelectorKey::SelectableAssignments,
        SelectorKey::SelectableAssignmentLabels,
        SelectorKey::AllGrades,
        SelectorKey::CourseId,
        SelectorKey::FilteredUsersCount,
        SelectorKey::TotalUsersCount,
        SelectorKey::GradeFormat,
        SelectorKey::ShowSpinner,
        SelectorKey::ShowSuccess,
        SelectorKey::GradeOverrides,
        SelectorKey::GradeOverrideHistoryError,
        SelectorKey::GradeOverrideCurrentEarnedGradedOverride,
        SelectorKey::GradeOriginalEarnedGraded,
        SelectorKey::GradeOriginalPossibleGraded,
        SelectorKey::ExampleSectionBreakdown,
        SelectorKey::Headings,
        SelectorKey::ExportFilterParams,
        SelectorKey::UploadSuccess,
        SelectorKey::BulkImportError,
        SelectorKey::BulkManagementHistory,
        SelectorKey::BulkManagementHistoryEntries,
        SelectorKey::BulkOperationStatus,
        SelectorKey::BulkControls,
        SelectorKey::AllTracks,
        SelectorKey::StateHasMastersTrack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKey::AllFilters => "allFilters",
            SelectorKey::Assignment => "assignment",
            SelectorKey::AssignmentType => "assignmentType",
            SelectorKey::AssignmentGradeMin => "assignmentGradeMin",
            SelectorKey::AssignmentGradeMax => "assignmentGradeMax",
            SelectorKey::CourseGradeMin => "courseGradeMin",
            SelectorKey::CourseGradeMax => "courseGradeMax",
            SelectorKey::Track => "track",
            SelectorKey::Cohort => "cohort",
            SelectorKey::IncludeCourseRoleMembers => "includeCourseRoleMembers",
            SelectorKey::SelectedAssignmentId => "selectedAssignmentId",
            SelectorKey::SelectedAssignmentLabel => "selectedAssignmentLabel",
            SelectorKey::SelectedAssignment => "selectedAssignment",
            SelectorKey::SelectableAssignments => "selectableAssignments",
            SelectorKey::SelectableAssignmentLabels => "selectableAssignmentLabels",
            SelectorKey::AllGrades => "allGrades",
            SelectorKey::CourseId => "courseId",
            SelectorKey::FilteredUsersCount => "filteredUsersCount",
            SelectorKey::TotalUsersCount => "totalUsersCount",
            SelectorKey::GradeFormat => "gradeFormat",
            SelectorKey::ShowSpinner => "showSpinner",
            SelectorKey::ShowSuccess => "showSuccess",
            SelectorKey::GradeOverrides => "gradeOverrides",
            SelectorKey::GradeOverrideHistoryError => "gradeOverrideHistoryError",
            SelectorKey::GradeOverrideCurrentEarnedGradedOverride => {
                "gradeOverrideCurrentEarnedGradedOverride"
            }
            SelectorKey::GradeOriginalEarnedGraded => "gradeOriginalEarnedGraded",
            SelectorKey::GradeOriginalPossibleGraded => "gradeOriginalPossibleGraded",
            SelectorKey::ExampleSectionBreakdown => "getExampleSectionBreakdown",
            SelectorKey::Headings => "headings",
            SelectorKey::ExportFilterParams => "exportFilterParams",
            SelectorKey::UploadSuccess => "uploadSuccess",
            SelectorKey::BulkImportError => "bulkImportError",
            SelectorKey::BulkManagementHistory => "bulkManagementHistory",
            SelectorKey::BulkManagementHistoryEntries => "bulkManagementHistoryEntries",
            SelectorKey::BulkOperationStatus => "bulkOperationStatus",
            SelectorKey::BulkControls => "bulkControls",
            SelectorKey::AllTracks => "allTracks",
            SelectorKey::StateHasMastersTrack => "stateHasMastersTrack",
        }
    }

    /// Evaluates the selector against a snapshot as JSON.
    pub fn derive(self, state: &AppState) -> Value {
        match self {
            SelectorKey::AllFilters => json!(filters::all_filters(state)),
            SelectorKey::Assignment => json!(filters::assignment(state)),
            SelectorKey::AssignmentType => json!(filters::assignment_type(state)),
            SelectorKey::AssignmentGradeMin => json!(filters::assignment_grade_min(state)),
            SelectorKey::AssignmentGradeMax => json!(filters::assignment_grade_max(state)),
            SelectorKey::CourseGradeMin => json!(filters::course_grade_min(state)),
            SelectorKey::CourseGradeMax => json!(filters::course_grade_max(state)),
            SelectorKey::Track => json!(filters::track(state)),
            SelectorKey::Cohort => json!(filters::cohort(state)),
            SelectorKey::IncludeCourseRoleMembers => {
                json!(filters::include_course_role_members(state))
            }
            SelectorKey::SelectedAssignmentId => json!(filters::selected_assignment_id(state)),
            SelectorKey::SelectedAssignmentLabel => {
                json!(filters::selected_assignment_label(state))
            }
            SelectorKey::SelectedAssignment => json!(filters::selected_assignment(state)),
            SelectorKey::SelectableAssignments => json!(filters::selectable_assignments(state)),
            SelectorKey::SelectableAssignmentLabels => {
                json!(filters::selectable_assignment_labels(state))
            }
            SelectorKey::AllGrades => json!(grades::all_grades(state)),
            SelectorKey::CourseId => json!(grades::course_id(state)),
            SelectorKey::FilteredUsersCount => json!(grades::filtered_users_count(state)),
            SelectorKey::TotalUsersCount => json!(grades::total_users_count(state)),
            SelectorKey::GradeFormat => json!(grades::grade_format(state)),
            SelectorKey::ShowSpinner => json!(grades::show_spinner(state)),
            SelectorKey::ShowSuccess => json!(grades::show_success(state)),
            SelectorKey::GradeOverrides => json!(grades::grade_overrides(state)),
            SelectorKey::GradeOverrideHistoryError => {
                json!(grades::grade_override_history_error(state))
            }
            SelectorKey::GradeOverrideCurrentEarnedGradedOverride => {
                json!(grades::grade_override_current_earned_graded_override(state))
            }
            SelectorKey::GradeOriginalEarnedGraded => {
                json!(grades::grade_original_earned_graded(state))
            }
            SelectorKey::GradeOriginalPossibleGraded => {
                json!(grades::grade_original_possible_graded(state))
            }
            SelectorKey::ExampleSectionBreakdown => {
                json!(grades::get_example_section_breakdown(state))
            }
            SelectorKey::Headings => json!(grades::headings(state)),
            SelectorKey::ExportFilterParams => json!(grades::export_filter_params(state)),
            SelectorKey::UploadSuccess => json!(bulk_management::upload_success(state)),
            SelectorKey::BulkImportError => json!(bulk_management::bulk_import_error(state)),
            SelectorKey::BulkManagementHistory => {
                json!(bulk_management::bulk_management_history(state))
            }
            SelectorKey::BulkManagementHistoryEntries => {
                json!(bulk_management::bulk_management_history_entries(state))
            }
            SelectorKey::BulkOperationStatus => {
                json!(bulk_management::bulk_operation_status(state))
            }
            SelectorKey::BulkControls => json!(bulk_management::control_states(state)),
            SelectorKey::AllTracks => json!(tracks::all_tracks(state)),
            SelectorKey::StateHasMastersTrack => json!(tracks::state_has_masters_track(state)),
        }
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectorKey {
    type Err = GuardError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SelectorKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| GuardError::UnknownSelector {
                name: name.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorRegistry {
    policy: GuardPolicy,
}

impl SelectorRegistry {
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        SelectorKey::ALL.iter().map(|key| key.as_str())
    }

    pub fn resolve(&self, name: &str) -> Result<Option<SelectorKey>, GuardError> {
        match name.parse::<SelectorKey>() {
            Ok(key) => Ok(Some(key)),
            Err(err) => {
                tracing::error!(
                    selector = name,
                    policy = ?self.policy,
                    backtrace = %Backtrace::force_capture(),
                    "undeclared selector requested"
                );
                match self.policy {
                    GuardPolicy::Strict => Err(err),
                    GuardPolicy::Lenient => Ok(None),
                }
            }
        }
    }

    pub fn derive(&self, name: &str, state: &AppState) -> Result<Option<Value>, GuardError> {
        Ok(self.resolve(name)?.map(|key| key.derive(state)))
    }
}
