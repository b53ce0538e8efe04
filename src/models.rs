use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root snapshot handed to every derivation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    #[serde(deserialize_with = "null_as_default")]
    pub grades: GradesState,
    pub filters: Option<FilterState>,
    pub tracks: Option<TracksState>,
}

/// Report substate: grade results plus the bulk management snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradesState {
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<ResultsEntry>,
    pub bulk_management: Option<BulkManagementState>,
    pub course_id: Option<String>,
    pub filtered_users_count: Option<u64>,
    pub total_users_count: Option<u64>,
    pub grade_format: Option<String>,
    pub show_spinner: Option<bool>,
    pub show_success: Option<bool>,
    /// Override history entries, forwarded as delivered.
    pub grade_override_history_results: Option<Vec<serde_json::Value>>,
    pub grade_override_history_error: Option<String>,
    pub grade_override_current_earned_graded_override: Option<f64>,
    pub grade_original_earned_graded: Option<f64>,
    pub grade_original_possible_graded: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    pub section_breakdown: Option<Vec<ReportRow>>,
}

/// One assignment/subsection result as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRow {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(rename = "subsection_name", deserialize_with = "null_as_default")]
    pub subsection_label: String,
    #[serde(rename = "category", deserialize_with = "null_as_default")]
    pub assignment_type: String,
    #[serde(rename = "module_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attempted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub score_earned: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub score_possible: f64,
}

/// Canonical assignment shape, decoupled from backend field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentData {
    pub label: String,
    pub subsection_label: String,
    #[serde(rename = "type")]
    pub assignment_type: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub assignment: Option<AssignmentFilter>,
    pub assignment_type: Option<String>,
    pub assignment_grade_min: Option<String>,
    pub assignment_grade_max: Option<String>,
    pub course_grade_min: Option<String>,
    pub course_grade_max: Option<String>,
    pub track: Option<String>,
    pub cohort: Option<String>,
    pub include_course_role_members: Option<bool>,
}

/// The assignment currently chosen in the assignment filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentFilter {
    pub id: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub assignment_type: Option<String>,
}

/// Filter values ready to be persisted next to an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilterParams {
    pub assignment: Option<String>,
    pub assignment_type: Option<String>,
    pub assignment_grade_min: Option<String>,
    pub assignment_grade_max: Option<String>,
    pub course_grade_min: Option<String>,
    pub course_grade_max: Option<String>,
    pub track: Option<String>,
    pub cohort: Option<String>,
    pub include_course_role_members: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkManagementState {
    pub upload_success: Option<bool>,
    pub error_messages: Option<Vec<String>>,
    pub history: Option<Vec<HistoryRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub modified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_filename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: HistoryData,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryData {
    #[serde(deserialize_with = "null_as_default")]
    pub total_rows: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub saved_rows: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub processed_rows: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsProcessed {
    pub total: i64,
    pub successfully_processed: i64,
    pub failed: i64,
    pub skipped: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub time_uploaded: String,
    pub original_filename: String,
    pub summary_of_rows_processed: RowsProcessed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TracksState {
    pub results: Option<Vec<Track>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    pub name: Option<String>,
}
