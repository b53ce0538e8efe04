//! Pure derivations over an [`AppState`](crate::models::AppState) snapshot.
//!
//! Nothing in here performs I/O or keeps state between calls; every function
//! recomputes its result from the snapshot it is handed.

pub mod bulk_management;
pub mod filters;
pub mod grades;
pub mod tracks;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::models::{AppState, ReportRow, ResultsEntry};

    fn row(label: &str, category: &str, block: u8, subsection: &str, attempted: bool) -> ReportRow {
        let earned = if attempted { 1.0 } else { 0.0 };
        ReportRow {
            label: label.to_string(),
            subsection_label: subsection.to_string(),
            assignment_type: category.to_string(),
            id: format!("block-v1:edX+Term+type@sequential+block@{block}"),
            attempted,
            percent: earned,
            score_earned: earned,
            score_possible: earned,
        }
    }

    pub fn generic_rows() -> Vec<ReportRow> {
        vec![
            row("HW 01", "Homework", 1, "Week 1", true),
            row("HW 02", "Homework", 2, "Week 2", true),
            row("Lab 01", "Lab", 3, "Week 3", false),
        ]
    }

    pub fn state_with_rows(rows: Vec<ReportRow>) -> AppState {
        let mut state = AppState::default();
        state.grades.results = vec![ResultsEntry {
            username: "avery".to_string(),
            email: "avery@example.com".to_string(),
            section_breakdown: Some(rows),
        }];
        state
    }
}
