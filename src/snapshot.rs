use std::path::Path;

use anyhow::Context;

use crate::models::AppState;

/// Loads a state snapshot materialized by the fetch layer.
pub fn load_state(path: &Path) -> anyhow::Result<AppState> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let state = parse_state(&contents)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        results = state.grades.results.len(),
        has_bulk_management = state.grades.bulk_management.is_some(),
        "loaded snapshot"
    );
    Ok(state)
}

pub fn parse_state(contents: &str) -> anyhow::Result<AppState> {
    let state = serde_json::from_str(contents)?;
    Ok(state)
}
