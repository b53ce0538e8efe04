use crate::models::{AppState, Track};

/// Slug of the enrollment track that unlocks masters-only features.
pub const MASTERS_KEY: &str = "masters";

pub fn all_tracks(state: &AppState) -> &[Track] {
    state
        .tracks
        .as_ref()
        .and_then(|tracks| tracks.results.as_deref())
        .unwrap_or(&[])
}

pub fn has_masters_track(tracks: &[Track]) -> bool {
    tracks.iter().any(|track| track.slug == MASTERS_KEY)
}

pub fn state_has_masters_track(state: &AppState) -> bool {
    state_has_masters_track_with(state, all_tracks, has_masters_track)
}

pub fn state_has_masters_track_with<'s, A, H, O>(state: &'s AppState, tracks: A, predicate: H) -> O
where
    A: Fn(&'s AppState) -> &'s [Track],
    H: Fn(&'s [Track]) -> O,
{
    predicate(tracks(state))
}
