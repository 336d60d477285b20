//! Position resolution: which clip is visible at a timeline instant, and
//! which source instant of it.

use crate::core::clip::Clip;
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;

/// A clip under a timeline position, with the matching source instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub clip: &'a Clip,
    pub local_ms: Millis,
}

/// Resolve `timeline_ms` against the track.
///
/// Returns `None` in a gap, before the first clip, at or after the end of
/// the last clip, and for negative positions.
pub fn clip_at(state: &TimelineState, timeline_ms: Millis) -> Option<Resolved<'_>> {
    let clip = state.track.clip_at(timeline_ms)?;
    Some(Resolved {
        clip,
        local_ms: clip.in_ms + (timeline_ms - clip.start_ms),
    })
}

/// Resolve the current playhead
pub fn clip_at_playhead(state: &TimelineState) -> Option<Resolved<'_>> {
    clip_at(state, state.playhead_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::Track;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn clip(in_ms: Millis, out_ms: Millis, start_ms: Millis) -> Clip {
        Clip {
            id: Uuid::new_v4(),
            asset_path: PathBuf::from("test.mp4"),
            in_ms,
            out_ms,
            start_ms,
            source_duration_ms: 10_000,
        }
    }

    fn state(clips: Vec<Clip>) -> TimelineState {
        TimelineState::from_track(Track::from_clips(clips))
    }

    #[test]
    fn test_local_time_offsets_by_in_point() {
        let trimmed = clip(1_500, 4_000, 3_000);
        let state = state(vec![trimmed.clone()]);

        let resolved = clip_at(&state, 3_500).unwrap();
        assert_eq!(resolved.clip.id, trimmed.id);
        assert_eq!(resolved.local_ms, 2_000);
    }

    #[test]
    fn test_exclusive_end_returns_none() {
        let state = state(vec![clip(0, 5_000, 0)]);
        assert!(clip_at(&state, 4_999).is_some());
        assert!(clip_at(&state, 5_000).is_none());
    }

    #[test]
    fn test_gaps_resolve_to_none() {
        let state = state(vec![clip(0, 1_000, 1_000), clip(0, 1_000, 3_000)]);
        assert!(clip_at(&state, 500).is_none());
        assert!(clip_at(&state, 2_500).is_none());
        assert!(clip_at(&state, 4_000).is_none());
        assert_eq!(clip_at(&state, 3_000).map(|r| r.local_ms), Some(0));
    }

    #[test]
    fn test_clip_at_playhead() {
        let mut state = state(vec![clip(200, 1_200, 0)]);
        state.set_playhead(100);
        assert_eq!(clip_at_playhead(&state).map(|r| r.local_ms), Some(300));
    }
}
