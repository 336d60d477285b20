//! Pure edit operations over `TimelineState`.
//!
//! Each operation returns a new state, or a clone of the input when the edit
//! is rejected. Rejection is not an error: live drags routinely pass through
//! invalid intermediate values. Compare the result with the input to tell the
//! two apart.

use tracing::{debug, warn};

use crate::core::asset::Asset;
use crate::core::clip::{Clip, ClipId};
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;
use crate::core::validate::validate;

/// Place the whole of `asset` at the playhead.
///
/// If that would overlap an existing clip the new clip is appended at the end
/// of the track instead. Assets without a positive duration cannot form a
/// valid clip and are rejected.
pub fn place(state: &TimelineState, asset: &Asset) -> TimelineState {
    if asset.duration_ms <= 0 {
        debug!(path = %asset.path.display(), duration_ms = asset.duration_ms, "place rejected: empty asset");
        return state.clone();
    }

    let mut clip = Clip::from_asset(asset, state.playhead_ms);
    if state.track.iter().any(|c| c.overlaps_with(&clip)) {
        clip.start_ms = state.track.end_ms();
        debug!(start_ms = clip.start_ms, "placement at playhead overlaps, appending at track end");
    }
    if clip.start_ms.checked_add(clip.duration()).is_none() {
        debug!(start_ms = clip.start_ms, "place rejected: clip would end past the last representable instant");
        return state.clone();
    }

    let mut next = state.clone();
    debug!(clip = %clip.id, start_ms = clip.start_ms, duration_ms = clip.duration(), "placed clip");
    next.track.insert_sorted(clip);
    guarded(state, next)
}

/// Move the clip's in point, keeping its right edge fixed on the timeline.
///
/// `start_ms` shifts by the same amount as `in_ms`. If the new start would
/// cross the previous clip's end (or zero) it is clamped there and `in_ms`
/// recomputed from the clamped start.
pub fn trim_in(state: &TimelineState, clip_id: ClipId, new_in_ms: Millis) -> TimelineState {
    let Some(index) = state.track.index_of(clip_id) else {
        debug!(clip = %clip_id, "trim_in ignored: unknown clip");
        return state.clone();
    };
    let clip = &state.track.clips[index];

    if new_in_ms < 0 || new_in_ms >= clip.out_ms {
        debug!(clip = %clip_id, new_in_ms, out_ms = clip.out_ms, "trim_in rejected: out of range");
        return state.clone();
    }

    let right_edge = clip.end_ms();
    let lower_bound = state.track.previous(index).map_or(0, Clip::end_ms);
    let mut new_start = clip.start_ms + (new_in_ms - clip.in_ms);
    let mut new_in = new_in_ms;

    if new_start < lower_bound {
        new_start = lower_bound;
        new_in = clip.out_ms - (right_edge - new_start);
        debug!(clip = %clip_id, new_start, new_in, "trim_in clamped against neighbour");
    }

    if new_in < 0 || new_in >= clip.out_ms {
        debug!(clip = %clip_id, new_in, "trim_in rejected: clamp leaves no duration");
        return state.clone();
    }

    let mut next = state.clone();
    let trimmed = &mut next.track.clips[index];
    trimmed.in_ms = new_in;
    trimmed.start_ms = new_start;
    guarded(state, next)
}

/// Move the clip's out point, keeping `start_ms` fixed.
///
/// Clamped to the asset duration and to the next clip's start.
pub fn trim_out(state: &TimelineState, clip_id: ClipId, new_out_ms: Millis) -> TimelineState {
    let Some(index) = state.track.index_of(clip_id) else {
        debug!(clip = %clip_id, "trim_out ignored: unknown clip");
        return state.clone();
    };
    let clip = &state.track.clips[index];

    if new_out_ms <= clip.in_ms {
        debug!(clip = %clip_id, new_out_ms, in_ms = clip.in_ms, "trim_out rejected: non-positive duration");
        return state.clone();
    }

    let mut new_out = new_out_ms
        .min(clip.source_duration_ms)
        .min(clip.in_ms.saturating_add(Millis::MAX - clip.start_ms));
    if let Some(next_clip) = state.track.next(index) {
        new_out = new_out.min(clip.in_ms + (next_clip.start_ms - clip.start_ms));
    }

    if new_out <= clip.in_ms {
        debug!(clip = %clip_id, new_out, "trim_out rejected: clamp leaves no duration");
        return state.clone();
    }
    if new_out != new_out_ms {
        debug!(clip = %clip_id, requested = new_out_ms, new_out, "trim_out clamped");
    }

    let mut next = state.clone();
    next.track.clips[index].out_ms = new_out;
    guarded(state, next)
}

/// Remove a clip. Siblings keep their positions. Unknown ids are a no-op.
pub fn delete_clip(state: &TimelineState, clip_id: ClipId) -> TimelineState {
    let mut next = state.clone();
    match next.track.remove(clip_id) {
        Some(removed) => debug!(clip = %removed.id, "deleted clip"),
        None => debug!(clip = %clip_id, "delete ignored: unknown clip"),
    }
    next
}

/// Keep `candidate` only if it passes validation.
fn guarded(original: &TimelineState, candidate: TimelineState) -> TimelineState {
    let violations = validate(&candidate);
    if violations.is_empty() {
        return candidate;
    }
    for violation in &violations {
        warn!(%violation, "edit produced an invalid timeline, discarding");
    }
    original.clone()
}
