//! Aggregate timeline value: one track plus the playhead.

use serde::{Deserialize, Serialize};

use crate::core::clip::{Clip, ClipId};
use crate::core::time::Millis;
use crate::core::track::Track;

/// The editing aggregate root.
///
/// Treated as an immutable value: edit operations take `&TimelineState` and
/// return a new one. Cloning copies every clip, nothing is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub track: Track,
    pub playhead_ms: Millis,
}

impl TimelineState {
    /// Create an empty timeline with the playhead at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_track(track: Track) -> Self {
        Self { track, playhead_ms: 0 }
    }

    /// Same timeline with the playhead moved. Negative positions clamp to zero.
    pub fn with_playhead(&self, position: Millis) -> Self {
        let mut next = self.clone();
        next.set_playhead(position);
        next
    }

    /// Set the playhead position, clamped to `>= 0`.
    ///
    /// There is no upper clamp: placing at a playhead past the end of the
    /// track is legitimate.
    pub fn set_playhead(&mut self, position: Millis) {
        self.playhead_ms = position.max(0);
    }

    /// End of the last clip
    pub fn duration(&self) -> Millis {
        self.track.end_ms()
    }

    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.track.get(clip_id)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.track.clips
    }
}
