//! Playback state machine states.

use serde::Serialize;

use crate::core::clip::ClipId;
use crate::core::time::Millis;

/// Playback state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PlaybackState {
    /// No clip under the playhead, nothing renders
    #[default]
    Idle,
    /// A clip is resolved at the playhead but not advancing
    #[serde(rename_all = "camelCase")]
    Paused {
        clip_id: ClipId,
        local_ms: Millis, // source time shown by the renderer
    },
    /// Advancing, driven by renderer time notifications
    #[serde(rename_all = "camelCase")]
    Playing {
        clip_id: ClipId,
        local_ms: Millis, // last source time accepted from the renderer
    },
}

impl PlaybackState {
    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    /// Check if paused on a clip
    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused { .. })
    }

    /// Check if idle
    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    /// The clip currently resolved under the playhead
    pub fn clip_id(&self) -> Option<ClipId> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Paused { clip_id, .. } | PlaybackState::Playing { clip_id, .. } => {
                Some(*clip_id)
            }
        }
    }

    /// Source time of the resolved clip
    pub fn local_ms(&self) -> Option<Millis> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Paused { local_ms, .. } | PlaybackState::Playing { local_ms, .. } => {
                Some(*local_ms)
            }
        }
    }
}
