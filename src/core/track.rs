//! The single track holding placed clips.

use serde::{Deserialize, Serialize};

use crate::core::clip::{Clip, ClipId};
use crate::core::time::Millis;

/// A track contains clips arranged on the timeline.
///
/// Clips are stored sorted by `start_ms` and never overlap. The fields are
/// public so callers can build arbitrary tracks for validation; the edit
/// operations only ever produce sorted, overlap-free tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub clips: Vec<Clip>, // Sorted by start_ms
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap clips as-is, without sorting or checking.
    pub fn from_clips(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Insert keeping `start_ms` order. Equal starts keep insertion order.
    pub fn insert_sorted(&mut self, clip: Clip) {
        let index = self.clips.partition_point(|c| c.start_ms <= clip.start_ms);
        self.clips.insert(index, clip);
    }

    /// Remove a clip by ID.
    ///
    /// Returns the removed clip if found, `None` otherwise.
    pub fn remove(&mut self, clip_id: ClipId) -> Option<Clip> {
        self.index_of(clip_id).map(|pos| self.clips.remove(pos))
    }

    pub fn get(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn index_of(&self, clip_id: ClipId) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    /// Find the clip whose half-open interval contains `timeline_ms`.
    ///
    /// Binary search on `start_ms`: the only candidate is the last clip
    /// starting at or before the position.
    pub fn clip_at(&self, timeline_ms: Millis) -> Option<&Clip> {
        let after = self.clips.partition_point(|c| c.start_ms <= timeline_ms);
        if after == 0 {
            return None;
        }
        let candidate = &self.clips[after - 1];
        candidate.contains(timeline_ms).then_some(candidate)
    }

    /// Clips overlapping `[start, end)`
    pub fn clips_in_range(&self, start: Millis, end: Millis) -> Vec<&Clip> {
        self.clips.iter().filter(|c| c.overlaps_range(start, end)).collect()
    }

    /// End of the last clip, or 0 if the track is empty.
    pub fn end_ms(&self) -> Millis {
        self.clips.iter().map(Clip::end_ms).max().unwrap_or(0)
    }

    /// Clip before `index` in start order
    pub fn previous(&self, index: usize) -> Option<&Clip> {
        index.checked_sub(1).and_then(|i| self.clips.get(i))
    }

    /// Clip after `index` in start order
    pub fn next(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
