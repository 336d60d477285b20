//! Clip data structure representing a trimmed range of an asset placed on the track.
//! Timeline time and source time are independent: `in_ms`/`out_ms` index the asset,
//! `start_ms` positions the clip on the timeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::asset::Asset;
use crate::core::time::Millis;

/// Unique identifier for a clip
pub type ClipId = Uuid;

/// A clip covers source range `[in_ms, out_ms)` and timeline range
/// `[start_ms, start_ms + duration)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    pub asset_path: PathBuf,
    pub in_ms: Millis,             // first included source instant
    pub out_ms: Millis,            // first excluded source instant
    pub start_ms: Millis,          // timeline position of in_ms
    pub source_duration_ms: Millis, // owning asset's total duration, copied at placement
}

impl Clip {
    /// Create a clip spanning the whole asset at `start_ms`.
    pub fn from_asset(asset: &Asset, start_ms: Millis) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_path: asset.path.clone(),
            in_ms: 0,
            out_ms: asset.duration_ms,
            start_ms,
            source_duration_ms: asset.duration_ms,
        }
    }

    /// Get the duration of the clip. Same in source and timeline space.
    pub fn duration(&self) -> Millis {
        self.out_ms - self.in_ms
    }

    /// First timeline instant after the clip. Saturates at `Millis::MAX`.
    pub fn end_ms(&self) -> Millis {
        self.start_ms.saturating_add(self.duration())
    }

    /// Half-open containment on the timeline
    pub fn contains(&self, timeline_ms: Millis) -> bool {
        timeline_ms >= self.start_ms && timeline_ms < self.end_ms()
    }

    /// Convert a timeline position to the corresponding source position.
    /// Returns `None` outside the clip.
    pub fn timeline_to_source(&self, timeline_ms: Millis) -> Option<Millis> {
        if !self.contains(timeline_ms) {
            return None;
        }
        Some(self.in_ms + (timeline_ms - self.start_ms))
    }

    /// Convert a source position to the timeline. Unlike `timeline_to_source`
    /// this does not range-check; playback feeds it renderer times that may
    /// sit slightly outside `[in_ms, out_ms)`.
    pub fn source_to_timeline(&self, source_ms: Millis) -> Millis {
        self.start_ms.saturating_add(source_ms - self.in_ms)
    }

    /// Check if this clip overlaps with another clip on the timeline.
    /// Touching clips do not overlap.
    pub fn overlaps_with(&self, other: &Clip) -> bool {
        self.overlaps_range(other.start_ms, other.end_ms())
    }

    /// Check overlap against an arbitrary timeline range `[start, end)`
    pub fn overlaps_range(&self, start: Millis, end: Millis) -> bool {
        !(self.end_ms() <= start || end <= self.start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_clip_duration() {
        let clip = clip(1_000, 3_000, 0);
        assert_eq!(clip.duration(), 2_000);
        assert_eq!(clip.end_ms(), 2_000);
    }

    #[test]
    fn test_clip_contains_is_half_open() {
        let clip = clip(0, 2_000, 0);
        assert!(clip.contains(0));
        assert!(clip.contains(1_999));
        assert!(!clip.contains(2_000));
        assert!(!clip.contains(-1));
    }

    #[test]
    fn test_timeline_to_source() {
        // Source [5s, 10s) placed at 0
        let clip = clip(5_000, 10_000, 0);
        assert_eq!(clip.timeline_to_source(2_000), Some(7_000));
        assert_eq!(clip.timeline_to_source(5_000), None);
    }

    #[test]
    fn test_source_to_timeline() {
        let clip = clip(5_000, 10_000, 2_000);
        assert_eq!(clip.source_to_timeline(7_000), 4_000);
        assert_eq!(clip.source_to_timeline(10_000), clip.end_ms());
    }

    #[test]
    fn test_end_saturates() {
        let clip = clip(0, 5_000, Millis::MAX - 10);
        assert_eq!(clip.end_ms(), Millis::MAX);
        assert!(clip.contains(Millis::MAX - 1));
    }

    #[test]
    fn test_overlaps_with() {
        let a = clip(0, 10_000, 0);
        let b = clip(0, 10_000, 5_000);
        let c = clip(0, 10_000, 10_000);

        assert!(a.overlaps_with(&b));
        assert!(b.overlaps_with(&a));
        // Adjacent clips touch but do not overlap
        assert!(!a.overlaps_with(&c));
        assert!(!c.overlaps_with(&a));
    }
}
