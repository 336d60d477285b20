//! Invariant checks over a timeline. Read-only.

use thiserror::Error;

use crate::core::clip::ClipId;
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;

/// A broken timeline invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("clip {clip} has negative in point {in_ms}")]
    NegativeIn { clip: ClipId, in_ms: Millis },
    #[error("clip {clip} has non-positive duration (in {in_ms}, out {out_ms})")]
    NonPositiveDuration { clip: ClipId, in_ms: Millis, out_ms: Millis },
    #[error("clip {clip} out point {out_ms} exceeds asset duration {asset_duration_ms}")]
    OutPastAsset { clip: ClipId, out_ms: Millis, asset_duration_ms: Millis },
    #[error("clip {clip} starts at negative timeline position {start_ms}")]
    NegativeStart { clip: ClipId, start_ms: Millis },
    #[error("clip {clip} at index {index} starts before its predecessor")]
    Unsorted { clip: ClipId, index: usize },
    #[error("clips {first} and {second} overlap")]
    Overlap { first: ClipId, second: ClipId },
    #[error("clip id {clip} appears more than once")]
    DuplicateId { clip: ClipId },
    #[error("playhead is negative ({playhead_ms})")]
    NegativePlayhead { playhead_ms: Millis },
}

/// Return every invariant violation in `state`. Empty means valid.
pub fn validate(state: &TimelineState) -> Vec<Violation> {
    let mut violations = Vec::new();
    let clips = state.clips();

    if state.playhead_ms < 0 {
        violations.push(Violation::NegativePlayhead { playhead_ms: state.playhead_ms });
    }

    for (index, clip) in clips.iter().enumerate() {
        if clip.in_ms < 0 {
            violations.push(Violation::NegativeIn { clip: clip.id, in_ms: clip.in_ms });
        }
        if clip.in_ms >= clip.out_ms {
            violations.push(Violation::NonPositiveDuration {
                clip: clip.id,
                in_ms: clip.in_ms,
                out_ms: clip.out_ms,
            });
        }
        if clip.out_ms > clip.source_duration_ms {
            violations.push(Violation::OutPastAsset {
                clip: clip.id,
                out_ms: clip.out_ms,
                asset_duration_ms: clip.source_duration_ms,
            });
        }
        if clip.start_ms < 0 {
            violations.push(Violation::NegativeStart { clip: clip.id, start_ms: clip.start_ms });
        }
        if index > 0 && clips[index - 1].start_ms > clip.start_ms {
            violations.push(Violation::Unsorted { clip: clip.id, index });
        }
        if clips[..index].iter().any(|c| c.id == clip.id) {
            violations.push(Violation::DuplicateId { clip: clip.id });
        }
    }

    // Overlap is checked on start order so an unsorted track still reports
    // each overlapping pair exactly once, earlier start first.
    let mut ordered: Vec<_> = clips.iter().collect();
    ordered.sort_by_key(|c| c.start_ms);
    for (index, first) in ordered.iter().enumerate() {
        let end = first.end_ms();
        for second in ordered[index + 1..].iter().take_while(|c| c.start_ms < end) {
            violations.push(Violation::Overlap { first: first.id, second: second.id });
        }
    }

    violations
}

pub fn is_valid(state: &TimelineState) -> bool {
    validate(state).is_empty()
}
