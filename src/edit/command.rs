//! Edit intents expressed as data.
//!
//! UI gestures and scripts produce `EditCommand`s; `apply` maps each one onto
//! the pure operations in `ops`. Clips are always addressed by explicit id.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::asset::AssetCatalog;
use crate::core::clip::ClipId;
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;
use crate::edit::ops;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditCommand {
    /// Place the catalog asset at `asset_path` at the playhead.
    #[serde(rename_all = "camelCase")]
    Place { asset_path: PathBuf },
    #[serde(rename_all = "camelCase")]
    TrimIn { clip: ClipId, in_ms: Millis },
    #[serde(rename_all = "camelCase")]
    TrimOut { clip: ClipId, out_ms: Millis },
    Delete { clip: ClipId },
    #[serde(rename_all = "camelCase")]
    SetPlayhead { position_ms: Millis },
}

impl EditCommand {
    /// Apply to `state`. Unknown asset paths leave the state unchanged, like
    /// any other rejected edit.
    pub fn apply(&self, state: &TimelineState, catalog: &AssetCatalog) -> TimelineState {
        match self {
            EditCommand::Place { asset_path } => match catalog.get(asset_path) {
                Some(asset) => ops::place(state, asset),
                None => {
                    debug!(path = %asset_path.display(), "place ignored: asset not in catalog");
                    state.clone()
                }
            },
            EditCommand::TrimIn { clip, in_ms } => ops::trim_in(state, *clip, *in_ms),
            EditCommand::TrimOut { clip, out_ms } => ops::trim_out(state, *clip, *out_ms),
            EditCommand::Delete { clip } => ops::delete_clip(state, *clip),
            EditCommand::SetPlayhead { position_ms } => state.with_playhead(*position_ms),
        }
    }

    /// The clip this command edits, if any
    pub fn target(&self) -> Option<ClipId> {
        match self {
            EditCommand::TrimIn { clip, .. }
            | EditCommand::TrimOut { clip, .. }
            | EditCommand::Delete { clip } => Some(*clip),
            EditCommand::Place { .. } | EditCommand::SetPlayhead { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaMetadata;

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        catalog.import(
            PathBuf::from("/media/a.mp4"),
            &MediaMetadata { duration_ms: 5_000, width: 640, height: 360, fps: None, size_bytes: None },
        );
        catalog
    }

    #[test]
    fn test_place_by_path() {
        let catalog = catalog();
        let state = EditCommand::Place { asset_path: PathBuf::from("/media/a.mp4") }
            .apply(&TimelineState::new(), &catalog);
        assert_eq!(state.track.len(), 1);
    }

    #[test]
    fn test_place_unknown_asset_is_noop() {
        let base = TimelineState::new();
        let state = EditCommand::Place { asset_path: PathBuf::from("/media/nope.mp4") }
            .apply(&base, &catalog());
        assert_eq!(state, base);
    }

    #[test]
    fn test_command_sequence() {
        let catalog = catalog();
        let state = EditCommand::Place { asset_path: PathBuf::from("/media/a.mp4") }
            .apply(&TimelineState::new(), &catalog);
        let id = state.track.clips[0].id;

        let state = EditCommand::TrimOut { clip: id, out_ms: 3_000 }.apply(&state, &catalog);
        let state = EditCommand::TrimIn { clip: id, in_ms: 1_000 }.apply(&state, &catalog);
        let clip = state.clip(id).unwrap();
        assert_eq!((clip.in_ms, clip.out_ms, clip.start_ms), (1_000, 3_000, 1_000));

        let state = EditCommand::SetPlayhead { position_ms: 4_000 }.apply(&state, &catalog);
        assert_eq!(state.playhead_ms, 4_000);

        let state = EditCommand::Delete { clip: id }.apply(&state, &catalog);
        assert!(state.track.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let id = ClipId::nil();
        let json = serde_json::to_value(EditCommand::TrimIn { clip: id, in_ms: 250 }).unwrap();
        assert_eq!(json["op"], "trimIn");
        assert_eq!(json["inMs"], 250);

        let parsed: EditCommand =
            serde_json::from_str(r#"{"op":"setPlayhead","positionMs":1200}"#).unwrap();
        assert_eq!(parsed, EditCommand::SetPlayhead { position_ms: 1_200 });
        assert_eq!(parsed.target(), None);
    }
}
