//! Export planning: turn a timeline into the request the toolchain renders.
//!
//! Clips are cut in track order and joined end to end. Gaps between clips
//! are not rendered.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ExportSettings;
use crate::core::clip::Clip;
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;
use crate::core::validate::validate;
use crate::export::exporter::ExportError;

/// One source range to cut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportClip {
    pub asset_path: PathBuf,
    pub in_ms: Millis,
    pub out_ms: Millis,
}

impl ExportClip {
    pub fn duration(&self) -> Millis {
        self.out_ms - self.in_ms
    }
}

impl From<&Clip> for ExportClip {
    fn from(clip: &Clip) -> Self {
        Self {
            asset_path: clip.asset_path.clone(),
            in_ms: clip.in_ms,
            out_ms: clip.out_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub clips: Vec<ExportClip>,
    pub output_path: PathBuf,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_dir: Option<PathBuf>,
}

impl ExportRequest {
    /// Plan an export of `state`. Empty timelines and timelines that fail
    /// validation are refused.
    pub fn from_timeline(
        state: &TimelineState,
        output_path: impl Into<PathBuf>,
        settings: &ExportSettings,
    ) -> Result<Self, ExportError> {
        if state.track.is_empty() {
            return Err(ExportError::EmptyTimeline);
        }
        let violations = validate(state);
        if !violations.is_empty() {
            return Err(ExportError::InvalidTimeline(violations));
        }

        Ok(Self {
            clips: state.track.iter().map(ExportClip::from).collect(),
            output_path: output_path.into(),
            width: settings.width,
            height: settings.height,
            segment_dir: settings.segment_dir.clone(),
        })
    }

    /// Length of the rendered output
    pub fn total_duration_ms(&self) -> Millis {
        self.clips.iter().map(ExportClip::duration).sum()
    }

    /// Target frame size, only when both dimensions are given
    pub fn scale(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Name of the intermediate file for clip `index`
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{:04}.mp4", index)
}

/// What `export_prepare` produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPrepareResult {
    pub segment_paths: Vec<PathBuf>,
    pub list_file: PathBuf,
    pub total_duration_ms: Millis,
}

impl ExportPrepareResult {
    /// Contents of the concat list file, one `file '<path>'` line per segment
    pub fn concat_list(&self) -> String {
        concat_list(&self.segment_paths)
    }
}

pub fn concat_list<P: AsRef<Path>>(segments: &[P]) -> String {
    segments
        .iter()
        .map(|p| format!("file '{}'\n", p.as_ref().display()))
        .collect()
}

/// Progress event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProgress {
    pub stage: String,
    /// 0.0 to 1.0
    pub progress: f32,
    pub current_ms: Millis,
    pub total_ms: Millis,
    pub message: String,
}

impl ExportProgress {
    pub const PREPARE: &'static str = "prepare";
    pub const CONCAT: &'static str = "concat";
    pub const COMPLETE: &'static str = "complete";

    pub fn prepare(total_ms: Millis, clips: usize) -> Self {
        Self {
            stage: Self::PREPARE.to_string(),
            progress: 0.0,
            current_ms: 0,
            total_ms,
            message: format!("Preparing {} segment(s)...", clips),
        }
    }

    pub fn concat(current_ms: Millis, total_ms: Millis) -> Self {
        let progress = if total_ms > 0 {
            (current_ms as f32 / total_ms as f32).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            stage: Self::CONCAT.to_string(),
            progress,
            current_ms,
            total_ms,
            message: format!("Exporting... {:.0}%", progress * 100.0),
        }
    }

    pub fn complete(total_ms: Millis) -> Self {
        Self {
            stage: Self::COMPLETE.to_string(),
            progress: 1.0,
            current_ms: total_ms,
            total_ms,
            message: "Export complete!".to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Self::COMPLETE
    }
}
