use serde::{Deserialize, Serialize};

use crate::core::time::Millis;

/// Probe result for one media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub duration_ms: Millis,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl MediaMetadata {
    pub fn new(duration_ms: Millis, width: u32, height: u32) -> Self {
        Self { duration_ms, width, height, fps: None, size_bytes: None }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }
}
