//! Editor configuration loaded from a JSON file.
//! Every field has a default, so an empty object is a valid config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::time::Millis;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid thumbnail window: min {min_ms}ms is after max {max_ms}ms")]
    ThumbnailWindow { min_ms: Millis, max_ms: Millis },
}

/// Export settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Output width; scaling applies only with `height` also set
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Where the toolchain writes intermediate segments
    pub segment_dir: Option<PathBuf>,
}

impl ExportSettings {
    pub fn scale(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Thumbnail instant policy: `duration / divisor`, clamped to `[min_ms, max_ms]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThumbnailSettings {
    pub min_ms: Millis,
    pub max_ms: Millis,
    pub divisor: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            min_ms: 500,
            max_ms: 5_000,
            divisor: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub export: ExportSettings,
    pub thumbnail: ThumbnailSettings,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            thumbnail: ThumbnailSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(text)?;
        if config.thumbnail.min_ms > config.thumbnail.max_ms {
            return Err(ConfigError::ThumbnailWindow {
                min_ms: config.thumbnail.min_ms,
                max_ms: config.thumbnail.max_ms,
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(
            r#"{"export": {"width": 1280, "height": 720}, "thumbnail": {"maxMs": 3000}, "logFilter": "debug"}"#,
        )
        .unwrap();
        assert_eq!(config.export.scale(), Some((1280, 720)));
        assert_eq!(config.export.segment_dir, None);
        assert_eq!(config.thumbnail.max_ms, 3_000);
        assert_eq!(config.thumbnail.min_ms, 500);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_scale_needs_both_dimensions() {
        let settings = ExportSettings { width: Some(640), ..Default::default() };
        assert_eq!(settings.scale(), None);
    }

    #[test]
    fn test_rejects_inverted_thumbnail_window() {
        let err = EditorConfig::from_json(r#"{"thumbnail": {"minMs": 9000, "maxMs": 100}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ThumbnailWindow { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::load(Path::new("/nonexistent/cutline.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
