//! Imported media files and the catalog that owns them.
//! Clips refer to assets by path; the catalog de-duplicates on that path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::time::Millis;
use crate::media::MediaMetadata;

/// Unique identifier for an asset
pub type AssetId = Uuid;

/// A probed media file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub path: PathBuf,
    pub name: String,
    pub duration_ms: Millis,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<PathBuf>,
}

impl Asset {
    /// Build an asset from probe results. The display name is the file name.
    pub fn from_metadata(path: PathBuf, metadata: &MediaMetadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            id: Uuid::new_v4(),
            path,
            name,
            duration_ms: metadata.duration_ms,
            width: metadata.width,
            height: metadata.height,
            fps: metadata.fps,
            size_bytes: metadata.size_bytes,
            thumbnail: None,
        }
    }

    /// Same asset with a thumbnail attached
    pub fn with_thumbnail(mut self, thumbnail: PathBuf) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }
}

/// The media library. Keyed by absolute path, insertion ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probed file. If the path is already known the existing
    /// asset is returned and `metadata` is ignored.
    pub fn import(&mut self, path: PathBuf, metadata: &MediaMetadata) -> &Asset {
        if let Some(index) = self.position(&path) {
            return &self.assets[index];
        }
        self.assets.push(Asset::from_metadata(path, metadata));
        &self.assets[self.assets.len() - 1]
    }

    /// Insert a fully built asset unless its path is already present.
    /// Returns false on a duplicate path.
    pub fn insert(&mut self, asset: Asset) -> bool {
        if self.contains(&asset.path) {
            return false;
        }
        self.assets.push(asset);
        true
    }

    pub fn get(&self, path: &Path) -> Option<&Asset> {
        self.assets.iter().find(|a| a.path == path)
    }

    pub fn get_by_id(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    /// Attach a thumbnail to an existing asset. Returns false for unknown paths.
    pub fn set_thumbnail(&mut self, path: &Path, thumbnail: PathBuf) -> bool {
        match self.position(path) {
            Some(index) => {
                let asset = self.assets[index].clone();
                self.assets[index] = asset.with_thumbnail(thumbnail);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.assets.iter().position(|a| a.path == path)
    }
}

impl FromIterator<Asset> for AssetCatalog {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut catalog = AssetCatalog::new();
        for asset in iter {
            catalog.insert(asset);
        }
        catalog
    }
}
