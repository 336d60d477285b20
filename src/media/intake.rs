//! Media intake: probe a file, register it, attach a thumbnail.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ThumbnailSettings;
use crate::core::asset::{Asset, AssetCatalog};
use crate::media::error::ErrorEnvelope;
use crate::media::parse::thumbnail_time_ms;
use crate::media::toolchain::MediaToolchain;

/// Import `path` into the catalog.
///
/// A path the catalog already knows is returned as is without probing. Probe
/// failures propagate; a failed thumbnail only leaves the asset without one.
pub fn import_media<T: MediaToolchain + ?Sized>(
    toolchain: &T,
    catalog: &mut AssetCatalog,
    path: &Path,
    thumbnails: &ThumbnailSettings,
) -> Result<Asset, ErrorEnvelope> {
    if let Some(existing) = catalog.get(path) {
        debug!(path = %path.display(), "asset already imported");
        return Ok(existing.clone());
    }

    let metadata = toolchain.probe_media(path)?;
    let mut asset = catalog.import(path.to_path_buf(), &metadata).clone();
    info!(
        path = %path.display(),
        duration_ms = asset.duration_ms,
        width = asset.width,
        height = asset.height,
        "imported media"
    );

    let at_ms = thumbnail_time_ms(asset.duration_ms, thumbnails);
    match toolchain.make_thumbnail(path, at_ms) {
        Ok(thumbnail) => {
            catalog.set_thumbnail(path, thumbnail.clone());
            asset = asset.with_thumbnail(thumbnail);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "thumbnail generation failed");
        }
    }

    Ok(asset)
}
