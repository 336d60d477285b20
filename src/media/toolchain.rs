//! Contract for the external media toolchain.
//!
//! Probing, thumbnails and export encoding are delegated to an outside
//! program. The editor only depends on this trait; implementations live with
//! the host application.

use std::path::{Path, PathBuf};

use crate::core::time::Millis;
use crate::export::plan::{ExportPrepareResult, ExportProgress, ExportRequest};
use crate::media::error::ErrorEnvelope;
use crate::media::metadata::MediaMetadata;

pub trait MediaToolchain {
    /// Read duration, resolution and rate from a media file
    fn probe_media(&self, path: &Path) -> Result<MediaMetadata, ErrorEnvelope>;

    /// Extract one frame at `at_ms` and return where the image was written
    fn make_thumbnail(&self, path: &Path, at_ms: Millis) -> Result<PathBuf, ErrorEnvelope>;

    /// Cut one segment per requested clip and write the concat list
    fn export_prepare(&self, request: &ExportRequest) -> Result<ExportPrepareResult, ErrorEnvelope>;

    /// Join prepared segments into `output`, reporting progress as it goes
    fn export_concat(
        &self,
        prepared: &ExportPrepareResult,
        output: &Path,
        progress: &mut dyn FnMut(ExportProgress),
    ) -> Result<(), ErrorEnvelope>;
}

impl<T: MediaToolchain + ?Sized> MediaToolchain for &T {
    fn probe_media(&self, path: &Path) -> Result<MediaMetadata, ErrorEnvelope> {
        (**self).probe_media(path)
    }

    fn make_thumbnail(&self, path: &Path, at_ms: Millis) -> Result<PathBuf, ErrorEnvelope> {
        (**self).make_thumbnail(path, at_ms)
    }

    fn export_prepare(&self, request: &ExportRequest) -> Result<ExportPrepareResult, ErrorEnvelope> {
        (**self).export_prepare(request)
    }

    fn export_concat(
        &self,
        prepared: &ExportPrepareResult,
        output: &Path,
        progress: &mut dyn FnMut(ExportProgress),
    ) -> Result<(), ErrorEnvelope> {
        (**self).export_concat(prepared, output, progress)
    }
}
