//! Two-phase export driver.
//!
//! Export is delegated to the media toolchain:
//! 1. `export_prepare` cuts one segment per clip and writes a concat list
//! 2. `export_concat` joins the segments into the output file
//!
//! Progress from both phases is forwarded on a channel so a UI thread can
//! follow along. A `complete` event is sent last, only on success.
//! Toolchain errors abort the export and propagate unchanged.

use std::path::Path;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, info};

use crate::config::ExportSettings;
use crate::core::timeline::TimelineState;
use crate::core::validate::Violation;
use crate::export::plan::{ExportPrepareResult, ExportProgress, ExportRequest};
use crate::media::error::ErrorEnvelope;
use crate::media::toolchain::MediaToolchain;

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ErrorEnvelope),
    #[error("Nothing to export: the timeline is empty")]
    EmptyTimeline,
    #[error("Timeline failed validation ({} violation(s))", .0.len())]
    InvalidTimeline(Vec<Violation>),
    #[error("Toolchain prepared {actual} segment(s) for {expected} clip(s)")]
    SegmentMismatch { expected: usize, actual: usize },
}

pub struct Exporter<T: MediaToolchain> {
    toolchain: T,
    settings: ExportSettings,
    progress: Option<Sender<ExportProgress>>,
}

impl<T: MediaToolchain> Exporter<T> {
    pub fn new(toolchain: T, settings: ExportSettings) -> Self {
        Self {
            toolchain,
            settings,
            progress: None,
        }
    }

    /// Attach a fresh progress channel and return its receiving end
    pub fn progress_channel(&mut self) -> Receiver<ExportProgress> {
        let (tx, rx) = channel::unbounded();
        self.progress = Some(tx);
        rx
    }

    /// Send progress to an existing channel
    pub fn with_progress(mut self, tx: Sender<ExportProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Plan and export `state` to `output_path`
    pub fn export(
        &self,
        state: &TimelineState,
        output_path: &Path,
    ) -> Result<ExportPrepareResult, ExportError> {
        let request = ExportRequest::from_timeline(state, output_path, &self.settings)?;
        self.run(&request)
    }

    /// Run both toolchain phases for an already planned request
    pub fn run(&self, request: &ExportRequest) -> Result<ExportPrepareResult, ExportError> {
        let total_ms = request.total_duration_ms();
        info!(
            clips = request.clips.len(),
            total_ms,
            output = %request.output_path.display(),
            "export started"
        );
        self.emit(ExportProgress::prepare(total_ms, request.clips.len()));

        let prepared = self.toolchain.export_prepare(request)?;
        if prepared.segment_paths.len() != request.clips.len() {
            return Err(ExportError::SegmentMismatch {
                expected: request.clips.len(),
                actual: prepared.segment_paths.len(),
            });
        }
        debug!(list_file = %prepared.list_file.display(), "segments prepared");

        self.toolchain
            .export_concat(&prepared, &request.output_path, &mut |progress: ExportProgress| {
                self.emit(progress)
            })?;

        info!(output = %request.output_path.display(), "export complete");
        self.emit(ExportProgress::complete(prepared.total_duration_ms));
        Ok(prepared)
    }

    fn emit(&self, progress: ExportProgress) {
        if let Some(tx) = &self.progress {
            // Nobody listening is fine
            let _ = tx.send(progress);
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }
}
