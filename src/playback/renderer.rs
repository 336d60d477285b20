//! Renderer contract.
//!
//! The renderer owns decoding and the media clock. The controller tells it
//! what to show; it reports back through `RendererEvent`s.

use std::path::{Path, PathBuf};

use crate::core::time::Millis;

/// Calls the controller makes on the renderer
pub trait Renderer {
    /// Switch to `path` and show source instant `at_ms`
    fn load_source(&mut self, path: &Path, at_ms: Millis);
    /// Start advancing the current source
    fn play(&mut self);
    /// Stop advancing
    fn pause(&mut self);
    /// Jump within the current source
    fn seek(&mut self, at_ms: Millis);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn load_source(&mut self, path: &Path, at_ms: Millis) {
        (**self).load_source(path, at_ms)
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, at_ms: Millis) {
        (**self).seek(at_ms)
    }
}

/// Notifications from the renderer, delivered to the controller as messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererEvent {
    /// Source time of the loaded media advanced to this instant
    SourceTimeAdvanced(Millis),
    /// The loaded media ran out
    SourceEnded,
}

/// A single recorded renderer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCall {
    LoadSource { path: PathBuf, at_ms: Millis },
    Play,
    Pause,
    Seek { at_ms: Millis },
}

/// Headless renderer that records every call.
///
/// Used by tests and the `simulate` command in place of a real video backend.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    calls: Vec<RendererCall>,
    source: Option<PathBuf>,
    position_ms: Millis,
    playing: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RendererCall] {
        &self.calls
    }

    /// Return and clear the recorded calls
    pub fn take_calls(&mut self) -> Vec<RendererCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn position_ms(&self) -> Millis {
        self.position_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance the fake clock by `delta_ms` while playing and return the
    /// notification a real renderer would emit.
    pub fn tick(&mut self, delta_ms: Millis) -> Option<RendererEvent> {
        if !self.playing || self.source.is_none() {
            return None;
        }
        self.position_ms += delta_ms;
        Some(RendererEvent::SourceTimeAdvanced(self.position_ms))
    }
}

impl Renderer for RecordingRenderer {
    fn load_source(&mut self, path: &Path, at_ms: Millis) {
        self.source = Some(path.to_path_buf());
        self.position_ms = at_ms;
        self.calls.push(RendererCall::LoadSource { path: path.to_path_buf(), at_ms });
    }

    fn play(&mut self) {
        self.playing = true;
        self.calls.push(RendererCall::Play);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.calls.push(RendererCall::Pause);
    }

    fn seek(&mut self, at_ms: Millis) {
        self.position_ms = at_ms;
        self.calls.push(RendererCall::Seek { at_ms });
    }
}
