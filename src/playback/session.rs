//! Playback session: the controller behind a message queue.
//! Uses crossbeam channels for thread communication; commands and renderer
//! notifications share one channel so their relative order is preserved.
//! Observers follow the playhead through a watch channel.

use crossbeam::channel;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::core::time::Millis;
use crate::core::timeline::TimelineState;
use crate::playback::controller::{PlaybackCommand, PlaybackController};
use crate::playback::renderer::{Renderer, RendererEvent};
use crate::playback::state::PlaybackState;

/// Error type for the session handle
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("playback session has shut down")]
    Disconnected,
}

/// Anything the session consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMessage {
    Command(PlaybackCommand),
    Renderer(RendererEvent),
}

impl From<PlaybackCommand> for PlaybackMessage {
    fn from(command: PlaybackCommand) -> Self {
        PlaybackMessage::Command(command)
    }
}

impl From<RendererEvent> for PlaybackMessage {
    fn from(event: RendererEvent) -> Self {
        PlaybackMessage::Renderer(event)
    }
}

/// What observers see after every processed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub playhead_ms: Millis,
    pub state: PlaybackState,
}

pub struct PlaybackSession<R: Renderer> {
    controller: PlaybackController<R>,
    inbox: channel::Receiver<PlaybackMessage>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
}

/// Cloneable handle for UI code and the renderer
#[derive(Clone)]
pub struct SessionHandle {
    tx: channel::Sender<PlaybackMessage>,
    snapshot_rx: watch::Receiver<PlaybackSnapshot>,
}

impl<R: Renderer> PlaybackSession<R> {
    /// Create a session and the handle used to drive it
    pub fn new(timeline: TimelineState, renderer: R) -> (Self, SessionHandle) {
        let controller = PlaybackController::new(timeline, renderer);
        let (tx, inbox) = channel::unbounded();
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&controller));

        let session = Self { controller, inbox, snapshot_tx };
        (session, SessionHandle { tx, snapshot_rx })
    }

    pub fn controller(&self) -> &PlaybackController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<R> {
        &mut self.controller
    }

    /// Process every queued message without blocking. Returns how many were
    /// handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.dispatch(message);
            handled += 1;
        }
        handled
    }

    /// Block and process messages until every handle is dropped, then hand
    /// the renderer back.
    pub fn run(mut self) -> R {
        while let Ok(message) = self.inbox.recv() {
            self.dispatch(message);
        }
        debug!("playback session inbox closed");
        self.controller.into_renderer()
    }

    fn dispatch(&mut self, message: PlaybackMessage) {
        match message {
            PlaybackMessage::Command(command) => {
                self.controller.handle(command);
            }
            PlaybackMessage::Renderer(event) => self.controller.on_renderer_event(event),
        }
        self.publish();
    }

    fn publish(&self) {
        let snapshot = snapshot_of(&self.controller);
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

fn snapshot_of<R: Renderer>(controller: &PlaybackController<R>) -> PlaybackSnapshot {
    PlaybackSnapshot { playhead_ms: controller.playhead_ms(), state: *controller.state() }
}

impl SessionHandle {
    pub fn send(&self, message: impl Into<PlaybackMessage>) -> Result<(), SessionError> {
        self.tx.send(message.into()).map_err(|_| SessionError::Disconnected)
    }

    pub fn play(&self) -> Result<(), SessionError> {
        self.send(PlaybackCommand::Play)
    }

    pub fn pause(&self) -> Result<(), SessionError> {
        self.send(PlaybackCommand::Pause)
    }

    pub fn seek(&self, position_ms: Millis) -> Result<(), SessionError> {
        self.send(PlaybackCommand::Seek(position_ms))
    }

    pub fn update_timeline(&self, timeline: TimelineState) -> Result<(), SessionError> {
        self.send(PlaybackCommand::UpdateTimeline(timeline))
    }

    /// Renderer callback: source time advanced
    pub fn source_time_advanced(&self, source_ms: Millis) -> Result<(), SessionError> {
        self.send(RendererEvent::SourceTimeAdvanced(source_ms))
    }

    /// Renderer callback: source ended
    pub fn source_ended(&self) -> Result<(), SessionError> {
        self.send(RendererEvent::SourceEnded)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// A fresh receiver for observers that want change notifications
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_rx.clone()
    }
}
