//! Playback controller: turns the playhead into "what should the renderer
//! show" and keeps that mapping right through scrubs, playback and edits.
//!
//! The controller never runs a clock. While playing it follows the source
//! times the renderer reports, converts them back to timeline time, and
//! handles clip boundaries itself instead of waiting for the renderer to run
//! past them.

use std::path::PathBuf;

use tracing::{debug, info, trace};

use crate::core::asset::AssetCatalog;
use crate::core::clip::Clip;
use crate::core::position::clip_at;
use crate::core::time::Millis;
use crate::core::timeline::TimelineState;
use crate::edit::EditCommand;
use crate::playback::renderer::{Renderer, RendererEvent};
use crate::playback::state::PlaybackState;

/// Command sent to the playback controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Seek(Millis),
    UpdateTimeline(TimelineState),
}

pub struct PlaybackController<R: Renderer> {
    timeline: TimelineState,
    state: PlaybackState,
    /// Snapshot of the clip under the playhead, `None` when idle
    active: Option<Clip>,
    /// Source the renderer currently has loaded
    loaded_source: Option<PathBuf>,
    /// Last renderer time accepted, for de-duplicating notifications
    last_source_ms: Option<Millis>,
    renderer: R,
}

impl<R: Renderer> PlaybackController<R> {
    /// Create a controller and resolve the timeline's playhead.
    pub fn new(timeline: TimelineState, renderer: R) -> Self {
        let playhead = timeline.playhead_ms;
        let mut controller = Self {
            timeline,
            state: PlaybackState::Idle,
            active: None,
            loaded_source: None,
            last_source_ms: None,
            renderer,
        };
        controller.seek(playhead);
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playhead_ms(&self) -> Millis {
        self.timeline.playhead_ms
    }

    /// The timeline as the controller sees it, playhead included
    pub fn timeline(&self) -> &TimelineState {
        &self.timeline
    }

    pub fn active_clip(&self) -> Option<&Clip> {
        self.active.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Process a playback command
    pub fn handle(&mut self, command: PlaybackCommand) -> &PlaybackState {
        match command {
            PlaybackCommand::Play => {
                self.play();
            }
            PlaybackCommand::Pause => {
                self.pause();
            }
            PlaybackCommand::Seek(position) => self.seek(position),
            PlaybackCommand::UpdateTimeline(timeline) => self.update_timeline(timeline),
        }
        &self.state
    }

    /// Move the playhead and re-resolve.
    ///
    /// Playing continues if the new position lands on a clip and halts if it
    /// lands in a gap. Otherwise the controller ends up paused on a clip or
    /// idle.
    pub fn seek(&mut self, position: Millis) {
        let was_playing = self.state.is_playing();
        self.timeline.set_playhead(position);
        self.last_source_ms = None;

        let resolved = clip_at(&self.timeline, self.timeline.playhead_ms)
            .map(|r| (r.clip.clone(), r.local_ms));

        match resolved {
            Some((clip, local_ms)) => {
                let reloaded = self.show(&clip, local_ms);
                self.state = if was_playing {
                    if reloaded {
                        self.renderer.play();
                    }
                    PlaybackState::Playing { clip_id: clip.id, local_ms }
                } else {
                    PlaybackState::Paused { clip_id: clip.id, local_ms }
                };
                debug!(clip = %clip.id, playhead_ms = self.timeline.playhead_ms, local_ms, "seek resolved");
                self.active = Some(clip);
            }
            None => {
                if was_playing {
                    self.renderer.pause();
                    info!(playhead_ms = self.timeline.playhead_ms, "seek into gap, playback halted");
                }
                debug!(playhead_ms = self.timeline.playhead_ms, "seek resolved to no clip");
                self.state = PlaybackState::Idle;
                self.active = None;
            }
        }
    }

    /// Start playback. Only meaningful when paused on a clip.
    pub fn play(&mut self) -> bool {
        let PlaybackState::Paused { clip_id, local_ms } = self.state else {
            debug!(state = ?self.state, "play ignored");
            return false;
        };
        let Some(clip) = self.active.clone() else {
            return false;
        };

        self.show(&clip, local_ms);
        self.renderer.play();
        self.last_source_ms = None;
        self.state = PlaybackState::Playing { clip_id, local_ms };
        info!(clip = %clip_id, local_ms, "playback started");
        true
    }

    /// Pause playback at the current playhead. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        let PlaybackState::Playing { clip_id, local_ms } = self.state else {
            debug!(state = ?self.state, "pause ignored");
            return false;
        };

        self.renderer.pause();
        self.state = PlaybackState::Paused { clip_id, local_ms };
        info!(clip = %clip_id, playhead_ms = self.timeline.playhead_ms, "playback paused");
        true
    }

    /// Feed a renderer notification through the state machine.
    pub fn on_renderer_event(&mut self, event: RendererEvent) {
        match event {
            RendererEvent::SourceTimeAdvanced(source_ms) => self.on_source_time(source_ms),
            RendererEvent::SourceEnded => {
                if self.state.is_playing() {
                    self.cross_boundary(None);
                } else {
                    trace!("source ended while not playing");
                }
            }
        }
    }

    /// Replace the timeline after an edit and reload whatever the edit touched.
    ///
    /// The controller keeps its own playhead. If the active clip survived
    /// with new boundaries the renderer is repositioned without leaving the
    /// current state; if it is gone the playhead is re-resolved.
    pub fn update_timeline(&mut self, timeline: TimelineState) {
        let playhead = self.timeline.playhead_ms;
        self.timeline = timeline;
        self.timeline.playhead_ms = playhead;

        let Some(previous) = self.active.clone() else {
            self.seek(playhead);
            return;
        };

        match self.timeline.clip(previous.id).cloned() {
            Some(current) if current == previous => {}
            Some(current) => self.reload_active(current),
            None => {
                debug!(clip = %previous.id, "active clip removed");
                self.seek(playhead);
            }
        }
    }

    /// Apply an edit command to the controller's timeline. Playhead moves go
    /// through `seek`; everything else through `update_timeline`.
    pub fn apply_edit(&mut self, command: &EditCommand, catalog: &AssetCatalog) {
        match command {
            EditCommand::SetPlayhead { position_ms } => self.seek(*position_ms),
            _ => {
                let next = command.apply(&self.timeline, catalog);
                if next != self.timeline {
                    self.update_timeline(next);
                }
            }
        }
    }

    fn on_source_time(&mut self, source_ms: Millis) {
        let PlaybackState::Playing { clip_id, .. } = self.state else {
            trace!(source_ms, "source time ignored while not playing");
            return;
        };
        if self.last_source_ms == Some(source_ms) {
            return;
        }
        self.last_source_ms = Some(source_ms);

        let Some(clip) = self.active.clone() else {
            return;
        };
        if source_ms >= clip.out_ms {
            self.cross_boundary(Some(source_ms));
            return;
        }

        let local_ms = source_ms.max(clip.in_ms);
        let timeline_ms = clip.source_to_timeline(local_ms);
        if timeline_ms < self.timeline.playhead_ms {
            trace!(timeline_ms, playhead_ms = self.timeline.playhead_ms, "stale source time ignored");
            return;
        }

        self.timeline.playhead_ms = timeline_ms;
        self.state = PlaybackState::Playing { clip_id, local_ms };
    }

    /// The active clip's out point was reached: continue into a contiguous
    /// clip or stop at the clip end.
    ///
    /// `trigger` is the renderer time that crossed the boundary. It stays the
    /// last accepted time so a repeat of it is not read as time in the next
    /// clip.
    fn cross_boundary(&mut self, trigger: Option<Millis>) {
        let Some(finished) = self.active.take() else {
            return;
        };
        let clip_end = finished.end_ms();
        self.timeline.playhead_ms = clip_end;
        self.last_source_ms = trigger;

        let next = clip_at(&self.timeline, clip_end).map(|r| r.clip.clone());
        match next {
            Some(next) => {
                self.renderer.load_source(&next.asset_path, next.in_ms);
                self.renderer.play();
                self.loaded_source = Some(next.asset_path.clone());
                self.state = PlaybackState::Playing { clip_id: next.id, local_ms: next.in_ms };
                info!(from = %finished.id, to = %next.id, playhead_ms = clip_end, "advanced to next clip");
                self.active = Some(next);
            }
            None => {
                self.renderer.pause();
                self.state = PlaybackState::Idle;
                info!(clip = %finished.id, playhead_ms = clip_end, "reached end of contiguous clips, playback halted");
            }
        }
    }

    fn reload_active(&mut self, current: Clip) {
        let playhead = self.timeline.playhead_ms.clamp(current.start_ms, current.end_ms() - 1);
        let local_ms = current.in_ms + (playhead - current.start_ms);
        self.timeline.playhead_ms = playhead;
        self.last_source_ms = None;

        self.show(&current, local_ms);
        self.state = match self.state {
            PlaybackState::Playing { .. } => PlaybackState::Playing { clip_id: current.id, local_ms },
            _ => PlaybackState::Paused { clip_id: current.id, local_ms },
        };
        debug!(clip = %current.id, playhead_ms = playhead, local_ms, "active clip reloaded after edit");
        self.active = Some(current);
    }

    /// Point the renderer at `clip` / `local_ms`. Returns true when a new
    /// source had to be loaded.
    fn show(&mut self, clip: &Clip, local_ms: Millis) -> bool {
        if self.loaded_source.as_deref() == Some(clip.asset_path.as_path()) {
            self.renderer.seek(local_ms);
            false
        } else {
            self.renderer.load_source(&clip.asset_path, local_ms);
            self.loaded_source = Some(clip.asset_path.clone());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::Track;
    use crate::edit::ops;
    use crate::playback::renderer::{RecordingRenderer, RendererCall};
    use std::path::Path;
    use uuid::Uuid;

    fn clip(path: &str, in_ms: Millis, out_ms: Millis, start_ms: Millis) -> Clip {
        Clip {
            id: Uuid::new_v4(),
            asset_path: PathBuf::from(path),
            in_ms,
            out_ms,
            start_ms,
            source_duration_ms: 10_000,
        }
    }

    fn controller(clips: Vec<Clip>) -> PlaybackController<RecordingRenderer> {
        let timeline = TimelineState::from_track(Track::from_clips(clips));
        PlaybackController::new(timeline, RecordingRenderer::new())
    }

    #[test]
    fn test_initial_resolution() {
        let a = clip("a.mp4", 500, 2_500, 0);
        let controller = controller(vec![a.clone()]);

        assert_eq!(*controller.state(), PlaybackState::Paused { clip_id: a.id, local_ms: 500 });
        assert_eq!(
            controller.renderer().calls(),
            &[RendererCall::LoadSource { path: PathBuf::from("a.mp4"), at_ms: 500 }]
        );
    }

    #[test]
    fn test_empty_timeline_is_idle() {
        let mut controller = controller(vec![]);
        assert!(controller.state().is_idle());
        assert!(!controller.play());
        assert!(controller.renderer().calls().is_empty());
    }

    #[test]
    fn test_seek_between_states() {
        let a = clip("a.mp4", 0, 1_000, 0);
        let b = clip("b.mp4", 0, 1_000, 3_000);
        let mut controller = controller(vec![a.clone(), b.clone()]);
        controller.renderer_mut().take_calls();

        controller.seek(2_000);
        assert!(controller.state().is_idle());
        assert_eq!(controller.playhead_ms(), 2_000);
        assert!(controller.renderer().calls().is_empty());

        controller.seek(3_250);
        assert_eq!(*controller.state(), PlaybackState::Paused { clip_id: b.id, local_ms: 250 });

        // Same source: seek, no reload
        controller.seek(3_500);
        assert_eq!(
            controller.renderer_mut().take_calls(),
            vec![
                RendererCall::LoadSource { path: PathBuf::from("b.mp4"), at_ms: 250 },
                RendererCall::Seek { at_ms: 500 },
            ]
        );

        controller.seek(-40);
        assert_eq!(controller.playhead_ms(), 0);
        assert_eq!(controller.state().clip_id(), Some(a.id));
    }

    #[test]
    fn test_play_pause() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let mut controller = controller(vec![a.clone()]);

        assert!(!controller.pause());
        assert!(controller.play());
        assert!(controller.state().is_playing());
        assert!(!controller.play());

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(700));
        assert_eq!(controller.playhead_ms(), 700);

        assert!(controller.pause());
        assert_eq!(*controller.state(), PlaybackState::Paused { clip_id: a.id, local_ms: 700 });
        assert_eq!(controller.renderer().calls().last(), Some(&RendererCall::Pause));
    }

    #[test]
    fn test_source_time_maps_to_timeline() {
        let a = clip("a.mp4", 4_000, 6_000, 10_000);
        let mut controller = controller(vec![a]);
        controller.seek(10_000);
        controller.play();

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(4_250));
        assert_eq!(controller.playhead_ms(), 10_250);

        // Duplicate and backwards reports do not move the playhead
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(4_250));
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(4_100));
        assert_eq!(controller.playhead_ms(), 10_250);

        // Coalesced jump
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(5_900));
        assert_eq!(controller.playhead_ms(), 11_900);
    }

    #[test]
    fn test_source_time_ignored_when_paused() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let mut controller = controller(vec![a]);
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(1_000));
        assert_eq!(controller.playhead_ms(), 0);
    }

    #[test]
    fn test_boundary_auto_advance() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let b = clip("b.mp4", 0, 1_000, 2_000);
        let mut controller = controller(vec![a, b.clone()]);
        controller.play();
        controller.renderer_mut().take_calls();

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_000));

        assert_eq!(*controller.state(), PlaybackState::Playing { clip_id: b.id, local_ms: 0 });
        assert_eq!(controller.playhead_ms(), 2_000);
        assert_eq!(controller.active_clip().map(|c| c.id), Some(b.id));
        assert_eq!(
            controller.renderer().calls(),
            &[
                RendererCall::LoadSource { path: PathBuf::from("b.mp4"), at_ms: 0 },
                RendererCall::Play,
            ]
        );
    }

    #[test]
    fn test_repeated_boundary_time_is_ignored() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let b = clip("b.mp4", 0, 3_000, 2_000);
        let mut controller = controller(vec![a, b.clone()]);
        controller.play();

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_000));
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_000));

        assert_eq!(*controller.state(), PlaybackState::Playing { clip_id: b.id, local_ms: 0 });
        assert_eq!(controller.playhead_ms(), 2_000);

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(40));
        assert_eq!(controller.playhead_ms(), 2_040);
    }

    #[test]
    fn test_repeated_boundary_time_does_not_finish_short_clip() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let b = clip("b.mp4", 0, 1_000, 2_000);
        let mut controller = controller(vec![a, b.clone()]);
        controller.play();

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_000));
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_000));

        assert!(controller.state().is_playing());
        assert_eq!(controller.active_clip().map(|c| c.id), Some(b.id));
        assert_eq!(controller.playhead_ms(), 2_000);
    }

    #[test]
    fn test_boundary_without_next_clip_halts() {
        let a = clip("a.mp4", 0, 2_000, 0);
        let later = clip("b.mp4", 0, 1_000, 2_500);
        let mut controller = controller(vec![a, later]);
        controller.play();

        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(2_100));

        assert!(controller.state().is_idle());
        assert_eq!(controller.playhead_ms(), 2_000);
        assert_eq!(controller.renderer().calls().last(), Some(&RendererCall::Pause));
    }

    #[test]
    fn test_source_ended_crosses_boundary() {
        let a = clip("a.mp4", 0, 1_000, 0);
        let b = clip("a.mp4", 3_000, 4_000, 1_000);
        let mut controller = controller(vec![a, b.clone()]);
        controller.play();

        controller.on_renderer_event(RendererEvent::SourceEnded);
        assert_eq!(*controller.state(), PlaybackState::Playing { clip_id: b.id, local_ms: 3_000 });

        controller.on_renderer_event(RendererEvent::SourceEnded);
        assert!(controller.state().is_idle());
        assert_eq!(controller.playhead_ms(), 2_000);
    }

    #[test]
    fn test_seek_while_playing() {
        let a = clip("a.mp4", 0, 1_000, 0);
        let b = clip("b.mp4", 0, 1_000, 2_000);
        let mut controller = controller(vec![a, b.clone()]);
        controller.play();
        controller.renderer_mut().take_calls();

        controller.seek(2_400);
        assert_eq!(*controller.state(), PlaybackState::Playing { clip_id: b.id, local_ms: 400 });
        assert_eq!(
            controller.renderer_mut().take_calls(),
            vec![
                RendererCall::LoadSource { path: PathBuf::from("b.mp4"), at_ms: 400 },
                RendererCall::Play,
            ]
        );

        controller.seek(1_500);
        assert!(controller.state().is_idle());
        assert_eq!(controller.renderer().calls(), &[RendererCall::Pause]);
    }

    #[test]
    fn test_trim_reload_keeps_state() {
        let a = clip("a.mp4", 0, 4_000, 0);
        let mut controller = controller(vec![a.clone()]);
        controller.play();
        controller.on_renderer_event(RendererEvent::SourceTimeAdvanced(3_000));
        controller.renderer_mut().take_calls();

        // Shorten the clip so it ends before the playhead
        let trimmed = ops::trim_out(controller.timeline(), a.id, 2_000);
        controller.update_timeline(trimmed);

        assert_eq!(*controller.state(), PlaybackState::Playing { clip_id: a.id, local_ms: 1_999 });
        assert_eq!(controller.playhead_ms(), 1_999);
        assert_eq!(controller.renderer().calls(), &[RendererCall::Seek { at_ms: 1_999 }]);

        controller.pause();
        let extended = ops::trim_out(controller.timeline(), a.id, 3_000);
        controller.update_timeline(extended);
        assert_eq!(*controller.state(), PlaybackState::Paused { clip_id: a.id, local_ms: 1_999 });
    }

    #[test]
    fn test_trim_in_reload_keeps_source_instant() {
        let a = clip("a.mp4", 0, 4_000, 0);
        let mut controller = controller(vec![a.clone()]);
        controller.seek(3_000);

        let trimmed = ops::trim_in(controller.timeline(), a.id, 1_000);
        controller.update_timeline(trimmed);

        // Right edge anchored: timeline 3000 still shows source 3000
        assert_eq!(*controller.state(), PlaybackState::Paused { clip_id: a.id, local_ms: 3_000 });
        assert_eq!(controller.active_clip().map(|c| c.start_ms), Some(1_000));
    }

    #[test]
    fn test_deleting_active_clip_goes_idle() {
        let a = clip("a.mp4", 0, 4_000, 0);
        let mut controller = controller(vec![a.clone()]);
        controller.play();

        let deleted = ops::delete_clip(controller.timeline(), a.id);
        controller.update_timeline(deleted);

        assert!(controller.state().is_idle());
        assert_eq!(controller.renderer().calls().last(), Some(&RendererCall::Pause));
    }

    #[test]
    fn test_placing_under_idle_playhead_resolves() {
        let mut controller = controller(vec![]);
        let asset = crate::core::asset::Asset::from_metadata(
            PathBuf::from("/media/new.mp4"),
            &crate::media::MediaMetadata {
                duration_ms: 1_000,
                width: 320,
                height: 240,
                fps: None,
                size_bytes: None,
            },
        );
        let mut catalog = AssetCatalog::new();
        catalog.insert(asset);

        controller.apply_edit(&EditCommand::Place { asset_path: PathBuf::from("/media/new.mp4") }, &catalog);

        assert!(controller.state().is_paused());
        assert_eq!(controller.renderer().source(), Some(Path::new("/media/new.mp4")));
    }

    #[test]
    fn test_handle_dispatch() {
        let a = clip("a.mp4", 0, 1_000, 0);
        let mut controller = controller(vec![a]);
        assert!(controller.handle(PlaybackCommand::Play).is_playing());
        assert!(controller.handle(PlaybackCommand::Pause).is_paused());
        assert!(controller.handle(PlaybackCommand::Seek(5_000)).is_idle());
        assert!(controller.handle(PlaybackCommand::UpdateTimeline(TimelineState::new())).is_idle());
    }
}
