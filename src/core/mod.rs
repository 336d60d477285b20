//! Core types for the editor.
//!
//! This module provides the timeline entity model (assets, clips, the track
//! and the timeline aggregate), millisecond time, position resolution and
//! invariant validation. Everything here is pure and synchronous.

pub mod asset;
pub mod clip;
pub mod position;
pub mod time;
pub mod timeline;
pub mod track;
pub mod validate;

// Re-export core data structures for easier access.
pub use asset::{Asset, AssetCatalog, AssetId};
pub use clip::{Clip, ClipId};
pub use position::{clip_at, clip_at_playhead, Resolved};
pub use time::{Millis, ZERO};
pub use timeline::TimelineState;
pub use track::Track;
pub use validate::{is_valid, validate, Violation};
