//! Cutline: a non-destructive single-track video timeline editor core.
//!
//! - `core`: assets, clips, the track, timeline state, position resolution
//!   and validation
//! - `edit`: pure edit operations and serializable edit commands
//! - `playback`: the playback state machine and its renderer contract
//! - `media`: media toolchain contract, metadata and intake
//! - `export`: export planning and the two-phase export driver

pub mod config;
pub mod core;
pub mod edit;
pub mod export;
pub mod media;
pub mod playback;

pub use config::EditorConfig;
