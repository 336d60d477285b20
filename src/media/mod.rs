//! Media collaborators: the toolchain contract, probe metadata, structured
//! toolchain errors, output parsers and media intake.

pub mod error;
pub mod intake;
pub mod metadata;
pub mod parse;
pub mod toolchain;

pub use error::ErrorEnvelope;
pub use intake::import_media;
pub use metadata::MediaMetadata;
pub use parse::{parse_ffmpeg_time, parse_frame_rate, progress_from_line, thumbnail_time_ms};
pub use toolchain::MediaToolchain;
