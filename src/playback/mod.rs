pub mod controller;
pub mod renderer;
pub mod session;
pub mod state;

pub use controller::{PlaybackCommand, PlaybackController};
pub use renderer::{RecordingRenderer, Renderer, RendererCall, RendererEvent};
pub use session::{PlaybackMessage, PlaybackSession, PlaybackSnapshot, SessionError, SessionHandle};
pub use state::PlaybackState;
