//! Structured error reported by media toolchain collaborators.

use serde::{Deserialize, Serialize};

/// Error codes used by the toolchain contract
pub mod codes {
    pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
    pub const PROBE_FAILED: &str = "FFPROBE_FAILED";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const NO_VIDEO_STREAM: &str = "NO_VIDEO_STREAM";
    pub const NO_DURATION: &str = "NO_DURATION";
    pub const THUMBNAIL_FAILED: &str = "THUMBNAIL_FAILED";
    pub const SEGMENT_FAILED: &str = "SEGMENT_FAILED";
    pub const EXPORT_FAILED: &str = "EXPORT_FAILED";
}

/// Failure envelope: a machine-readable code, a human message and an
/// actionable hint. Callers surface it; the editor core never retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: String,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), hint: hint.into() }
    }

    pub fn file_not_found(path: &std::path::Path) -> Self {
        Self::new(
            codes::FILE_NOT_FOUND,
            format!("File not found: {}", path.display()),
            "Check that the file path is correct and the file hasn't been moved",
        )
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}
