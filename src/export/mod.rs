pub mod exporter;
pub mod plan;

pub use exporter::{ExportError, Exporter};
pub use plan::{ExportClip, ExportPrepareResult, ExportProgress, ExportRequest};
