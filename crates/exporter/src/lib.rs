//! Turns report result sets into the static data bundle consumed by the
//! dashboard, and drives the end-to-end export run.

pub mod bundle;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use bundle::{BundleBuilder, DataBundle};
pub use error::ExportError;
pub use pipeline::{assemble_bundle, run_export, ExportOptions, ExportSummary};
pub use writer::{render_artifact, write_artifact};
