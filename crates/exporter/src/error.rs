use core_types::ReportKind;
use database::DbError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Report '{0}' was added to the data bundle twice")]
    DuplicateReport(ReportKind),

    #[error("Data bundle is missing report '{0}'")]
    Incomplete(ReportKind),

    #[error("Failed to serialize the data bundle: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Process exit code: database failures keep their own codes, everything
    /// that goes wrong while building or writing the artifact maps to 4.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Database(e) => e.exit_code(),
            _ => 4,
        }
    }
}
