use core_types::ReportKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Query for report '{report}' failed: {source}")]
    QueryError {
        report: ReportKind,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    pub fn query(report: ReportKind, source: sqlx::Error) -> Self {
        DbError::QueryError { report, source }
    }

    /// The report whose query failed, if this is a query error.
    pub fn report(&self) -> Option<ReportKind> {
        match self {
            DbError::QueryError { report, .. } => Some(*report),
            _ => None,
        }
    }

    /// Process exit code for this failure: 2 for connection problems, 3 for query failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            DbError::ConnectionConfigError(_) | DbError::ConnectionError(_) => 2,
            DbError::QueryError { .. } => 3,
        }
    }
}
