use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown report '{0}'")]
    UnknownReport(String),
}
