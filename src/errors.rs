use thiserror::Error;

/// Error depicting a failed forecast chart run
///
#[derive(Debug, Error)]
#[error("error while creating forecast charts: {0}")]
pub struct RunError(pub String);
