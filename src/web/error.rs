use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal Server Error")]
    Internal,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// The bills store failed, carries its message for display
    #[error("{0}")]
    Fetch(String),
}
