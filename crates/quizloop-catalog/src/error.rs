//! Catalog error types.

use thiserror::Error;

/// Errors that can occur when listing or fetching quizzes.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested quiz is not in the catalog.
    #[error("quiz not found: {0}")]
    NotFound(String),

    /// The server answered with an error status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The server could not be reached.
    #[error("catalog not reachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A quiz file name tried to escape the catalog.
    #[error("invalid quiz file name: {0}")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Returns `true` if the quiz simply does not exist, as opposed to the
    /// catalog being unavailable.
    pub fn is_not_found(&self) -> bool {
        match self {
            CatalogError::NotFound(_) => true,
            CatalogError::HttpStatus { status, .. } => *status == 404,
            _ => false,
        }
    }
}
