use crate::store::StoreError;

/// Outcome taxonomy shared by every repository and the authenticator.
///
/// The api crate is the sole translator from these variants to HTTP status
/// codes; core code never sees a status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The addressed document does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A create collided with an existing key, or a signup identity is taken.
    #[error("{0}")]
    Conflict(String),
    /// Bad index, absent find-text, or a malformed image payload.
    #[error("{0}")]
    InvalidArgument(String),
    /// Bad credentials or an invalid/expired session.
    #[error("{0}")]
    Unauthorized(String),
    /// A stored document failed to round-trip through serde.
    #[error("failed to decode stored document: {0}")]
    Decode(#[from] serde_json::Error),
    /// The store itself failed.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
