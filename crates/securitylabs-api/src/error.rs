//! Error types for remote API operations

/// Errors from building requests and calling the reward API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP exchange did not complete (network, proxy, timeout after retries)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with something other than 200
    #[error("remote returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The body was not JSON or missed a required field
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The bearer token could not be decoded or has no usable `exp`
    #[error("malformed bearer token: {0}")]
    TokenDecode(String),

    /// The configured base URL has no usable host
    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),

    /// The fixed header set could not be serialized; a programming error
    #[error("failed to serialize common headers: {0}")]
    HeaderSerialization(String),
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
