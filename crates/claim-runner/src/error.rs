//! Error types for per-account processing
//!
//! None of these leave the account that produced them: the orchestrator
//! writes them to the account's round log and moves on.

/// Failure of one account's pipeline for the current round.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot reach service: {0}")]
    Connect(#[source] securitylabs_api::Error),

    #[error("sign-in failed: {0}")]
    SignIn(#[source] securitylabs_api::Error),

    #[error("failed to fetch user info: {0}")]
    UserInfo(#[source] securitylabs_api::Error),

    #[error("cannot parse last claim time {value:?}: {message}")]
    TimeParse { value: String, message: String },

    #[error("reward claim failed: {0}")]
    Claim(#[source] securitylabs_api::Error),
}

/// Result alias for account processing.
pub type Result<T> = std::result::Result<T, Error>;
