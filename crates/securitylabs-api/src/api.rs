//! Trait seams over the remote operations
//!
//! The account pipeline talks to the service only through `RewardApi`, and
//! obtains one `RewardApi` per account and round from an `ApiConnector`.
//! Production code uses `HttpConnector`/`ApiClient`; tests substitute
//! in-memory fakes to count calls and inject failures.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use crate::error::Result;

/// Boxed future returned by `RewardApi` methods.
///
/// `Pin<Box<dyn Future>>` keeps the trait dyn-compatible.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Fields of `GET /api/v1/users` the claimer relies on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInfo {
    /// Remote user id, used in the claim path
    pub id: String,
    /// RFC 3339 timestamp of the last claim; empty if the user never claimed
    #[serde(rename = "dipInitMineTime")]
    pub last_claim_time: String,
    /// Current reward balance
    #[serde(rename = "dipTokenBalance")]
    pub balance: f64,
}

/// The three remote operations, bound to one account's proxy.
pub trait RewardApi: Send + Sync {
    /// Exchange credentials for a bearer token (`accessToken`).
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> ApiFuture<'a, String>;

    /// Fetch the authenticated user's id, last claim time and balance.
    fn fetch_user_info<'a>(&'a self, token: &'a str) -> ApiFuture<'a, UserInfo>;

    /// Claim the reward for `user_id`. Any 200 response counts as success.
    fn claim_reward<'a>(&'a self, user_id: &'a str, token: &'a str) -> ApiFuture<'a, ()>;
}

/// Builds a `RewardApi` for an optional proxy address.
///
/// `None` (or a blank address) means a direct connection.
pub trait ApiConnector: Send + Sync {
    type Api: RewardApi;

    fn connect(&self, proxy: Option<&str>) -> Result<Self::Api>;
}
