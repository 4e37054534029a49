//! Account state and proxy assignment
//!
//! An `Account` is mutated round over round, but only ever by the one future
//! processing it in the current round. Nothing is persisted: a restart means
//! signing in again and re-reading the last claim time from the service.

use chrono::{DateTime, Utc};
use common::Secret;

/// One configured identity and what has been learned about it so far.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: Secret<String>,
    /// Bearer token from the last successful sign-in
    pub bearer_token: Option<Secret<String>>,
    /// Remote user id, cached once the service has reported it
    pub remote_user_id: Option<String>,
    /// Local estimate of the next claim, set after a successful claim.
    /// Informational only: eligibility is always decided from the
    /// service's reported last claim time.
    pub next_claim_time: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
            bearer_token: None,
            remote_user_id: None,
            next_claim_time: None,
        }
    }

    /// Current bearer token, if a non-empty one is held.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token
            .as_ref()
            .map(|t| t.expose().as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn set_bearer_token(&mut self, token: String) {
        self.bearer_token = Some(Secret::new(token));
    }
}

/// Proxy addresses, index-aligned with the account list.
///
/// Account `i` uses entry `i` and nothing else. An index past the end of the
/// list, or a blank entry, means a direct connection.
#[derive(Debug, Clone, Default)]
pub struct ProxyAssignment(Vec<String>);

impl ProxyAssignment {
    pub fn new(proxies: Vec<String>) -> Self {
        Self(proxies)
    }

    /// Proxy for the account at `index`, or `None` for a direct connection.
    pub fn for_account(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
